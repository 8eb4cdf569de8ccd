// ==========================================
// 商品属性导入系统 - 领域模型层
// ==========================================
// 职责: 定义分析运行产出的领域实体与类型
// 红线: 不含解析逻辑,不含数据访问逻辑
// 生命周期: 除规范导出外,所有实体仅在单次分析运行内有效
// ==========================================

pub mod matching;
pub mod product;
pub mod table;

// 重导出核心类型
pub use matching::{MatchResult, MatchTier, TierCounts};
pub use product::{
    AnalysisResult, GenericColumnStat, PivotedProduct, UniqueAttribute,
};
pub use table::{AttributeSlot, DecodedTable, TableKind};
