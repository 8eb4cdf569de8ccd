// ==========================================
// 商品属性导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 电商表格 → 规范商品属性的导入工具 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 解码层 - 文件 → 分隔文本
pub mod decoder;

// 管道层 - 结构分析算法
pub mod pipeline;

// 对账层 - 发现键 ↔ 商品目录
pub mod reconcile;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AnalysisResult, AttributeSlot, DecodedTable, GenericColumnStat, MatchResult, MatchTier,
    PivotedProduct, TableKind, TierCounts, UniqueAttribute,
};

// 管道入口
pub use pipeline::{analyze, build_canonical_export};

// 解码入口
pub use decoder::UniversalFileDecoder;

// 对账
pub use reconcile::{match_keys, CatalogKeySet, CatalogLookup, ReconcileService};

// API
pub use api::ImportApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商品属性导入系统";

// ==========================================
// 预编译检查
// ==========================================
