// ==========================================
// 商品属性导入系统 - 结构分析管道
// ==========================================
// 职责: 分隔文本 → 规范属性结构的全部算法环节
// 流程: 探测 → 分词 → 分类 → (透视 | 剖析) → 导出
// 红线: 全程同步单遍,无悬挂点;不含数据访问,不含网络调用
// ==========================================

pub mod analyzer;
pub mod classifier;
pub mod error;
pub mod export;
pub mod format_detector;
pub mod pivoter;
pub mod profiler;
pub mod tokenizer;

// 重导出核心入口
pub use analyzer::analyze;
pub use classifier::{classify, detect_slots, guess_key_column, is_valid_key};
pub use error::{PipelineError, PipelineResult};
pub use export::{build_canonical_export, EXPORT_KEY_HEADER};
pub use format_detector::{detect_delimiter, CANONICAL_DELIMITER};
pub use pivoter::{pivot, PivotOutcome};
pub use profiler::profile_columns;
pub use tokenizer::{tokenize, tokenize_line};
