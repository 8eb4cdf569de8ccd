// ==========================================
// 商品属性导入系统 - 键对账子系统
// ==========================================
// 职责: 发现键 ↔ 商品目录键的分层匹配,纯审查用途
// 红线: 对账失败不致命,结构分析结果不受影响
// ==========================================

pub mod error;
pub mod normalizer;
pub mod service;

pub use error::{ReconcileError, ReconcileResult};
pub use normalizer::{normalize, normalize_aggressive, tier_chain};
pub use service::{match_keys, CatalogKeySet, CatalogLookup, ReconcileService};
