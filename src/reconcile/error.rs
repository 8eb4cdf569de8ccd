// ==========================================
// 商品属性导入系统 - 对账错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 对账失败不致命;调用方在重试预算耗尽后降级返回无对账结果的分析
// ==========================================

use thiserror::Error;

/// 键对账错误类型
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("商品目录服务不可用: {0}")]
    Unavailable(String),

    #[error("商品目录请求超时（{timeout_ms}ms）")]
    Timeout { timeout_ms: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ReconcileResult<T> = Result<T, ReconcileError>;
