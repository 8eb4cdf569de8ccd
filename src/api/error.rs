// ==========================================
// 商品属性导入系统 - API层错误类型
// ==========================================
// 职责: 将解码/管道/仓储错误转换为用户可读的业务错误
// 说明: 所有错误信息必须包含显式原因
// ==========================================

use crate::decoder::error::DecodeError;
use crate::pipeline::error::PipelineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("文件解码失败: {0}")]
    DecodeFailure(String),

    #[error("结构分析失败: {0}")]
    AnalysisFailure(String),

    // ==========================================
    // 运行状态错误
    // ==========================================
    /// 并发分析时旧运行的导入请求被拒绝
    #[error("分析运行已被取代: run_id={run_id}")]
    Superseded { run_id: String },

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 下层错误统一在 API 边界转换,携带原始原因
impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        ApiError::DecodeFailure(err.to_string())
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyInput => {
                ApiError::InvalidInput("文件无内容,无法分析".to_string())
            }
            PipelineError::NoHeaderRow => {
                ApiError::InvalidInput("首行为空,无法识别表头".to_string())
            }
            other => ApiError::AnalysisFailure(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, key } => {
                ApiError::NotFound(format!("{}(key={})不存在", entity, key))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
