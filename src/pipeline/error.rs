// ==========================================
// 商品属性导入系统 - 管道错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 行形状不匹配不是错误（丢弃并计数）;键列未命中不是错误（回退提示）
//       只有完全无法分词任何行才致命
// ==========================================

use thiserror::Error;

/// 结构分析管道错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("输入为空: 解码文本不含任何内容")]
    EmptyInput,

    #[error("分词失败: 无法从输入中解析出表头行")]
    NoHeaderRow,

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<csv::Error>（规范导出写出阶段）
impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type PipelineResult<T> = Result<T, PipelineError>;
