// ==========================================
// 商品属性导入系统 - 解码层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: UnsupportedFormat/EmptyInput 为致命错误,在分词开始前抛出
// ==========================================

use thiserror::Error;

/// 解码层错误类型
#[derive(Error, Debug)]
pub enum DecodeError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.txt/.xls/.xlsx）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    // ===== 内容相关错误 =====
    #[error("解码结果为空: 文件不含任何内容")]
    EmptyInput,

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>（规范文本写出阶段）
impl From<csv::Error> for DecodeError {
    fn from(err: csv::Error) -> Self {
        DecodeError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type DecodeResult<T> = Result<T, DecodeError>;
