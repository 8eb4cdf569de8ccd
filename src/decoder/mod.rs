// ==========================================
// 商品属性导入系统 - 解码层
// ==========================================
// 职责: 上传的二进制/文本文件 → 单一分隔文本
// 红线: 管道其余部分只认分隔文本,不认二进制格式
// ==========================================

pub mod error;
pub mod file_decoder;

// 重导出核心类型
pub use error::{DecodeError, DecodeResult};
pub use file_decoder::{
    ExcelDecoder, TextDecoder, UniversalFileDecoder, SUPPORTED_EXTENSIONS,
};
