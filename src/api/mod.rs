// ==========================================
// 商品属性导入系统 - API层
// ==========================================
// 职责: 面向调用方的导入流程编排与错误转换
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{
    AnalyzeFileResponse, ImportApi, ImportProductsResponse, ReconcileSummary,
};
