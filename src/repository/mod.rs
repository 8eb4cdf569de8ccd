// ==========================================
// 商品属性导入系统 - 仓储层
// ==========================================
// 职责: SQLite 持久化（商品属性 + 商品目录）
// 红线: 上层只通过仓储访问数据库,不得手写 SQL 散落各处
// ==========================================

pub mod attribute_repo;
pub mod catalog_repo;
pub mod error;

pub use attribute_repo::{AttributeRepository, ProductAttributeEntity};
pub use catalog_repo::CatalogRepository;
pub use error::{RepositoryError, RepositoryResult};
