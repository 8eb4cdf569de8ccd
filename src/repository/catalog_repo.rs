// ==========================================
// 商品属性导入系统 - 商品目录仓储
// ==========================================
// 职责: 管理 catalog_product 表（对账用的目录键全集）
// 说明: 目录由独立同步任务灌入,本系统只读 + 种子写入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::reconcile::service::{CatalogKeySet, CatalogLookup};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct CatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS catalog_product (
              sku TEXT PRIMARY KEY,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// 批量写入目录键（已存在的键忽略,用于种子/同步）
    pub fn insert_keys(&self, keys: &[String]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        let mut inserted = 0;
        for key in keys {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            inserted += tx.execute(
                "INSERT OR IGNORE INTO catalog_product (sku) VALUES (?1)",
                params![key],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        Ok(inserted)
    }

    /// 列出全部目录键（按 SKU 排序）
    pub fn list_keys(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT sku FROM catalog_product ORDER BY sku ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(keys)
    }

    /// 目录键总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM catalog_product", [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }
}

// 对账服务的目录查询实现（失败映射为 Unavailable,由对账层降级处理）
#[async_trait]
impl CatalogLookup for CatalogRepository {
    async fn fetch_catalog_keys(&self) -> ReconcileResult<CatalogKeySet> {
        let keys = self
            .list_keys()
            .map_err(|e| ReconcileError::Unavailable(e.to_string()))?;
        Ok(CatalogKeySet {
            total: keys.len(),
            keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_insert_and_list() {
        let repo = CatalogRepository::new(":memory:").expect("Failed to create test repository");

        let inserted = repo
            .insert_keys(&keys(&["ABC-2", "ABC-1"]))
            .expect("Failed to insert");
        assert_eq!(inserted, 2);
        assert_eq!(repo.list_keys().expect("Failed to list"), vec!["ABC-1", "ABC-2"]);
    }

    #[test]
    fn test_insert_ignores_duplicates_and_blanks() {
        let repo = CatalogRepository::new(":memory:").expect("Failed to create test repository");

        repo.insert_keys(&keys(&["ABC-1"])).expect("Failed to insert 1");
        let inserted = repo
            .insert_keys(&keys(&["ABC-1", "  ", "ABC-2"]))
            .expect("Failed to insert 2");

        assert_eq!(inserted, 1);
        assert_eq!(repo.count().expect("Failed to count"), 2);
    }

    #[tokio::test]
    async fn test_catalog_lookup_impl() {
        let repo = CatalogRepository::new(":memory:").expect("Failed to create test repository");
        repo.insert_keys(&keys(&["ABC-1"])).expect("Failed to insert");

        let set = repo.fetch_catalog_keys().await.expect("Failed to fetch");
        assert_eq!(set.total, 1);
        assert_eq!(set.keys, vec!["ABC-1"]);
    }
}
