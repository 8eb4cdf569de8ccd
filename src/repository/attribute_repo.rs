// ==========================================
// 商品属性导入系统 - 商品属性仓储
// ==========================================
// 职责: 管理 product_attributes 表（按 SKU 主键）
// 红线: 再次导入同 SKU 时整条记录替换,不做属性级合并
//       （合并语义只存在于单次分析的透视阶段）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::PivotedProduct;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 商品属性持久化实体
#[derive(Debug, Clone)]
pub struct ProductAttributeEntity {
    pub sku: String,                          // 商品唯一标识（主键）
    pub display_name: String,                 // 展示名称（可为空）
    pub attributes: HashMap<String, String>,  // 属性名 → 属性值（落库为 JSON）
    pub source_run_id: String,                // 产生该记录的分析运行ID
    pub updated_at: String,                   // 最近写入时间
}

impl ProductAttributeEntity {
    /// 由透视商品构造持久化实体
    pub fn from_product(product: &PivotedProduct, run_id: &str) -> Self {
        let now = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        Self {
            sku: product.key.clone(),
            display_name: product.display_name.clone(),
            attributes: product.attributes.clone(),
            source_run_id: run_id.to_string(),
            updated_at: now,
        }
    }
}

pub struct AttributeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AttributeRepository {
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
            CREATE TABLE IF NOT EXISTS product_attributes (
              sku TEXT PRIMARY KEY,
              display_name TEXT NOT NULL DEFAULT '',
              attributes_json TEXT NOT NULL,
              source_run_id TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_product_attributes_run
              ON product_attributes(source_run_id);
            "#,
        )?;
        Ok(())
    }

    /// 批量保存透视商品（同 SKU 整条替换,事务内完成）
    ///
    /// # 返回
    /// - 写入条数
    pub fn save_products(
        &self,
        products: &[PivotedProduct],
        run_id: &str,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        let mut written = 0;
        for product in products {
            let entity = ProductAttributeEntity::from_product(product, run_id);
            let attributes_json = serde_json::to_string(&entity.attributes)?;

            tx.execute(
                r#"
                INSERT OR REPLACE INTO product_attributes (
                    sku,
                    display_name,
                    attributes_json,
                    source_run_id,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    entity.sku,
                    entity.display_name,
                    attributes_json,
                    entity.source_run_id,
                    entity.updated_at,
                ],
            )?;
            written += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        Ok(written)
    }

    /// 按 SKU 查找商品属性
    pub fn find_by_sku(&self, sku: &str) -> RepositoryResult<Option<ProductAttributeEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sku, display_name, attributes_json, source_run_id, updated_at
            FROM product_attributes
            WHERE sku = ?1
            "#,
        )?;

        let result = stmt.query_row(params![sku], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        });

        match result {
            Ok((sku, display_name, attributes_json, source_run_id, updated_at)) => {
                let attributes = serde_json::from_str(&attributes_json)?;
                Ok(Some(ProductAttributeEntity {
                    sku,
                    display_name,
                    attributes,
                    source_run_id,
                    updated_at,
                }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出某次运行写入的全部 SKU（按 SKU 排序）
    pub fn list_skus_by_run(&self, run_id: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT sku FROM product_attributes WHERE source_run_id = ?1 ORDER BY sku ASC",
        )?;

        let skus = stmt
            .query_map(params![run_id], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;

        Ok(skus)
    }

    /// 商品属性总条数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM product_attributes", [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(key: &str, attrs: &[(&str, &str)]) -> PivotedProduct {
        PivotedProduct {
            key: key.to_string(),
            display_name: "Camiseta".to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_save_and_find() {
        let repo = AttributeRepository::new(":memory:").expect("Failed to create test repository");

        let products = vec![
            sample_product("ABC-1", &[("Cor", "Vermelho"), ("Tamanho", "M")]),
            sample_product("ABC-2", &[("Cor", "Azul")]),
        ];

        let written = repo.save_products(&products, "run-1").expect("Failed to save");
        assert_eq!(written, 2);
        assert_eq!(repo.count().expect("Failed to count"), 2);

        let found = repo
            .find_by_sku("ABC-1")
            .expect("Failed to find")
            .expect("Entity not found");
        assert_eq!(found.display_name, "Camiseta");
        assert_eq!(found.attributes.get("Cor"), Some(&"Vermelho".to_string()));
        assert_eq!(found.source_run_id, "run-1");
    }

    #[test]
    fn test_reimport_replaces_whole_record() {
        let repo = AttributeRepository::new(":memory:").expect("Failed to create test repository");

        let first = vec![sample_product("ABC-1", &[("Cor", "Vermelho"), ("Tamanho", "M")])];
        repo.save_products(&first, "run-1").expect("Failed to save 1");

        // 第二次导入同 SKU,只带 Cor 属性,Tamanho 必须消失（整条替换）
        let second = vec![sample_product("ABC-1", &[("Cor", "Azul")])];
        repo.save_products(&second, "run-2").expect("Failed to save 2");

        let found = repo
            .find_by_sku("ABC-1")
            .expect("Failed to find")
            .expect("Entity not found");
        assert_eq!(found.attributes.get("Cor"), Some(&"Azul".to_string()));
        assert!(found.attributes.get("Tamanho").is_none());
        assert_eq!(found.source_run_id, "run-2");
        assert_eq!(repo.count().expect("Failed to count"), 1);
    }

    #[test]
    fn test_list_skus_by_run() {
        let repo = AttributeRepository::new(":memory:").expect("Failed to create test repository");

        repo.save_products(
            &[sample_product("B-2", &[("Cor", "Azul")]), sample_product("A-1", &[("Cor", "Verde")])],
            "run-1",
        )
        .expect("Failed to save");

        let skus = repo.list_skus_by_run("run-1").expect("Failed to list");
        assert_eq!(skus, vec!["A-1", "B-2"]);
    }

    #[test]
    fn test_find_missing_sku_returns_none() {
        let repo = AttributeRepository::new(":memory:").expect("Failed to create test repository");
        let found = repo.find_by_sku("NOPE").expect("Failed to find");
        assert!(found.is_none());
    }
}
