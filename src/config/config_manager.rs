// ==========================================
// 商品属性导入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 代码内置默认值,config_kv 仅存放显式覆写
// ==========================================

use crate::config::pipeline_config::{PipelineConfig, ReconcileConfig};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 槽位扫描
    pub const MAX_SLOT_NUMBER: &str = "pipeline.max_slot_number";
    pub const SLOT_GAP_LIMIT: &str = "pipeline.slot_gap_limit";
    pub const MIN_SLOT_PAIRS: &str = "pipeline.min_slot_pairs";

    // 键规则
    pub const MAX_KEY_LENGTH: &str = "pipeline.max_key_length";

    // 槽位标签
    pub const ATTR_NAME_LABEL: &str = "pipeline.attr_name_label";
    pub const ATTR_VALUE_LABEL: &str = "pipeline.attr_value_label";

    // 对账
    pub const RECONCILE_MAX_ATTEMPTS: &str = "reconcile.max_attempts";
    pub const RECONCILE_RETRY_BACKOFF_MS: &str = "reconcile.retry_backoff_ms";
    pub const RECONCILE_REQUEST_TIMEOUT_MS: &str = "reconcile.request_timeout_ms";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 为保证连接行为一致,会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 确保 config_kv 表存在
    fn ensure_table(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL,
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法,供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置覆写（Upsert）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT (scope_id, key) DO UPDATE SET
              value = excluded.value,
              updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取数值型覆写,解析失败视为未覆写
    fn get_usize(&self, key: &str) -> Result<Option<usize>, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.trim().parse::<usize>().ok()))
    }

    fn get_u64(&self, key: &str) -> Result<Option<u64>, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.trim().parse::<u64>().ok()))
    }

    /// 加载管道配置（默认值 + config_kv 覆写）
    pub fn load_pipeline_config(&self) -> Result<PipelineConfig, Box<dyn Error>> {
        let mut cfg = PipelineConfig::default();

        if let Some(v) = self.get_usize(config_keys::MAX_SLOT_NUMBER)? {
            cfg.max_slot_number = v;
        }
        if let Some(v) = self.get_usize(config_keys::SLOT_GAP_LIMIT)? {
            cfg.slot_gap_limit = v;
        }
        if let Some(v) = self.get_usize(config_keys::MIN_SLOT_PAIRS)? {
            cfg.min_slot_pairs = v;
        }
        if let Some(v) = self.get_usize(config_keys::MAX_KEY_LENGTH)? {
            cfg.max_key_length = v;
        }
        if let Some(v) = self.get_config_value(config_keys::ATTR_NAME_LABEL)? {
            cfg.attr_name_label = v;
        }
        if let Some(v) = self.get_config_value(config_keys::ATTR_VALUE_LABEL)? {
            cfg.attr_value_label = v;
        }

        Ok(cfg)
    }

    /// 加载对账配置（默认值 + config_kv 覆写）
    pub fn load_reconcile_config(&self) -> Result<ReconcileConfig, Box<dyn Error>> {
        let mut cfg = ReconcileConfig::default();

        if let Some(v) = self.get_u64(config_keys::RECONCILE_MAX_ATTEMPTS)? {
            cfg.max_attempts = v as u32;
        }
        if let Some(v) = self.get_u64(config_keys::RECONCILE_RETRY_BACKOFF_MS)? {
            cfg.retry_backoff_ms = v;
        }
        if let Some(v) = self.get_u64(config_keys::RECONCILE_REQUEST_TIMEOUT_MS)? {
            cfg.request_timeout_ms = v;
        }

        Ok(cfg)
    }
}
