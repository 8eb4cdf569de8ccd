// ==========================================
// 商品属性导入系统 - 键对账服务
// ==========================================
// 职责: 拉取商品目录键全集,对发现键执行分层匹配
// 红线: 对账只产出审查信息,任何失败都不得影响结构分析结果
// 流程: 有界重试拉取目录 → 逐层匹配余集 → MatchResult
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::matching::{MatchResult, TierCounts};
use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::reconcile::normalizer::tier_chain;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

// ==========================================
// CatalogKeySet - 商品目录键全集
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CatalogKeySet {
    pub total: usize,       // 目录总键数（可能大于 keys.len(),供展示）
    pub keys: Vec<String>,  // 目录键列表
}

// ==========================================
// CatalogLookup - 商品目录查询接口
// ==========================================
// 生产实现走本地库,测试用内存假实现注入失败场景
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// 拉取商品目录键全集
    async fn fetch_catalog_keys(&self) -> ReconcileResult<CatalogKeySet>;
}

/// 对发现键执行分层匹配（纯函数,不涉网络）
///
/// # 参数
/// - discovered: 分析产出的发现键（重复键只记一次）
/// - catalog: 商品目录键全集
///
/// # 返回
/// - MatchResult: matched 与 unmatched 不相交,并集 = 去重后的发现键
///
/// # 层级语义
/// 每个发现键只计入首个命中的层级;后续层级只在上一层的未命中余集上继续
pub fn match_keys(discovered: &[String], catalog: &CatalogKeySet) -> MatchResult {
    // 发现键去重,保持首见顺序
    let mut seen = HashSet::new();
    let mut remaining: Vec<String> = discovered
        .iter()
        .filter(|k| seen.insert(k.as_str()))
        .cloned()
        .collect();

    let mut matched_keys = HashSet::new();
    let mut tier_counts = TierCounts::default();

    for (tier, normalizer) in tier_chain() {
        if remaining.is_empty() {
            break;
        }

        // 空归一化形态（如纯零键的激进形态）不参与命中
        let catalog_forms: HashSet<String> = catalog
            .keys
            .iter()
            .map(|k| normalizer(k))
            .filter(|form| !form.is_empty())
            .collect();

        remaining.retain(|key| {
            let form = normalizer(key);
            if !form.is_empty() && catalog_forms.contains(&form) {
                matched_keys.insert(key.clone());
                tier_counts.record(tier);
                false
            } else {
                true
            }
        });
    }

    MatchResult {
        total_catalog_keys: catalog.total,
        matched_keys,
        unmatched_keys: remaining.into_iter().collect(),
        tier_counts,
    }
}

// ==========================================
// ReconcileService - 对账编排
// ==========================================
pub struct ReconcileService<C: CatalogLookup> {
    catalog: Arc<C>,
    cfg: ReconcileConfig,
}

impl<C: CatalogLookup> ReconcileService<C> {
    pub fn new(catalog: Arc<C>, cfg: ReconcileConfig) -> Self {
        Self { catalog, cfg }
    }

    /// 拉取目录并对账
    ///
    /// # 重试语义
    /// 最多 max_attempts 次,单次受 request_timeout_ms 约束,
    /// 失败后线性退避（retry_backoff_ms * 已尝试次数）;
    /// 预算耗尽返回最后一次错误,由调用方降级处理
    pub async fn reconcile(&self, discovered: &[String]) -> ReconcileResult<MatchResult> {
        let timeout = Duration::from_millis(self.cfg.request_timeout_ms);
        let mut last_err = ReconcileError::Unavailable("未发起任何请求".to_string());

        for attempt in 1..=self.cfg.max_attempts {
            match tokio::time::timeout(timeout, self.catalog.fetch_catalog_keys()).await {
                Ok(Ok(catalog)) => {
                    let result = match_keys(discovered, &catalog);
                    tracing::info!(
                        attempt,
                        catalog_keys = catalog.total,
                        matched = result.matched_keys.len(),
                        unmatched = result.unmatched_keys.len(),
                        "键对账完成"
                    );
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    tracing::warn!(attempt, error = %e, "商品目录拉取失败");
                    last_err = e;
                }
                Err(_) => {
                    tracing::warn!(attempt, timeout_ms = self.cfg.request_timeout_ms, "商品目录请求超时");
                    last_err = ReconcileError::Timeout {
                        timeout_ms: self.cfg.request_timeout_ms,
                    };
                }
            }

            if attempt < self.cfg.max_attempts {
                let backoff = self.cfg.retry_backoff_ms * u64::from(attempt);
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }
        }

        Err(last_err)
    }
}
