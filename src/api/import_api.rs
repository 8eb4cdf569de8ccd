// ==========================================
// 商品属性导入API
// ==========================================
// 职责: 封装 文件 → 分析 → 对账 → 落库 的完整导入流程
// 红线: 对账失败只降级不报错;旧分析运行的导入请求必须拒绝
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::decoder::UniversalFileDecoder;
use crate::domain::matching::MatchResult;
use crate::domain::product::AnalysisResult;
use crate::pipeline::{analyze, build_canonical_export};
use crate::reconcile::{ReconcileService, CatalogLookup};
use crate::repository::{AttributeRepository, CatalogRepository};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

/// 对账汇总（供操作员审查,不影响分析产出）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// 商品目录键全集大小
    pub total_catalog_keys: usize,
    /// 命中任一层级的发现键数
    pub matched: usize,
    /// 未命中任何层级的发现键数
    pub unmatched: usize,
    /// 层级1（精确）命中数
    pub exact: usize,
    /// 层级2（归一化）命中数
    pub normalized: usize,
    /// 层级3（激进归一化）命中数
    pub aggressive: usize,
    /// 未命中键列表（排序后,便于前端稳定展示）
    pub unmatched_keys: Vec<String>,
}

impl From<MatchResult> for ReconcileSummary {
    fn from(result: MatchResult) -> Self {
        let mut unmatched_keys: Vec<String> = result.unmatched_keys.into_iter().collect();
        unmatched_keys.sort();

        Self {
            total_catalog_keys: result.total_catalog_keys,
            matched: result.matched_keys.len(),
            unmatched: unmatched_keys.len(),
            exact: result.tier_counts.exact,
            normalized: result.tier_counts.normalized,
            aggressive: result.tier_counts.aggressive,
            unmatched_keys,
        }
    }
}

/// 分析API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeFileResponse {
    /// 本次分析运行ID（导入时回传校验）
    pub run_id: String,
    /// 完整分析产出
    pub analysis: AnalysisResult,
    /// 规范导出预览（KEY;attr1;attr2;...）
    pub canonical_export: String,
    /// 对账汇总（目录不可用时为 None）
    pub reconcile: Option<ReconcileSummary>,
    /// 对账降级标志（true = 目录不可用,分析结果仍然有效）
    pub reconcile_unavailable: bool,
    /// 分析耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 导入落库API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProductsResponse {
    /// 本次导入对应的分析运行ID
    pub run_id: String,
    /// 落库商品条数
    pub persisted: usize,
    /// 落库使用的规范导出文本
    pub canonical_export: String,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 商品属性导入API
pub struct ImportApi {
    db_path: String,
    // 最近一次分析运行ID;并发分析时旧运行的导入请求被拒绝
    latest_run: Arc<Mutex<Option<String>>>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            latest_run: Arc::new(Mutex::new(None)),
        }
    }

    /// 分析文件结构
    ///
    /// # 参数
    /// - file_path: 待分析文件路径（csv/txt/xls/xlsx）
    ///
    /// # 返回
    /// - Ok(AnalyzeFileResponse): 分析产出 + 导出预览 + 对账汇总
    /// - Err(ApiError): 解码或分析失败
    ///
    /// # 说明
    /// 对账失败不致命,只置 reconcile_unavailable 标志
    pub async fn analyze_file(&self, file_path: &str) -> ApiResult<AnalyzeFileResponse> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        // === 解码 ===
        let text = UniversalFileDecoder.decode(file_path)?;

        // === 配置加载（库内覆盖 + 代码默认值）===
        let config_manager = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::InternalError(format!("配置管理器初始化失败: {}", e)))?;
        let pipeline_cfg = config_manager
            .load_pipeline_config()
            .map_err(|e| ApiError::InternalError(format!("管道配置加载失败: {}", e)))?;
        let reconcile_cfg = config_manager
            .load_reconcile_config()
            .map_err(|e| ApiError::InternalError(format!("对账配置加载失败: {}", e)))?;

        // === 结构分析 ===
        let analysis = analyze(&text, &pipeline_cfg)?;

        // === 导出构建 + 键对账并发执行,合流后出结果 ===
        let (export_result, reconcile_result) = tokio::join!(
            async { build_canonical_export(&analysis) },
            self.reconcile_keys(&analysis, reconcile_cfg),
        );
        let canonical_export = export_result?;

        // 对账失败只降级,分析结果照常返回
        let (reconcile, reconcile_unavailable) = match reconcile_result {
            Ok(result) => (Some(ReconcileSummary::from(result)), false),
            Err(e) => {
                tracing::warn!(error = %e, "键对账不可用,降级返回分析结果");
                (None, true)
            }
        };

        // 记录最近运行,旧运行的导入请求此后被拒绝
        {
            let mut latest = self
                .latest_run
                .lock()
                .map_err(|e| ApiError::InternalError(format!("运行状态锁获取失败: {}", e)))?;
            *latest = Some(run_id.clone());
        }

        let elapsed_ms = started.elapsed().as_millis() as i64;
        tracing::info!(
            run_id = %run_id,
            kind = ?analysis.kind,
            products = analysis.products.len(),
            reconcile_unavailable,
            elapsed_ms,
            "文件分析完成"
        );

        Ok(AnalyzeFileResponse {
            run_id,
            analysis,
            canonical_export,
            reconcile,
            reconcile_unavailable,
            elapsed_ms,
        })
    }

    /// 导入落库
    ///
    /// # 参数
    /// - analysis: analyze_file 返回的分析产出（操作员可能已调整 enabled 标志）
    /// - run_id: 对应的分析运行ID
    ///
    /// # 返回
    /// - Ok(ImportProductsResponse): 落库条数 + 规范导出
    /// - Err(ApiError::Superseded): 该运行已被更新的分析取代
    pub async fn import_products(
        &self,
        analysis: &AnalysisResult,
        run_id: &str,
    ) -> ApiResult<ImportProductsResponse> {
        let started = Instant::now();

        // === 运行校验 ===
        {
            let latest = self
                .latest_run
                .lock()
                .map_err(|e| ApiError::InternalError(format!("运行状态锁获取失败: {}", e)))?;
            match latest.as_deref() {
                Some(current) if current == run_id => {}
                _ => {
                    return Err(ApiError::Superseded {
                        run_id: run_id.to_string(),
                    })
                }
            }
        }

        // === 落库（同 SKU 整条替换）===
        let repo = AttributeRepository::new(&self.db_path)?;
        let persisted = repo.save_products(&analysis.products, run_id)?;

        let canonical_export = build_canonical_export(analysis)?;

        let elapsed_ms = started.elapsed().as_millis() as i64;
        tracing::info!(run_id = %run_id, persisted, elapsed_ms, "商品属性落库完成");

        Ok(ImportProductsResponse {
            run_id: run_id.to_string(),
            persisted,
            canonical_export,
            elapsed_ms,
        })
    }

    /// 以本地目录仓储为目录源执行对账
    async fn reconcile_keys(
        &self,
        analysis: &AnalysisResult,
        cfg: crate::config::ReconcileConfig,
    ) -> ApiResult<MatchResult> {
        let catalog = CatalogRepository::new(&self.db_path)?;
        self.reconcile_with(analysis, cfg, Arc::new(catalog)).await
    }

    /// 对账实现（目录源可注入,测试用假实现验证降级路径）
    pub async fn reconcile_with<C: CatalogLookup + 'static>(
        &self,
        analysis: &AnalysisResult,
        cfg: crate::config::ReconcileConfig,
        catalog: Arc<C>,
    ) -> ApiResult<MatchResult> {
        let service = ReconcileService::new(catalog, cfg);
        let discovered = analysis.discovered_keys();
        service
            .reconcile(&discovered)
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::matching::TierCounts;
    use std::collections::HashSet;

    #[test]
    fn test_reconcile_summary_from_match_result() {
        let result = MatchResult {
            total_catalog_keys: 10,
            matched_keys: HashSet::from(["ABC-1".to_string(), "ABC-2".to_string()]),
            unmatched_keys: HashSet::from(["Z-9".to_string(), "A-0".to_string()]),
            tier_counts: TierCounts {
                exact: 1,
                normalized: 1,
                aggressive: 0,
            },
        };

        let summary = ReconcileSummary::from(result);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.unmatched, 2);
        // 未命中键排序输出
        assert_eq!(summary.unmatched_keys, vec!["A-0", "Z-9"]);
    }
}
