// ==========================================
// 商品属性导入系统 - 规范导出构建
// ==========================================
// 职责: 分析结果 → 最小分隔格式 KEY;attr1;attr2;...（落库形态）
// 不变量: 导出结果必须能被行分词层零丢弃地重新解析（往返保证）
// ==========================================

use crate::domain::product::AnalysisResult;
use crate::domain::table::TableKind;
use crate::pipeline::error::{PipelineError, PipelineResult};
use csv::WriterBuilder;

/// 规范导出的键列表头
pub const EXPORT_KEY_HEADER: &str = "KEY";

/// 字段清洗: 内嵌换行压平为空格（分词层按行扫描,原样写出会破坏往返解析）
fn sanitize_field(value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        value.replace("\r\n", " ").replace(['\r', '\n'], " ")
    } else {
        value.to_string()
    }
}

/// 构建规范导出文本
///
/// # 列序
/// - 平台导出路径: 键列 + 启用属性（按 UniqueAttribute 聚合顺序）
/// - 通用路径: 键列永远第一,之后是启用的原始列（保持原始列序）
///
/// # 引号
/// 含输出分隔符的字段用双引号包裹（csv writer 按需引用,双写引号转义）
pub fn build_canonical_export(result: &AnalysisResult) -> PipelineResult<String> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(vec![]);

    match result.kind {
        TableKind::PlatformExport => {
            let columns: Vec<&str> = result
                .unique_attributes
                .iter()
                .filter(|attr| attr.enabled)
                .map(|attr| attr.name.as_str())
                .collect();

            let mut header = vec![EXPORT_KEY_HEADER.to_string()];
            header.extend(columns.iter().map(|name| sanitize_field(name)));
            writer.write_record(&header)?;

            for product in &result.products {
                let mut record = vec![sanitize_field(&product.key)];
                for name in &columns {
                    let value = product
                        .attributes
                        .get(*name)
                        .map(|v| sanitize_field(v))
                        .unwrap_or_default();
                    record.push(value);
                }
                writer.write_record(&record)?;
            }
        }
        TableKind::Generic => {
            let columns: Vec<&crate::domain::product::GenericColumnStat> = result
                .generic_columns
                .iter()
                .filter(|col| col.enabled)
                .collect();

            let mut header = vec![EXPORT_KEY_HEADER.to_string()];
            header.extend(columns.iter().map(|col| sanitize_field(&col.name)));
            writer.write_record(&header)?;

            for row in &result.table.rows {
                let key = row
                    .get(result.key_column)
                    .map(|k| k.trim())
                    .unwrap_or_default();

                let mut record = vec![sanitize_field(key)];
                for col in &columns {
                    let value = row
                        .get(col.column_index)
                        .map(|v| sanitize_field(v))
                        .unwrap_or_default();
                    record.push(value);
                }
                writer.write_record(&record)?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::InternalError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PipelineError::InternalError(e.to_string()))
}
