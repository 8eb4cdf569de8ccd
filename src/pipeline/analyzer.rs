// ==========================================
// 商品属性导入系统 - 结构分析编排
// ==========================================
// 职责: 解码文本 → AnalysisResult 的单遍同步流程
// 红线: 纯函数,无环境状态;批处理/API/测试调用方式完全一致
// 流程: 分隔符探测 → 分词修复 → 结构分类 → 键过滤 → 透视/剖析
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::product::AnalysisResult;
use crate::domain::table::TableKind;
use crate::pipeline::classifier::{classify, guess_key_column, is_valid_key};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::format_detector::detect_delimiter;
use crate::pipeline::pivoter::pivot;
use crate::pipeline::profiler::profile_columns;
use crate::pipeline::tokenizer::{split_lines, tokenize};

/// 对解码文本执行完整结构分析
///
/// # 参数
/// - decoded_text: 解码层产出的分隔文本
/// - cfg: 管道配置
///
/// # 返回
/// - AnalysisResult: 本次运行的全部产出,所有权归调用方
///
/// # 错误
/// - EmptyInput: 文本无内容（行形状问题不在此列,只丢弃计数）
pub fn analyze(decoded_text: &str, cfg: &PipelineConfig) -> PipelineResult<AnalysisResult> {
    if decoded_text.trim().is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    // === 步骤 1: 分隔符探测（仅看首个非空行,引号内不计数）===
    let lines = split_lines(decoded_text);
    let first_line = lines.first().ok_or(PipelineError::EmptyInput)?;
    let delimiter = detect_delimiter(first_line);

    // === 步骤 2: 分词 + 行形状修复 ===
    let mut table = tokenize(decoded_text, delimiter)?;
    tracing::debug!(
        delimiter = %delimiter.escape_debug(),
        rows = table.rows.len(),
        discarded = table.discarded_count,
        "分词完成"
    );

    // === 步骤 3: 键列猜测 + 结构分类 ===
    let (key_column, key_column_guessed) = guess_key_column(&table.headers);
    if !key_column_guessed {
        tracing::info!("键列未命中任何模式,回退到第 0 列");
    }

    let (kind, slots) = classify(&table.headers, cfg);

    // === 步骤 4: 键有效性过滤（两条路径一致,整行跳过）===
    let before = table.rows.len();
    table
        .rows
        .retain(|row| row.get(key_column).map_or(false, |k| is_valid_key(k, cfg)));
    let skipped_key_rows = before - table.rows.len();

    // === 步骤 5: 按路径透视或剖析 ===
    let key_column_header = table
        .headers
        .get(key_column)
        .cloned()
        .unwrap_or_default();

    let (products, unique_attributes, generic_columns) = match kind {
        TableKind::PlatformExport => {
            let outcome = pivot(&table, key_column, &slots, cfg);
            (outcome.products, outcome.unique_attributes, Vec::new())
        }
        TableKind::Generic => {
            let stats = profile_columns(&table, key_column, cfg);
            (Vec::new(), Vec::new(), stats)
        }
    };

    tracing::info!(
        kind = ?kind,
        slots = slots.len(),
        products = products.len(),
        skipped_key_rows,
        "结构分析完成"
    );

    Ok(AnalysisResult {
        kind,
        delimiter,
        key_column,
        key_column_header,
        key_column_guessed,
        table,
        slots,
        products,
        unique_attributes,
        generic_columns,
        skipped_key_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform_header() -> String {
        let mut names = vec!["SKU".to_string(), "Nome".to_string()];
        for n in 1..=3 {
            names.push(format!("Nome do atributo {}", n));
            names.push(format!("Valores do atributo {}", n));
        }
        names.join(";")
    }

    #[test]
    fn test_analyze_platform_export_end_to_end() {
        let cfg = PipelineConfig::default();
        let text = format!(
            "{}\nABC-1;Camiseta;Cor;Vermelho;;;;\nABC-1;;Tamanho;M;;;;\n",
            platform_header()
        );

        let result = analyze(&text, &cfg).unwrap();

        assert_eq!(result.kind, TableKind::PlatformExport);
        assert_eq!(result.delimiter, ';');
        assert_eq!(result.key_column, 0);
        assert!(result.key_column_guessed);
        assert_eq!(result.slots.len(), 3);

        // 同键两行合并为一个商品
        assert_eq!(result.products.len(), 1);
        let p = &result.products[0];
        assert_eq!(p.attributes.get("Cor"), Some(&"Vermelho".to_string()));
        assert_eq!(p.attributes.get("Tamanho"), Some(&"M".to_string()));
    }

    #[test]
    fn test_analyze_generic_table() {
        let cfg = PipelineConfig::default();
        let text = "Codigo,Nome,Preco\nABC-1,Camiseta,59\nABC-2,Calça,99\n";

        let result = analyze(text, &cfg).unwrap();

        assert_eq!(result.kind, TableKind::Generic);
        assert_eq!(result.delimiter, ',');
        assert_eq!(result.key_column, 0);
        assert_eq!(result.generic_columns.len(), 2);
        assert!(result.products.is_empty());
        assert_eq!(result.discovered_keys(), vec!["ABC-1", "ABC-2"]);
    }

    #[test]
    fn test_analyze_rejects_markup_keys() {
        let cfg = PipelineConfig::default();
        let text = format!(
            "{}\n<div class=\"x\">;Lixo;Cor;Azul;;;;\nABC-1;Ok;Cor;Verde;;;;\n",
            platform_header()
        );

        let result = analyze(&text, &cfg).unwrap();

        // 标记键整行跳过,即使非空且未超长
        assert_eq!(result.skipped_key_rows, 1);
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].key, "ABC-1");
    }

    #[test]
    fn test_analyze_empty_input_fatal() {
        let cfg = PipelineConfig::default();
        assert!(matches!(
            analyze("   \n  ", &cfg),
            Err(PipelineError::EmptyInput)
        ));
    }
}
