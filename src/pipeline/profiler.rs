// ==========================================
// 商品属性导入系统 - 通用列剖析（通用路径）
// ==========================================
// 职责: 为每个非键列计算填充率/基数/多值启发式
// 用途: 通用表格下供操作员决定哪些列成为属性
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::product::GenericColumnStat;
use crate::domain::table::DecodedTable;
use std::collections::HashSet;

/// 纯数值样判定: 只含数字/小数点/逗号/空格
///
/// "1,5"、"1.234,56" 这类数值不算多值列表
fn is_numeric_like(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == ' ')
}

/// 多值列启发式: 含列表风格逗号且非纯数值
fn looks_multi_value(value: &str) -> bool {
    value.contains(',') && !is_numeric_like(value)
}

/// 剖析全部非键列
pub fn profile_columns(
    table: &DecodedTable,
    key_column: usize,
    cfg: &PipelineConfig,
) -> Vec<GenericColumnStat> {
    let mut stats = Vec::new();

    for (column_index, header) in table.headers.iter().enumerate() {
        if column_index == key_column {
            continue;
        }

        let mut filled_count = 0usize;
        let mut distinct: HashSet<String> = HashSet::new();
        let mut sample_values: Vec<String> = Vec::new();
        let mut is_multi_value = false;

        for row in &table.rows {
            let value = row.get(column_index).map(|v| v.trim()).unwrap_or("");
            if value.is_empty() {
                continue;
            }

            filled_count += 1;
            if distinct.insert(value.to_string()) && sample_values.len() < cfg.generic_sample_cap {
                sample_values.push(value.to_string());
            }
            if !is_multi_value && looks_multi_value(value) {
                is_multi_value = true;
            }
        }

        stats.push(GenericColumnStat {
            name: header.trim().to_string(),
            column_index,
            filled_count,
            distinct_count: distinct.len(),
            sample_values,
            is_multi_value,
            enabled: true,
        });
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DecodedTable {
        DecodedTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            discarded_count: 0,
        }
    }

    #[test]
    fn test_profile_skips_key_column() {
        let t = table(&["SKU", "Cor"], &[&["A", "Azul"]]);
        let stats = profile_columns(&t, 0, &PipelineConfig::default());

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "Cor");
        assert_eq!(stats[0].column_index, 1);
        assert!(stats[0].enabled);
    }

    #[test]
    fn test_profile_counts_and_samples() {
        let t = table(
            &["SKU", "Cor"],
            &[
                &["A", "Azul"],
                &["B", ""],
                &["C", "Azul"],
                &["D", "Verde"],
            ],
        );
        let stats = profile_columns(&t, 0, &PipelineConfig::default());

        let cor = &stats[0];
        assert_eq!(cor.filled_count, 3);
        assert_eq!(cor.distinct_count, 2);
        assert_eq!(cor.sample_values, vec!["Azul", "Verde"]);
    }

    #[test]
    fn test_profile_sample_cap() {
        let rows: Vec<Vec<String>> = (0..10)
            .map(|i| vec![format!("K{}", i), format!("V{}", i)])
            .collect();
        let t = DecodedTable {
            headers: vec!["SKU".to_string(), "Cor".to_string()],
            rows,
            discarded_count: 0,
        };
        let stats = profile_columns(&t, 0, &PipelineConfig::default());

        assert_eq!(stats[0].distinct_count, 10);
        assert_eq!(stats[0].sample_values.len(), 5);
    }

    #[test]
    fn test_multi_value_heuristic() {
        let t = table(
            &["SKU", "Tags", "Peso"],
            &[&["A", "novo, promo, verao", "1,5"]],
        );
        let stats = profile_columns(&t, 0, &PipelineConfig::default());

        let tags = stats.iter().find(|s| s.name == "Tags").unwrap();
        assert!(tags.is_multi_value);

        // 纯数值 "1,5" 不是多值列表
        let peso = stats.iter().find(|s| s.name == "Peso").unwrap();
        assert!(!peso.is_multi_value);
    }
}
