// ==========================================
// 商品属性导入系统 - 属性透视（平台导出路径）
// ==========================================
// 职责: 行内重复槽位 → 每商品一条扁平属性映射,同键行合并
// 合并语义: 同名属性后值覆盖前值;display_name 只回填不清空
// 红线: 不产生零属性的空商品
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::product::{PivotedProduct, UniqueAttribute};
use crate::domain::table::{AttributeSlot, DecodedTable};
use std::collections::{HashMap, HashSet};

// ==========================================
// PivotOutcome - 透视产出
// ==========================================
#[derive(Debug, Clone)]
pub struct PivotOutcome {
    pub products: Vec<PivotedProduct>,           // 按键首次出现顺序
    pub unique_attributes: Vec<UniqueAttribute>, // 按 product_count 降序
}

/// 单属性聚合中间态
#[derive(Default)]
struct AttrAgg {
    keys: HashSet<String>,           // 拥有该属性的商品键集合
    distinct_values: HashSet<String>, // 全部不同取值
    samples: Vec<String>,            // 封顶样本（按出现顺序）
}

/// 清洗属性名: trim + 去掉尾部冒号
fn clean_attr_name(raw: &str) -> String {
    raw.trim().trim_end_matches(':').trim().to_string()
}

/// 反转义属性值中被反斜杠转义的分隔符字符
fn unescape_delimiters(raw: &str) -> String {
    raw.replace("\\;", ";").replace("\\,", ",")
}

/// 透视平台导出表格
///
/// # 参数
/// - table: 修复后的表格（行已通过键有效性过滤）
/// - key_column: 键列下标
/// - slots: 检测到的属性槽位
///
/// # 流程（逐行）
/// 1. 读键与展示名（Nome/Name 列,若存在）
/// 2. 逐槽位读名称/值对;任一侧 trim 后为空则跳过该槽位
/// 3. 零属性行整行丢弃
/// 4. 按键合并进商品映射,同时更新全局属性聚合
pub fn pivot(
    table: &DecodedTable,
    key_column: usize,
    slots: &[AttributeSlot],
    cfg: &PipelineConfig,
) -> PivotOutcome {
    // 展示名列: 候选列名先到先得
    let display_name_column = cfg
        .display_name_headers
        .iter()
        .find_map(|name| table.find_column(name));

    let mut products: Vec<PivotedProduct> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut attr_aggs: HashMap<String, AttrAgg> = HashMap::new();

    for row in &table.rows {
        let key = match row.get(key_column) {
            Some(k) => k.trim().to_string(),
            None => continue,
        };

        // 本行贡献的属性对
        let mut row_attrs: Vec<(String, String)> = Vec::new();
        for slot in slots {
            let name = row.get(slot.name_column).map(|s| s.trim()).unwrap_or("");
            let value = row.get(slot.value_column).map(|s| s.trim()).unwrap_or("");
            if name.is_empty() || value.is_empty() {
                continue;
            }

            let name = clean_attr_name(name);
            if name.is_empty() {
                continue;
            }
            row_attrs.push((name, unescape_delimiters(value)));
        }

        // 零属性行: 整行丢弃,不产生空商品
        if row_attrs.is_empty() {
            continue;
        }

        let display_name = display_name_column
            .and_then(|idx| row.get(idx))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        // 按键合并
        match index_by_key.get(&key) {
            Some(&idx) => {
                let product = &mut products[idx];
                for (name, value) in &row_attrs {
                    product.attributes.insert(name.clone(), value.clone());
                }
                // display_name 只回填,不覆盖已有值
                if product.display_name.is_empty() && !display_name.is_empty() {
                    product.display_name = display_name;
                }
            }
            None => {
                let mut attributes = HashMap::new();
                for (name, value) in &row_attrs {
                    attributes.insert(name.clone(), value.clone());
                }
                index_by_key.insert(key.clone(), products.len());
                products.push(PivotedProduct {
                    key: key.clone(),
                    display_name,
                    attributes,
                });
            }
        }

        // 全局聚合: product_count 按不同键计数,不按行计数
        for (name, value) in row_attrs {
            let agg = attr_aggs.entry(name).or_default();
            agg.keys.insert(key.clone());
            if agg.distinct_values.insert(value.clone())
                && agg.samples.len() < cfg.attribute_sample_cap
            {
                agg.samples.push(value);
            }
        }
    }

    let unique_attributes = finalize_attributes(attr_aggs, products.len());

    PivotOutcome {
        products,
        unique_attributes,
    }
}

/// 聚合收口: 计算填充率并排序
fn finalize_attributes(
    attr_aggs: HashMap<String, AttrAgg>,
    total_products: usize,
) -> Vec<UniqueAttribute> {
    let mut attributes: Vec<UniqueAttribute> = attr_aggs
        .into_iter()
        .map(|(name, agg)| {
            let product_count = agg.keys.len();
            let fill_percent = if total_products == 0 {
                0
            } else {
                (product_count as f64 / total_products as f64 * 100.0).round() as u8
            };
            UniqueAttribute {
                name,
                product_count,
                fill_percent,
                distinct_value_count: agg.distinct_values.len(),
                sample_values: agg.samples,
                enabled: true,
            }
        })
        .collect();

    // 降序;并列按名称升序,保证导出列序稳定
    attributes.sort_by(|a, b| {
        b.product_count
            .cmp(&a.product_count)
            .then_with(|| a.name.cmp(&b.name))
    });

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(n: usize, name_column: usize, value_column: usize) -> AttributeSlot {
        AttributeSlot {
            slot_index: n,
            name_column,
            value_column,
            visibility_column: None,
            global_flag_column: None,
        }
    }

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
    fn test_pivot_merges_rows_with_same_key() {
        let t = table(
            &["SKU", "Nome", "Attr N 1", "Attr V 1"],
            &[
                &["ABC-1", "Camiseta", "Cor", "Vermelho"],
                &["ABC-1", "", "Tamanho", "M"],
            ],
        );
        let outcome = pivot(&t, 0, &[slot(1, 2, 3)], &PipelineConfig::default());

        assert_eq!(outcome.products.len(), 1);
        let p = &outcome.products[0];
        assert_eq!(p.key, "ABC-1");
        assert_eq!(p.display_name, "Camiseta");
        assert_eq!(p.attributes.get("Cor"), Some(&"Vermelho".to_string()));
        assert_eq!(p.attributes.get("Tamanho"), Some(&"M".to_string()));
    }

    #[test]
    fn test_pivot_overwrites_same_attribute_name() {
        let t = table(
            &["SKU", "Attr N 1", "Attr V 1"],
            &[
                &["ABC-1", "Cor", "Vermelho"],
                &["ABC-1", "Cor", "Azul"],
            ],
        );
        let outcome = pivot(&t, 0, &[slot(1, 1, 2)], &PipelineConfig::default());

        assert_eq!(outcome.products.len(), 1);
        assert_eq!(
            outcome.products[0].attributes.get("Cor"),
            Some(&"Azul".to_string())
        );
        // 去重后只有 1 个商品拥有 Cor
        assert_eq!(outcome.unique_attributes[0].product_count, 1);
        assert_eq!(outcome.unique_attributes[0].distinct_value_count, 2);
    }

    #[test]
    fn test_pivot_backfills_display_name() {
        let t = table(
            &["SKU", "Nome", "Attr N 1", "Attr V 1"],
            &[
                &["ABC-1", "", "Cor", "Vermelho"],
                &["ABC-1", "Camiseta", "Tamanho", "M"],
            ],
        );
        let outcome = pivot(&t, 0, &[slot(1, 2, 3)], &PipelineConfig::default());

        assert_eq!(outcome.products[0].display_name, "Camiseta");
    }

    #[test]
    fn test_pivot_drops_rows_with_no_attributes() {
        let t = table(
            &["SKU", "Attr N 1", "Attr V 1"],
            &[
                &["ABC-1", "Cor", ""],   // 值为空 → 槽位跳过 → 零属性行
                &["ABC-2", "", "Azul"],  // 名为空 → 同上
                &["ABC-3", "Cor", "Azul"],
            ],
        );
        let outcome = pivot(&t, 0, &[slot(1, 1, 2)], &PipelineConfig::default());

        assert_eq!(outcome.products.len(), 1);
        assert_eq!(outcome.products[0].key, "ABC-3");
    }

    #[test]
    fn test_pivot_cleans_name_and_unescapes_value() {
        let t = table(
            &["SKU", "Attr N 1", "Attr V 1"],
            &[&["ABC-1", "Cor:", r"Vermelho\; Escuro"]],
        );
        let outcome = pivot(&t, 0, &[slot(1, 1, 2)], &PipelineConfig::default());

        let p = &outcome.products[0];
        assert_eq!(
            p.attributes.get("Cor"),
            Some(&"Vermelho; Escuro".to_string())
        );
    }

    #[test]
    fn test_unique_attributes_sorted_and_fill_percent() {
        let t = table(
            &["SKU", "Attr N 1", "Attr V 1", "Attr N 2", "Attr V 2"],
            &[
                &["A", "Cor", "Vermelho", "Tamanho", "M"],
                &["B", "Cor", "Azul", "", ""],
                &["C", "Cor", "Verde", "", ""],
            ],
        );
        let outcome = pivot(
            &t,
            0,
            &[slot(1, 1, 2), slot(2, 3, 4)],
            &PipelineConfig::default(),
        );

        assert_eq!(outcome.unique_attributes.len(), 2);
        let cor = &outcome.unique_attributes[0];
        assert_eq!(cor.name, "Cor");
        assert_eq!(cor.product_count, 3);
        assert_eq!(cor.fill_percent, 100);
        assert_eq!(cor.distinct_value_count, 3);

        let tamanho = &outcome.unique_attributes[1];
        assert_eq!(tamanho.product_count, 1);
        assert_eq!(tamanho.fill_percent, 33);
    }
}
