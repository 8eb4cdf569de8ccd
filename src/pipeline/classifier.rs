// ==========================================
// 商品属性导入系统 - 表格结构分类
// ==========================================
// 职责: 键列猜测 + 平台导出槽位检测 + 键有效性规则
// 依据: 平台导出把每个属性摊成"名称 N/值 N"列对;通用表格一列一属性
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::table::{AttributeSlot, TableKind};

/// 键列猜测模式（有序,先命中先赢）
///
/// 第一项为精确匹配,其余为前缀匹配
const KEY_COLUMN_PATTERNS: [(&str, bool); 5] = [
    ("sku", true),     // 精确
    ("cod", false),    // 前缀: codigo/cod_produto/...
    ("codigo", false), // 前缀
    ("ref", false),    // 前缀: referencia/ref/...
    ("part", false),   // 前缀: part number/partnumber/...
];

/// 键字段中出现即判定键列误判的标记片段（HTML/富文本渗入键列）
const KEY_MARKUP_TOKENS: [&str; 5] = ["<", ">", "http", "class=", "\"div"];

/// 猜测键列（SKU 列）
///
/// # 返回
/// - (列下标, 是否命中模式): 未命中任何模式时回退第 0 列,false 仅作提示
pub fn guess_key_column(headers: &[String]) -> (usize, bool) {
    for (pattern, exact) in KEY_COLUMN_PATTERNS {
        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            let hit = if exact {
                h == pattern
            } else {
                h.starts_with(pattern)
            };
            if hit {
                return (idx, true);
            }
        }
    }

    (0, false)
}

/// 在表头中按 trim 后全等查找列
fn find_header_exact(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// 检测平台导出的属性槽位
///
/// # 规则
/// - 对编号 1..=max_slot_number 探测 "<名称标签> N" / "<值标签> N" 列对
/// - 同编号的可见性/全局标志兄弟列一并记录
/// - 已找到至少一对后,连续 slot_gap_limit 个编号缺失即早停
pub fn detect_slots(headers: &[String], cfg: &PipelineConfig) -> Vec<AttributeSlot> {
    let mut slots = Vec::new();
    let mut gap = 0usize;

    for n in 1..=cfg.max_slot_number {
        let name_column = find_header_exact(headers, &format!("{} {}", cfg.attr_name_label, n));
        let value_column = find_header_exact(headers, &format!("{} {}", cfg.attr_value_label, n));

        match (name_column, value_column) {
            (Some(name_column), Some(value_column)) => {
                gap = 0;
                slots.push(AttributeSlot {
                    slot_index: n,
                    name_column,
                    value_column,
                    visibility_column: find_header_exact(
                        headers,
                        &format!("{} {}", cfg.attr_visibility_label, n),
                    ),
                    global_flag_column: find_header_exact(
                        headers,
                        &format!("{} {}", cfg.attr_global_label, n),
                    ),
                });
            }
            _ => {
                if !slots.is_empty() {
                    gap += 1;
                    if gap >= cfg.slot_gap_limit {
                        break;
                    }
                }
            }
        }
    }

    slots
}

/// 表格分类: 槽位对数达到阈值即为平台导出模式
pub fn classify(headers: &[String], cfg: &PipelineConfig) -> (TableKind, Vec<AttributeSlot>) {
    let slots = detect_slots(headers, cfg);
    if slots.len() >= cfg.min_slot_pairs {
        (TableKind::PlatformExport, slots)
    } else {
        (TableKind::Generic, Vec::new())
    }
}

/// 键有效性规则（两条路径通用）
///
/// 拒绝: 空、超长、含标记片段（说明键列误判,装的是标记/散文而非标识符）
pub fn is_valid_key(key: &str, cfg: &PipelineConfig) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return false;
    }
    if key.chars().count() > cfg.max_key_length {
        return false;
    }
    !KEY_MARKUP_TOKENS.iter().any(|token| key.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_guess_key_column_exact_sku() {
        let h = headers(&["Nome", "SKU", "Preco"]);
        assert_eq!(guess_key_column(&h), (1, true));
    }

    #[test]
    fn test_guess_key_column_prefix() {
        let h = headers(&["Nome", "Codigo do Produto"]);
        assert_eq!(guess_key_column(&h), (1, true));

        let h = headers(&["Referencia", "Nome"]);
        assert_eq!(guess_key_column(&h), (0, true));
    }

    #[test]
    fn test_guess_key_column_sku_wins_over_earlier_prefix() {
        // 模式列表有序: 精确 sku 优先于更靠前的 cod 前缀列
        let h = headers(&["Codigo", "sku"]);
        assert_eq!(guess_key_column(&h), (1, true));
    }

    #[test]
    fn test_guess_key_column_fallback() {
        let h = headers(&["Nome", "Preco"]);
        assert_eq!(guess_key_column(&h), (0, false));
    }

    #[test]
    fn test_detect_slots_two_pairs() {
        let h = headers(&[
            "SKU",
            "Nome do atributo 1",
            "Valores do atributo 1",
            "Nome do atributo 2",
            "Valores do atributo 2",
        ]);
        let slots = detect_slots(&h, &PipelineConfig::default());

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].slot_index, 1);
        assert_eq!(slots[0].name_column, 1);
        assert_eq!(slots[0].value_column, 2);
        assert_eq!(slots[1].slot_index, 2);
    }

    #[test]
    fn test_detect_slots_records_sibling_columns() {
        let h = headers(&[
            "SKU",
            "Nome do atributo 1",
            "Valores do atributo 1",
            "Visibilidade do atributo 1",
            "Atributo global 1",
        ]);
        let slots = detect_slots(&h, &PipelineConfig::default());

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].visibility_column, Some(3));
        assert_eq!(slots[0].global_flag_column, Some(4));
    }

    #[test]
    fn test_detect_slots_early_stop_after_gap() {
        // 槽位 1..=3 存在,之后缺失;编号 9 的孤立列对不应被扫描到
        let mut names = vec!["SKU".to_string()];
        for n in 1..=3 {
            names.push(format!("Nome do atributo {}", n));
            names.push(format!("Valores do atributo {}", n));
        }
        names.push("Nome do atributo 9".to_string());
        names.push("Valores do atributo 9".to_string());

        let slots = detect_slots(&names, &PipelineConfig::default());
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_classify_platform_export_at_threshold() {
        let mut names = vec!["SKU".to_string()];
        for n in 1..=3 {
            names.push(format!("Nome do atributo {}", n));
            names.push(format!("Valores do atributo {}", n));
        }

        let (kind, slots) = classify(&names, &PipelineConfig::default());
        assert_eq!(kind, TableKind::PlatformExport);
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_classify_generic_below_threshold() {
        // 只有 2 对槽位 → 低于阈值 3,按通用表格处理
        let h = headers(&[
            "SKU",
            "Nome do atributo 1",
            "Valores do atributo 1",
            "Nome do atributo 2",
            "Valores do atributo 2",
        ]);

        let (kind, slots) = classify(&h, &PipelineConfig::default());
        assert_eq!(kind, TableKind::Generic);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_key_validity() {
        let cfg = PipelineConfig::default();

        assert!(is_valid_key("ABC-123", &cfg));
        assert!(!is_valid_key("", &cfg));
        assert!(!is_valid_key("   ", &cfg));
        assert!(!is_valid_key(&"X".repeat(51), &cfg));
        // 非空且未超长,但含标记片段 → 拒绝
        assert!(!is_valid_key(r#"<div class="x">"#, &cfg));
        assert!(!is_valid_key("http://loja.com/p/1", &cfg));
    }
}
