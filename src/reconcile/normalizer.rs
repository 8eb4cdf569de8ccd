// ==========================================
// 商品属性导入系统 - 键归一化层级链
// ==========================================
// 职责: 有序的纯归一化函数列表,对账逐层套用在未命中余集上
// 依据: 不同系统间 SKU 书写差异（连字符/大小写/前导零)——仅精确匹配
//       漏配过多,单次激进匹配又易误配,故按宽松程度分层递进
// 说明: 新增层级只需在 tier_chain 中插入一项,调用方无需改动
// ==========================================

use crate::domain::matching::MatchTier;

/// 层级归一化函数签名
pub type TierNormalizer = fn(&str) -> String;

/// 层级1: 原样（精确匹配）
fn identity(key: &str) -> String {
    key.to_string()
}

/// 层级2: 小写 + 去掉非字母数字分隔符
pub fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// 层级3: 层级2基础上再去掉前导零
///
/// 制造商前缀/后缀剥离规则在原始数据中未有定论,刻意不做猜测;
/// 拿到参考样本后作为新层级插入
pub fn normalize_aggressive(key: &str) -> String {
    let normalized = normalize(key);
    normalized.trim_start_matches('0').to_string()
}

/// 有序层级链（由紧到松）
pub fn tier_chain() -> Vec<(MatchTier, TierNormalizer)> {
    vec![
        (MatchTier::Exact, identity),
        (MatchTier::Normalized, normalize),
        (MatchTier::Aggressive, normalize_aggressive),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators_and_case() {
        assert_eq!(normalize("ABC-001"), "abc001");
        assert_eq!(normalize("abc_001"), "abc001");
        assert_eq!(normalize("ABC 001/X"), "abc001x");
    }

    #[test]
    fn test_normalize_aggressive_strips_leading_zeros() {
        assert_eq!(normalize_aggressive("0ABC001"), "abc001");
        assert_eq!(normalize_aggressive("007-X"), "7x");
    }

    #[test]
    fn test_aggressive_all_zero_key_collapses_to_empty() {
        // 空归一化形態在匹配层跳过,不参与命中
        assert_eq!(normalize_aggressive("000"), "");
    }

    #[test]
    fn test_tier_chain_order() {
        let chain = tier_chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].0, MatchTier::Exact);
        assert_eq!(chain[1].0, MatchTier::Normalized);
        assert_eq!(chain[2].0, MatchTier::Aggressive);
    }
}
