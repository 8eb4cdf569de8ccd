// ==========================================
// 商品属性导入系统 - 键对账领域模型
// ==========================================
// 职责: 描述发现键与商品目录键之间的分层匹配结果
// 不变量: matched_keys 与 unmatched_keys 不相交,并集 = 全部发现键
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// MatchTier - 匹配层级
// ==========================================
// 一个层级对应一条归一化规则;层级按宽松程度递增依次执行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchTier {
    /// 层级1: 字符串完全相等
    Exact,
    /// 层级2: 归一化后相等（小写 + 去掉非字母数字分隔符）
    Normalized,
    /// 层级3: 激进归一化后相等（额外去掉前导零）
    Aggressive,
}

// ==========================================
// TierCounts - 各层级命中统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub exact: usize,       // 层级1命中数
    pub normalized: usize,  // 层级2命中数
    pub aggressive: usize,  // 层级3命中数
}

impl TierCounts {
    /// 记录一次指定层级的命中
    pub fn record(&mut self, tier: MatchTier) {
        match tier {
            MatchTier::Exact => self.exact += 1,
            MatchTier::Normalized => self.normalized += 1,
            MatchTier::Aggressive => self.aggressive += 1,
        }
    }
}

// ==========================================
// MatchResult - 对账结果
// ==========================================
// 用途: 仅供操作员审查各层级命中情况,不影响结构分析
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub total_catalog_keys: usize,      // 商品目录键全集大小
    pub matched_keys: HashSet<String>,  // 命中任一层级的发现键
    pub unmatched_keys: HashSet<String>, // 未命中任何层级的发现键
    pub tier_counts: TierCounts,        // 各层级命中统计
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_counts_record() {
        let mut counts = TierCounts::default();
        counts.record(MatchTier::Exact);
        counts.record(MatchTier::Exact);
        counts.record(MatchTier::Aggressive);

        assert_eq!(counts.exact, 2);
        assert_eq!(counts.normalized, 0);
        assert_eq!(counts.aggressive, 1);
    }
}
