// ==========================================
// 商品属性导入系统 - 管道配置
// ==========================================
// 职责: 结构分析与对账的可调参数全集
// 红线: 槽位扫描上限/早停阈值等不得以魔法数字散落在管道代码中
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PipelineConfig - 结构分析配置
// ==========================================
// 说明: 不同来源平台的槽位上限/标签不同,全部集中在此
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    // ===== 槽位扫描 =====
    pub max_slot_number: usize,   // 槽位编号扫描上限 N（1..=N）
    pub slot_gap_limit: usize,    // 已找到槽位后,连续缺失多少个编号即早停
    pub min_slot_pairs: usize,    // 判定为平台导出模式所需的最少槽位对数

    // ===== 槽位标签（平台导出列名,不含编号部分）=====
    pub attr_name_label: String,        // 属性名称列标签
    pub attr_value_label: String,       // 属性值列标签
    pub attr_visibility_label: String,  // 可见性兄弟列标签（可选列）
    pub attr_global_label: String,      // 全局标志兄弟列标签（可选列）

    // ===== 键与展示名 =====
    pub max_key_length: usize,          // 键最大长度（字符数,超出视为键列误判）
    pub display_name_headers: Vec<String>, // 展示名称候选列名（命中即取）

    // ===== 样本上限 =====
    pub attribute_sample_cap: usize,    // UniqueAttribute 取值样本上限
    pub generic_sample_cap: usize,      // GenericColumnStat 取值样本上限
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_slot_number: 200,
            slot_gap_limit: 5,
            min_slot_pairs: 3,
            attr_name_label: "Nome do atributo".to_string(),
            attr_value_label: "Valores do atributo".to_string(),
            attr_visibility_label: "Visibilidade do atributo".to_string(),
            attr_global_label: "Atributo global".to_string(),
            max_key_length: 50,
            display_name_headers: vec!["Nome".to_string(), "Name".to_string()],
            attribute_sample_cap: 30,
            generic_sample_cap: 5,
        }
    }
}

// ==========================================
// ReconcileConfig - 对账网络调用配置
// ==========================================
// 说明: 超时与重试只约束对账这一跨进程调用,结构分析本身无悬挂点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub max_attempts: u32,        // 最大尝试次数（有界重试,不做无限重试）
    pub retry_backoff_ms: u64,    // 重试间隔基数（毫秒,线性退避）
    pub request_timeout_ms: u64,  // 单次请求超时（毫秒）
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff_ms: 500,
            request_timeout_ms: 5_000,
        }
    }
}
