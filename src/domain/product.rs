// ==========================================
// 商品属性导入系统 - 商品属性领域模型
// ==========================================
// 职责: 透视/剖析阶段的产出实体与整体分析结果
// 红线: 实体只属于产生它的那次分析运行,不跨运行共享
// ==========================================

use crate::domain::table::{AttributeSlot, DecodedTable, TableKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// PivotedProduct - 透视后的商品
// ==========================================
// 不变量: key 非空且通过键有效性规则;同 key 的行已合并
// 合并语义: 同名属性后值覆盖前值;display_name 只回填不清空
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotedProduct {
    pub key: String,                          // 商品唯一标识（SKU）
    pub display_name: String,                 // 展示名称（来自 Nome/Name 列,可为空）
    pub attributes: HashMap<String, String>,  // 属性名 → 属性值（键唯一）
}

// ==========================================
// UniqueAttribute - 全局属性聚合
// ==========================================
// 不变量: product_count <= 透视后商品总数
// 排序: 按 product_count 降序（并列时按名称升序,保证导出列序稳定）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueAttribute {
    pub name: String,                 // 属性名（trim 后,去掉尾部冒号）
    pub product_count: usize,         // 拥有该属性的商品数（按 key 去重,不按行计数）
    pub fill_percent: u8,             // 填充率 = round(product_count / 商品总数 * 100)
    pub distinct_value_count: usize,  // 不同取值个数
    pub sample_values: Vec<String>,   // 取值样本（≤30 个不同值,按出现顺序）
    pub enabled: bool,                // 是否进入规范导出（默认 true,操作员可关闭）
}

// ==========================================
// GenericColumnStat - 通用路径列统计
// ==========================================
// 用途: 通用表格下供操作员选择哪些列成为属性
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericColumnStat {
    pub name: String,                // 列名
    pub column_index: usize,         // 原始列下标
    pub filled_count: usize,         // 非空值个数（trim 后）
    pub distinct_count: usize,       // 不同取值个数
    pub sample_values: Vec<String>,  // 前 5 个不同取值（按出现顺序）
    pub is_multi_value: bool,        // 多值列启发式（逗号分隔列表且非纯数值）
    pub enabled: bool,               // 是否进入规范导出（默认 true）
}

// ==========================================
// AnalysisResult - 单次分析运行的完整产出
// ==========================================
// 说明: analyze() 的返回值,无环境状态;批处理/API/测试均可直接调用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    // ===== 结构判定 =====
    pub kind: TableKind,                  // 平台导出 / 通用表格
    pub delimiter: char,                  // 推断出的字段分隔符
    pub key_column: usize,                // 键列下标
    pub key_column_header: String,        // 键列表头名
    pub key_column_guessed: bool,         // false = 未命中任何模式,回退到第 0 列（提示性信息,非错误）

    // ===== 解码结果 =====
    pub table: DecodedTable,              // 修复后的表格（通用路径导出仍需原始行）
    pub slots: Vec<AttributeSlot>,        // 检测到的属性槽位（通用路径为空）

    // ===== 平台导出路径产出 =====
    pub products: Vec<PivotedProduct>,    // 透视后的商品（按首次出现顺序）
    pub unique_attributes: Vec<UniqueAttribute>, // 全局属性聚合（降序）

    // ===== 通用路径产出 =====
    pub generic_columns: Vec<GenericColumnStat>, // 非键列统计

    // ===== 行级统计 =====
    pub skipped_key_rows: usize,          // 因键无效而整行跳过的行数
}

impl AnalysisResult {
    /// 本次运行发现的全部键（用于对账,两条路径语义一致）
    ///
    /// - 平台导出路径: 透视后商品的 key（已去重）
    /// - 通用路径: 数据行键列的有效值（按出现顺序去重）
    pub fn discovered_keys(&self) -> Vec<String> {
        match self.kind {
            TableKind::PlatformExport => {
                self.products.iter().map(|p| p.key.clone()).collect()
            }
            TableKind::Generic => {
                let mut seen = std::collections::HashSet::new();
                let mut keys = Vec::new();
                for row in &self.table.rows {
                    if let Some(key) = row.get(self.key_column) {
                        let key = key.trim();
                        if !key.is_empty() && seen.insert(key.to_string()) {
                            keys.push(key.to_string());
                        }
                    }
                }
                keys
            }
        }
    }
}
