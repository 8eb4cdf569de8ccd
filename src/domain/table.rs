// ==========================================
// 商品属性导入系统 - 表格结构领域模型
// ==========================================
// 职责: 描述解码后的表格及其结构分析结果
// 用途: 分词层写入,分类/透视层只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DecodedTable - 解码后的表格
// ==========================================
// 不变量: rows 中每一行的字段数都等于 headers.len()（修复之后）
// 说明: 表头按位置唯一,名称允许重复
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedTable {
    // ===== 结构 =====
    pub headers: Vec<String>,      // 表头（有序）
    pub rows: Vec<Vec<String>>,    // 数据行,每行字段数 == headers.len()

    // ===== 修复统计 =====
    pub discarded_count: usize,    // 无法修复而丢弃的行数
}

impl DecodedTable {
    /// 表头宽度 W
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// 按表头名（不区分大小写,trim 后比较）查找列下标
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let target = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == target)
    }
}

// ==========================================
// TableKind - 表格分类结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    /// 平台导出模式: 属性占据重复的"名称N/值N"列对
    PlatformExport,
    /// 通用表格: 每个属性独占一列
    Generic,
}

// ==========================================
// AttributeSlot - 属性槽位
// ==========================================
// 代表一组 "属性名称 N / 属性值 N" 列对
// 生命周期: 每次分析运行从表头计算一次,之后不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSlot {
    pub slot_index: usize,                  // 槽位编号 N
    pub name_column: usize,                 // 属性名称列下标
    pub value_column: usize,                // 属性值列下标
    pub visibility_column: Option<usize>,   // 可见性列下标（同编号的兄弟列,可选）
    pub global_flag_column: Option<usize>,  // 全局标志列下标（同编号的兄弟列,可选）
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_column_case_insensitive() {
        let table = DecodedTable {
            headers: vec!["SKU".to_string(), " Nome ".to_string()],
            rows: vec![],
            discarded_count: 0,
        };

        assert_eq!(table.find_column("sku"), Some(0));
        assert_eq!(table.find_column("nome"), Some(1));
        assert_eq!(table.find_column("preço"), None);
    }
}
