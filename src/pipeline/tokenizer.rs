// ==========================================
// 商品属性导入系统 - 行分词与修复
// ==========================================
// 职责: 分隔文本 → DecodedTable（表头 + 等宽数据行）
// 引号规则: 引号字段内的双写引号是转义字面量;引号内的分隔符不是字段边界
// 修复规则: W 接受;W+1 且末字段为空截断;[W-2, W-1] 补空;其余丢弃计数
// 依据: 含自由文本字段的导出常被内嵌分隔符打坏,必须优雅降级而非整体失败
// ==========================================

use crate::domain::table::DecodedTable;
use crate::pipeline::error::{PipelineError, PipelineResult};

/// 按任意换行风格切分并跳过空行
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// 引号感知的单行分词
///
/// 字段在去引号之后 trim 两端空白
pub fn tokenize_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // 双写引号 = 转义的字面量引号
                    buf.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(buf.trim().to_string());
                buf.clear();
            }
            c => buf.push(c),
        }
    }
    fields.push(buf.trim().to_string());

    fields
}

/// 分词 + 行形状修复
///
/// # 参数
/// - text: 解码后的分隔文本
/// - delimiter: 分隔符（由 format_detector 推断）
///
/// # 返回
/// - DecodedTable: 每行字段数 == 表头宽度;无法修复的行已丢弃并计数
///
/// # 错误
/// - EmptyInput: 文本不含任何非空行
pub fn tokenize(text: &str, delimiter: char) -> PipelineResult<DecodedTable> {
    let lines = split_lines(text);
    if lines.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let headers = tokenize_line(lines[0], delimiter);
    if headers.iter().all(|h| h.is_empty()) {
        return Err(PipelineError::NoHeaderRow);
    }
    let width = headers.len();

    let mut rows = Vec::new();
    let mut discarded_count = 0usize;

    for line in &lines[1..] {
        let mut fields = tokenize_line(line, delimiter);

        if fields.len() == width {
            rows.push(fields);
        } else if fields.len() == width + 1
            && fields.last().map(|f| f.is_empty()).unwrap_or(false)
        {
            // 行尾分隔符残留: 多出的最后一个空字段截掉
            fields.pop();
            rows.push(fields);
        } else if fields.len() < width && fields.len() + 2 >= width {
            // 缺 1~2 个字段: 补空接受
            fields.resize(width, String::new());
            rows.push(fields);
        } else {
            discarded_count += 1;
        }
    }

    Ok(DecodedTable {
        headers,
        rows,
        discarded_count,
    })
}
