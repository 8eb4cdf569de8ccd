// ==========================================
// 商品属性导入系统 - 分隔符探测
// ==========================================
// 职责: 从解码文本的首行推断字段分隔符
// 依据: 解码器惯例输出分号,原始文本上传常见逗号/制表符
// 红线: 引号内出现的分隔符字符不得计入
// ==========================================

/// 规范输出分隔符（同时也是探测失败时的回退值）
pub const CANONICAL_DELIMITER: char = ';';

/// 探测首行的字段分隔符
///
/// # 规则
/// - 只统计引号外的分号/逗号/制表符出现次数
/// - 次数最高者胜出,并列时 tab > 分号 > 逗号
/// - 首行完全不含分隔符（单列表格）时回退为分号
pub fn detect_delimiter(first_line: &str) -> char {
    let mut semicolons = 0usize;
    let mut commas = 0usize;
    let mut tabs = 0usize;
    let mut in_quotes = false;

    for c in first_line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => semicolons += 1,
            ',' if !in_quotes => commas += 1,
            '\t' if !in_quotes => tabs += 1,
            _ => {}
        }
    }

    if semicolons == 0 && commas == 0 && tabs == 0 {
        return CANONICAL_DELIMITER;
    }

    // 并列裁决顺序: tab > 分号 > 逗号（仅严格更高才替换,先到者赢）
    let candidates = [('\t', tabs), (';', semicolons), (',', commas)];
    let mut best = (CANONICAL_DELIMITER, 0usize);
    for (delim, count) in candidates {
        if count > best.1 {
            best = (delim, count);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pure_comma() {
        assert_eq!(detect_delimiter("sku,nome,preco"), ',');
    }

    #[test]
    fn test_detect_pure_semicolon() {
        assert_eq!(detect_delimiter("sku;nome;preco"), ';');
    }

    #[test]
    fn test_detect_pure_tab() {
        assert_eq!(detect_delimiter("sku\tnome\tpreco"), '\t');
    }

    #[test]
    fn test_quoted_commas_do_not_fool_detection() {
        // 引号字段内有 3 个逗号,真实分隔符是 2 个分号
        let line = r#"sku;"Camiseta, azul, M, algodão";preco"#;
        assert_eq!(detect_delimiter(line), ';');
    }

    #[test]
    fn test_tie_break_tab_over_semicolon() {
        assert_eq!(detect_delimiter("a\tb;c"), '\t');
    }

    #[test]
    fn test_tie_break_semicolon_over_comma() {
        assert_eq!(detect_delimiter("a;b,c"), ';');
    }

    #[test]
    fn test_no_delimiter_falls_back_to_semicolon() {
        assert_eq!(detect_delimiter("coluna_unica"), ';');
    }
}
