// ==========================================
// 商品属性导入系统 - 文件解码器实现
// ==========================================
// 职责: 上传文件 → 单一分隔文本（管道唯一接受的输入形态）
// 支持: Excel (.xlsx/.xls) / 文本 (.csv/.txt)
// 契约: 单行表头 + 数据行,UTF-8,内嵌分隔符/引号用标准引号规则保留
// ==========================================

use crate::decoder::error::{DecodeError, DecodeResult};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Reader, Sheets};
use csv::WriterBuilder;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// 支持的扩展名集合
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["csv", "txt", "xls", "xlsx"];

// ==========================================
// Text Decoder 实现
// ==========================================
// 说明: csv/txt 原样透传,编码检测失败时降级为有损 UTF-8
pub struct TextDecoder;

impl TextDecoder {
    pub fn decode(&self, file_path: &Path) -> DecodeResult<String> {
        let bytes = std::fs::read(file_path)?;
        Ok(Self::bytes_to_string(&bytes))
    }

    /// UTF-8 优先,失败则有损替换（导出文件偶见 Latin-1 杂字节）
    pub fn bytes_to_string(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        }
    }
}

// ==========================================
// Excel Decoder 实现
// ==========================================
pub struct ExcelDecoder;

impl ExcelDecoder {
    pub fn decode(&self, file_path: &Path) -> DecodeResult<String> {
        let workbook = open_workbook_auto(file_path)
            .map_err(|e| DecodeError::ExcelParseError(e.to_string()))?;
        Self::workbook_to_text(workbook)
    }

    pub fn decode_bytes(&self, bytes: &[u8]) -> DecodeResult<String> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| DecodeError::ExcelParseError(e.to_string()))?;
        Self::workbook_to_text(workbook)
    }

    /// 取第一个工作表,逐行写出为分号分隔文本
    fn workbook_to_text<RS: Read + Seek>(mut workbook: Sheets<RS>) -> DecodeResult<String> {
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(DecodeError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| DecodeError::ExcelParseError(e.to_string()))?;

        let mut writer = WriterBuilder::new().delimiter(b';').from_writer(vec![]);
        for row in range.rows() {
            // 单元格内嵌换行压平为空格: 分词层按行扫描,原样写出会破坏往返解析
            let fields: Vec<String> = row
                .iter()
                .map(|cell| flatten_newlines(&cell.to_string()))
                .collect();
            writer.write_record(&fields)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DecodeError::InternalError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DecodeError::InternalError(e.to_string()))
    }
}

/// 内嵌 CR/LF → 空格
fn flatten_newlines(value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        value
            .replace("\r\n", " ")
            .replace(['\r', '\n'], " ")
    } else {
        value.to_string()
    }
}

// ==========================================
// 通用文件解码器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileDecoder;

impl UniversalFileDecoder {
    /// 从文件路径解码
    ///
    /// # 返回
    /// - Ok(String): 分隔文本（保证非空）
    /// - Err(DecodeError): UnsupportedFormat / EmptyInput / 读取失败
    pub fn decode<P: AsRef<Path>>(&self, file_path: P) -> DecodeResult<String> {
        let path = file_path.as_ref();

        if !path.exists() {
            return Err(DecodeError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let text = match ext.as_str() {
            "csv" | "txt" => TextDecoder.decode(path)?,
            "xlsx" | "xls" => ExcelDecoder.decode(path)?,
            _ => return Err(DecodeError::UnsupportedFormat(ext)),
        };

        Self::reject_empty(text)
    }

    /// 从字节流 + 扩展名提示解码
    pub fn decode_bytes(&self, bytes: &[u8], ext_hint: &str) -> DecodeResult<String> {
        let ext = ext_hint.trim_start_matches('.').to_lowercase();

        let text = match ext.as_str() {
            "csv" | "txt" => TextDecoder::bytes_to_string(bytes),
            "xlsx" | "xls" => ExcelDecoder.decode_bytes(bytes)?,
            _ => return Err(DecodeError::UnsupportedFormat(ext)),
        };

        Self::reject_empty(text)
    }

    /// 空内容在分词开始前拒绝
    fn reject_empty(text: String) -> DecodeResult<String> {
        if text.trim().is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        Ok(text)
    }
}
