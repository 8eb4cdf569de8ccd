// ==========================================
// 商品属性导入系统 - 命令行主入口
// ==========================================
// 职责: 批处理模式,单文件 分析 → (可选)落库 → 规范导出
// 用法: product-attr-import <文件路径> [--import] [--out <导出路径>]
// ==========================================

use product_attr_import::api::ImportApi;
use product_attr_import::logging;
use std::path::PathBuf;
use std::process::ExitCode;

/// 默认数据库路径（环境变量 PRODUCT_ATTR_DB 优先）
fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("PRODUCT_ATTR_DB") {
        return path;
    }

    dirs::data_dir()
        .map(|dir| dir.join("product-attr-import").join("product_attr.db"))
        .and_then(|p| p.to_str().map(|s| s.to_string()))
        .unwrap_or_else(|| "product_attr.db".to_string())
}

fn print_usage() {
    println!("用法: product-attr-import <文件路径> [--import] [--out <导出路径>]");
    println!();
    println!("  <文件路径>        待分析文件 (csv/txt/xls/xlsx)");
    println!("  --import          分析后将透视商品落库");
    println!("  --out <导出路径>  规范导出写入路径 (默认打印到标准输出)");
    println!();
    println!("  环境变量 PRODUCT_ATTR_DB 指定数据库路径");
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let file_path = args[0].clone();
    let do_import = args.iter().any(|a| a == "--import");
    let out_path: Option<PathBuf> = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let db_path = get_default_db_path();
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("无法创建数据库目录 {}: {}", parent.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", product_attr_import::APP_NAME, product_attr_import::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let api = ImportApi::new(db_path);

    // === 分析 ===
    let response = match api.analyze_file(&file_path).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("分析失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("结构判定: {:?}", response.analysis.kind);
    println!("分隔符: {:?}", response.analysis.delimiter);
    println!(
        "键列: {} (第{}列{})",
        response.analysis.key_column_header,
        response.analysis.key_column,
        if response.analysis.key_column_guessed {
            ""
        } else {
            ", 未命中模式回退"
        }
    );
    println!("透视商品数: {}", response.analysis.products.len());
    println!("全局属性数: {}", response.analysis.unique_attributes.len());
    println!("跳过无效键行: {}", response.analysis.skipped_key_rows);
    println!("丢弃畸形行: {}", response.analysis.table.discarded_count);

    match &response.reconcile {
        Some(summary) => {
            println!(
                "对账: 命中 {} (精确 {} / 归一化 {} / 激进 {}), 未命中 {}",
                summary.matched,
                summary.exact,
                summary.normalized,
                summary.aggressive,
                summary.unmatched
            );
        }
        None => println!("对账: 商品目录不可用,已跳过"),
    }

    // === 可选落库 ===
    if do_import {
        match api.import_products(&response.analysis, &response.run_id).await {
            Ok(r) => println!("落库完成: {} 条商品属性", r.persisted),
            Err(e) => {
                eprintln!("落库失败: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    // === 规范导出 ===
    match out_path {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &response.canonical_export) {
                eprintln!("导出写入失败 {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            println!("规范导出已写入: {}", path.display());
        }
        None => {
            println!();
            print!("{}", response.canonical_export);
        }
    }

    ExitCode::SUCCESS
}
