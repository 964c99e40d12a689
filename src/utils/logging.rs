//! 日志工具模块
//!
//! 提供日志初始化和控制台进度输出的辅助函数

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::CollectionRequest;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 verbose 选择 info / debug。
/// chromiumoxide 自身的日志只保留 warn 以上。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},chromiumoxide=warn", default_level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(request: &CollectionRequest, output_path: &Path) {
    info!("{}", "=".repeat(50));
    info!("知乎收藏夹下载工具");
    info!("收藏夹ID: {}", request.collection_id);
    info!("抓取模式: {}", request.content_mode.description());
    info!("页码范围: {}", request.page_range.description());
    info!("输出文件: {}", output_path.display());
    info!("{}", "=".repeat(50));
}

/// 记录单页开始
pub fn log_page_start(page: u32) {
    info!("\n===== 开始处理第 {} 页 =====", page);
}

/// 记录单页完成
pub fn log_page_complete(page: u32, items: usize) {
    info!("===== 第 {} 页处理完成，共 {} 项 =====", page, items);
}

/// 打印最终统计信息
pub fn print_final_stats(total_items: usize, pages_loaded: usize, pages_empty: usize, output_path: &Path) {
    let shown = std::fs::canonicalize(output_path).unwrap_or_else(|_| output_path.to_path_buf());
    info!("\n{}", "=".repeat(50));
    info!("🎉 下载完成！所有内容保存在: {}", shown.display());
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📄 有内容的页数: {}, 空页数: {}", pages_loaded, pages_empty);
    info!("✅ 总共处理了 {} 个收藏项", total_items);
    info!("{}", "=".repeat(50));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
