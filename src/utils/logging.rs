/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{Session, Stage};

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info。
/// 重复调用是安全的（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 사업계획서 자동 작성 向导");
    info!("🌐 API 地址: {}", config.api_base_url);
    info!("⚙️ 生成策略: {:?}", config.generation_policy);
    info!("{}", "=".repeat(60));
}

/// 记录阶段切换
pub fn log_stage_transition(from: Stage, to: Stage) {
    let arrow = if to >= from { "→" } else { "←" };
    info!("🧭 阶段切换: {} {} {} ({})", from, arrow, to, to.title());
}

/// 打印最终统计信息
///
/// # 参数
/// - `session`: 结束时的会话
/// - `output_path`: 生成文档的保存路径（未生成时为 None）
pub fn print_final_stats(session: &Session, output_path: Option<&str>) {
    let results = session.section_results();
    let success = session.successful_sections().count();

    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 章节成功: {}/{}", success, results.len());
    for (key, result) in results {
        match &result.error {
            Some(err) => info!("   ❌ {} ({}): {}", key.display_name(), key, err),
            None => info!("   • {} ({}): {:?}", key.display_name(), key, result.status),
        }
    }
    info!("{}", "=".repeat(60));
    match output_path {
        Some(path) => info!("\n文档已保存至: {}", path),
        None => info!("\n未生成文档"),
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
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
