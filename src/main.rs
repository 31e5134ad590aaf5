// fleetscan - SSH 批量巡检工具
// 应用入口

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod cli;
mod collector;
mod fleet;
mod models;
mod report;
mod ssh;
mod targets;

use cli::Cli;
use report::OutputFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    // 可以通过 RUST_LOG 环境变量控制日志级别，例如：RUST_LOG=debug fleetscan
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // 清单缺失或无有效目标是致命的启动错误
    let targets =
        targets::load_targets(&cli.file, cli.key.as_deref(), cli.password.as_deref()).await?;
    info!("Found {} servers to check", targets.len());

    let snapshots = fleet::collect_all(targets, cli.max_concurrent).await;

    let rendered = report::render(&snapshots, cli.format)?;

    // 文本格式同时输出到终端
    if cli.format == OutputFormat::Text {
        println!("\n{}", rendered);
    }

    let output_path = cli.output.unwrap_or_else(|| default_output_path(cli.format));
    tokio::fs::write(&output_path, &rendered)
        .await
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    println!("Results saved to file: {}", output_path.display());

    Ok(())
}

/// 未指定输出文件时的默认文件名：docker_resources_<YYYYMMDD_HHMMSS>.<format>
fn default_output_path(format: OutputFormat) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!(
        "docker_resources_{}.{}",
        timestamp,
        format.extension()
    ))
}
