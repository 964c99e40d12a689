use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use zhihu_collect::utils::logging;
use zhihu_collect::{process_collection, Config, RunOutcome};

/// 知乎收藏夹下载工具
#[derive(Debug, Parser)]
#[command(name = "zhihu-collect", version)]
struct Cli {
    /// 收藏夹ID
    collection_id: String,

    /// 抓取完整内容（默认只抓取标题和链接）
    #[arg(long)]
    full_content: bool,

    /// 起始页码
    #[arg(long = "from", value_parser = clap::value_parser!(u32).range(1..))]
    from_page: Option<u32>,

    /// 结束页码
    #[arg(long = "to", value_parser = clap::value_parser!(u32).range(1..))]
    to_page: Option<u32>,

    /// TOML 配置文件
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref())?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    let summary = process_collection(
        &config,
        &cli.collection_id,
        !cli.full_content,
        cli.from_page,
        cli.to_page,
    )
    .await?;

    match summary.outcome {
        RunOutcome::Completed => Ok(()),
        RunOutcome::LoginRejected(reason) => anyhow::bail!("登录失败: {}", reason),
        RunOutcome::Aborted(reason) => anyhow::bail!("主流程出错: {}", reason),
    }
}
