use anyhow::Result;
use tracing::error;

use crate::browser;
use crate::config::Config;
use crate::models::CollectionRequest;
use crate::orchestrator::{Exporter, RunSummary};

/// 导出一个知乎收藏夹
///
/// # 参数
/// - `config`: 配置（凭据、超时、选择器等）
/// - `collection_id`: 收藏夹ID
/// - `only_title_link`: 是否只抓取标题和链接
/// - `from_page` / `to_page`: 页码范围，缺省规则见 `PageRange::resolve`
///
/// # 返回
/// 返回本次运行的统计；输出文件是唯一的持久化结果
pub async fn process_collection(
    config: &Config,
    collection_id: &str,
    only_title_link: bool,
    from_page: Option<u32>,
    to_page: Option<u32>,
) -> Result<RunSummary> {
    let request = CollectionRequest::new(
        collection_id,
        only_title_link,
        from_page,
        to_page,
        config.page_ceiling,
    )?;

    // 文件头先落盘，浏览器启动失败时也能看到本次运行的信息
    let mut exporter = Exporter::start(config, request)?;

    let mut session = browser::open_session(config).await.map_err(|e| {
        error!("❌ 无法打开浏览器: {:#}", e);
        e
    })?;

    exporter.run(&mut session).await
}
