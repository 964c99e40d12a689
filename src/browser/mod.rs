pub mod connection;
pub mod launch;

use anyhow::Result;
use tracing::{error, info};

use crate::config::Config;
use crate::infrastructure::{ChromeSession, ChromeTab};

pub use connection::connect_to_browser;
pub use launch::launch_browser;

/// 打开浏览器会话
///
/// 配置了调试端口时连接已有浏览器，否则自行启动
pub async fn open_session(config: &Config) -> Result<ChromeSession> {
    let (browser, handler, owned) = match config.browser.debug_port {
        Some(port) => {
            let (browser, handler) = connect_to_browser(port).await?;
            (browser, handler, false)
        }
        None => {
            let (browser, handler) = launch_browser(&config.browser).await?;
            (browser, handler, true)
        }
    };

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        e
    })?;
    info!("✓ 浏览器会话已就绪");

    let primary = ChromeTab::new(page, config.timeouts.poll_interval());
    Ok(ChromeSession::new(browser, handler, primary, owned))
}
