use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::config::BrowserSettings;
use crate::error::{AppError, BrowserError};

/// 启动浏览器
///
/// 默认有界面启动，登录遇到验证码时可以手动处理
pub async fn launch_browser(settings: &BrowserSettings) -> Result<(Browser, JoinHandle<()>)> {
    info!(
        "🚀 启动浏览器 ({})...",
        if settings.headless { "无头模式" } else { "有界面模式" }
    );

    let mut builder = BrowserConfig::builder()
        .viewport(None)
        .args(launch_args(settings));
    builder = if settings.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = &settings.executable {
        debug!("浏览器路径: {}", path.display());
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|reason| {
        error!("配置浏览器失败: {}", reason);
        AppError::Browser(BrowserError::LaunchFailed { reason })
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::Browser(BrowserError::LaunchFailed {
            reason: e.to_string(),
        })
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    Ok((browser, handle))
}

/// 启动参数：隐藏自动化特征、最大化窗口
fn launch_args(settings: &BrowserSettings) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--start-maximized".to_string(),
        "--no-first-run".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];
    if !settings.user_agent.is_empty() {
        args.push(format!("--user-agent={}", settings.user_agent));
    }
    if settings.headless {
        args.push("--disable-gpu".to_string());
    }
    args
}
