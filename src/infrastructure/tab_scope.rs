//! 临时标签页
//!
//! 打开新标签页执行一段操作，无论操作成功、失败还是提前返回，
//! 都会关闭该标签页并把焦点切回主标签页。

use std::future::Future;

use anyhow::Result;
use tracing::{debug, warn};

use super::driver::{Session, Tab};

/// 在新标签页中打开 `url` 并执行 `body`
///
/// 先打开空白标签页再导航，导航失败时标签页同样会被关闭。
/// `body` 的结果原样返回；关闭或切回失败只记录日志，不覆盖 `body` 的结果。
/// 打开标签页失败时同样会尝试切回主标签页。
pub async fn with_tab<S, T, F, Fut>(session: &S, url: &str, body: F) -> Result<T>
where
    S: Session,
    F: FnOnce(S::Tab) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let tab = match session.open_tab().await {
        Ok(tab) => tab,
        Err(e) => {
            restore_focus(session).await;
            return Err(e.context("无法打开新标签页"));
        }
    };
    debug!("已打开新标签页: {}", url);

    let result = match tab.goto(url).await {
        Ok(()) => body(tab.clone()).await,
        Err(e) => Err(e.context(format!("无法在新标签页打开: {}", url))),
    };

    if let Err(e) = session.close_tab(tab).await {
        warn!("关闭标签页失败: {}", e);
    }
    restore_focus(session).await;

    result
}

async fn restore_focus<S: Session>(session: &S) {
    if let Err(e) = session.focus_primary().await {
        warn!("切回主标签页失败: {}", e);
    }
}
