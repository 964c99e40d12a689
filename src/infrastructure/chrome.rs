//! chromiumoxide 实现 - 基础设施层
//!
//! `ChromeTab` 持有一个 Page，只暴露能力，不认识收藏夹和文章

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, Element, Page};
use serde_json::Value as JsonValue;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::driver::{ItemHandle, Session, Tab};
use crate::error::AppError;

/// 列表页收藏项
pub struct ChromeItem {
    element: Element,
}

#[async_trait]
impl ItemHandle for ChromeItem {
    async fn text_of(&self, selector: &str) -> Result<String> {
        let child = self.element.find_element(selector).await?;
        Ok(child.inner_text().await?.unwrap_or_default())
    }

    async fn attribute_of(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let child = self.element.find_element(selector).await?;
        Ok(child.attribute(name).await?)
    }
}

/// 标签页
#[derive(Clone)]
pub struct ChromeTab {
    page: Page,
    poll_interval: Duration,
}

impl ChromeTab {
    pub fn new(page: Page, poll_interval: Duration) -> Self {
        Self {
            page,
            poll_interval,
        }
    }

    async fn find(&self, selector: &str) -> Result<Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| AppError::element_not_found(selector).into())
    }
}

#[async_trait]
impl Tab for ChromeTab {
    type Item = ChromeItem;

    async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::wait_timeout(selector, timeout).into());
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.find(selector).await?.click().await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.find(selector).await?;
        element.click().await?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn eval(&self, js_code: &str) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.to_string()).await?;
        // 返回 undefined 的脚本没有 value
        Ok(result.into_value().unwrap_or(JsonValue::Null))
    }

    async fn find_items(&self, selector: &str) -> Result<Vec<Self::Item>> {
        let elements = self.page.find_elements(selector).await?;
        Ok(elements
            .into_iter()
            .map(|element| ChromeItem { element })
            .collect())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }
}

/// 浏览器会话
///
/// 唯一持有 Browser 的结构。`owned` 为 false 时表示连接的是外部浏览器，
/// 退出时只关闭本次打开的页面。
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    primary: ChromeTab,
    owned: bool,
}

impl ChromeSession {
    pub fn new(browser: Browser, handler: JoinHandle<()>, primary: ChromeTab, owned: bool) -> Self {
        Self {
            browser,
            handler,
            primary,
            owned,
        }
    }
}

#[async_trait]
impl Session for ChromeSession {
    type Tab = ChromeTab;

    fn primary(&self) -> &ChromeTab {
        &self.primary
    }

    async fn open_tab(&self) -> Result<ChromeTab> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromeTab::new(page, self.primary.poll_interval))
    }

    async fn close_tab(&self, tab: ChromeTab) -> Result<()> {
        tab.page.close().await?;
        Ok(())
    }

    async fn focus_primary(&self) -> Result<()> {
        self.primary.page.bring_to_front().await?;
        Ok(())
    }

    async fn tab_count(&self) -> Result<usize> {
        Ok(self.browser.pages().await?.len())
    }

    async fn quit(&mut self) -> Result<()> {
        if self.owned {
            self.browser.close().await?;
            if let Err(e) = self.browser.wait().await {
                warn!("等待浏览器进程退出失败: {}", e);
            }
        } else {
            self.primary.page.clone().close().await?;
        }
        self.handler.abort();
        Ok(())
    }
}
