//! 列表页加载服务 - 业务能力层
//!
//! 打开收藏夹的某一页，滚动到底触发懒加载，返回所有收藏项

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::{Config, ScrollConfig};
use crate::error;
use crate::infrastructure::Tab;
use crate::models::CollectionRequest;
use crate::services::pacing;

const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight); true";
const PAGE_HEIGHT_JS: &str = "document.body.scrollHeight";

/// 页面没有收藏项的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// 等待收藏项超时
    Timeout,
    /// 导航或查询出错
    Error(String),
    /// 页面加载了但没有收藏项
    NoItems,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::Timeout => write!(f, "加载超时"),
            EmptyReason::Error(msg) => write!(f, "加载出错: {}", msg),
            EmptyReason::NoItems => write!(f, "没有收藏项"),
        }
    }
}

/// 单页加载结果
pub enum PageLoad<I> {
    Loaded(Vec<I>),
    Empty(EmptyReason),
}

/// 列表页加载服务
pub struct PageLoader {
    site_url: String,
    item_selector: String,
    load_timeout: std::time::Duration,
    scroll: ScrollConfig,
}

impl PageLoader {
    pub fn new(config: &Config) -> Self {
        Self {
            site_url: config.site_url.clone(),
            item_selector: config.selectors.content_item.clone(),
            load_timeout: config.timeouts.page_load(),
            scroll: config.scroll.clone(),
        }
    }

    /// 加载某一页
    ///
    /// 导航失败或超时都返回 `Empty`，由调用方继续下一页
    pub async fn load<T: Tab>(
        &self,
        tab: &T,
        request: &CollectionRequest,
        page: u32,
    ) -> PageLoad<T::Item> {
        let url = request.page_url(&self.site_url, page);
        info!("[第 {} 页] 访问: {}", page, url);

        if let Err(e) = tab.goto(&url).await {
            warn!("[第 {} 页] 加载出错: {}", page, e);
            return PageLoad::Empty(EmptyReason::Error(e.to_string()));
        }

        if let Err(e) = tab.wait_for(&self.item_selector, self.load_timeout).await {
            if error::is_timeout(&e) {
                warn!("[第 {} 页] 加载超时，尝试继续", page);
                return PageLoad::Empty(EmptyReason::Timeout);
            }
            warn!("[第 {} 页] 加载出错: {}", page, e);
            return PageLoad::Empty(EmptyReason::Error(e.to_string()));
        }
        info!("[第 {} 页] ✓ 加载成功", page);

        self.scroll_to_end(tab, page).await;

        match tab.find_items(&self.item_selector).await {
            Ok(items) if items.is_empty() => PageLoad::Empty(EmptyReason::NoItems),
            Ok(items) => {
                info!("[第 {} 页] 找到 {} 个收藏项", page, items.len());
                PageLoad::Loaded(items)
            }
            Err(e) => {
                warn!("[第 {} 页] 获取收藏项失败: {}", page, e);
                PageLoad::Empty(EmptyReason::Error(e.to_string()))
            }
        }
    }

    /// 反复滚动到底部，页面高度连续 `stable_rounds` 次不变即认为加载完毕
    ///
    /// 返回实际滚动次数
    pub async fn scroll_to_end<T: Tab>(&self, tab: &T, page: u32) -> u32 {
        info!("[第 {} 页] 滚动加载页面内容...", page);
        let mut last_height = self.page_height(tab).await;
        let mut unchanged = 0;
        let mut rounds = 0;

        while unchanged < self.scroll.stable_rounds && rounds < self.scroll.max_rounds {
            rounds += 1;
            if let Err(e) = tab.eval(SCROLL_TO_BOTTOM_JS).await {
                debug!("[第 {} 页] 滚动失败: {}", page, e);
            }
            pacing::pause(self.scroll.delay, "滚动加载").await;

            let height = self.page_height(tab).await;
            if height == last_height {
                unchanged += 1;
            } else {
                unchanged = 0;
                last_height = height;
            }
        }

        if unchanged < self.scroll.stable_rounds {
            warn!(
                "[第 {} 页] 已滚动 {} 次仍未稳定，停止滚动",
                page, rounds
            );
        }
        rounds
    }

    async fn page_height<T: Tab>(&self, tab: &T) -> Option<u64> {
        tab.eval_as::<u64>(PAGE_HEIGHT_JS).await.ok()
    }
}
