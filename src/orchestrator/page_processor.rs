//! 单页处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **加载列表页**：委托 `PageLoader`，超时或没有收藏项时直接返回空页，
//!    导航或查询出错时返回错误，由上层放弃整页并等待更久
//! 2. **遍历收藏项**：为每一项分配全局序号并交给 `ItemFlow`
//! 3. **统计输出**：记录写入 / 占位数量

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, BrowserError};
use crate::infrastructure::Session;
use crate::models::CollectionRequest;
use crate::services::{EmptyReason, PageLoad, PageLoader, RecordWriter};
use crate::workflow::{IndexCounter, ItemCtx, ItemFlow, ItemOutcome};

/// 单页统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStats {
    pub page: u32,
    /// 页面上观察到的收藏项数量
    pub observed: usize,
    pub saved: usize,
    pub placeholders: usize,
    /// 空页的原因
    pub empty: Option<EmptyReason>,
}

impl PageStats {
    fn empty(page: u32, reason: EmptyReason) -> Self {
        Self {
            page,
            observed: 0,
            saved: 0,
            placeholders: 0,
            empty: Some(reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty.is_some()
    }
}

/// 单页处理器
pub struct PageProcessor {
    request: CollectionRequest,
    loader: PageLoader,
    flow: ItemFlow,
}

impl PageProcessor {
    pub fn new(config: &Config, request: &CollectionRequest, writer: RecordWriter) -> Result<Self> {
        Ok(Self {
            request: request.clone(),
            loader: PageLoader::new(config),
            flow: ItemFlow::new(config, request.content_mode, writer)?,
        })
    }

    /// 处理一页
    ///
    /// 列表页导航或查询出错、写文件失败时返回错误，其余问题都记录为占位或空页
    pub async fn process<S: Session>(
        &self,
        session: &S,
        page: u32,
        counter: &mut IndexCounter,
    ) -> Result<PageStats> {
        let items = match self.loader.load(session.primary(), &self.request, page).await {
            PageLoad::Loaded(items) => items,
            PageLoad::Empty(EmptyReason::Error(reason)) => {
                return Err(AppError::Browser(BrowserError::PageLoadFailed { page, reason }).into());
            }
            PageLoad::Empty(reason) => {
                info!("[第 {} 页] 跳过: {}", page, reason);
                return Ok(PageStats::empty(page, reason));
            }
        };

        let mut stats = PageStats {
            page,
            observed: items.len(),
            saved: 0,
            placeholders: 0,
            empty: None,
        };

        for (position, item) in items.iter().enumerate() {
            let ctx = ItemCtx::new(page, position + 1, counter.next_index());
            match self.flow.run(session, item, &ctx).await? {
                ItemOutcome::Saved => stats.saved += 1,
                ItemOutcome::Placeholder => stats.placeholders += 1,
            }
            counter.mark_written();
        }

        info!(
            "[第 {} 页] 统计: 写入 {}, 占位 {}, 总计 {}",
            page, stats.saved, stats.placeholders, stats.observed
        );
        Ok(stats)
    }
}
