//! 收藏项处理流程 - 流程层
//!
//! 核心职责：定义"一个收藏项"的完整处理流程
//!
//! 流程顺序：
//! 1. 提取标题和链接（失败 → 写占位记录）
//! 2. 仅标题模式：写入标题和链接
//! 3. 完整内容模式：新标签页抓取正文 → 写入（失败 → 写带错误说明的记录）→ 随机等待

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{Config, DelayRange};
use crate::infrastructure::{Session, Tab};
use crate::models::{ContentMode, ExtractedItem};
use crate::services::{
    pacing, ArticleFetcher, ArticleOutcome, Extraction, ItemExtractor, RecordWriter,
};
use crate::utils::logging::truncate_text;
use crate::workflow::item_ctx::ItemCtx;

/// 收藏项处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// 完整写入
    Saved,
    /// 写入了占位或错误记录
    Placeholder,
}

/// 收藏项处理流程
///
/// - 编排单个收藏项的处理
/// - 不持有浏览器资源
/// - 只有写文件失败才返回错误
pub struct ItemFlow {
    mode: ContentMode,
    extractor: ItemExtractor,
    fetcher: ArticleFetcher,
    writer: RecordWriter,
    after_item: DelayRange,
}

impl ItemFlow {
    pub fn new(config: &Config, mode: ContentMode, writer: RecordWriter) -> Result<Self> {
        Ok(Self {
            mode,
            extractor: ItemExtractor::new(
                ItemExtractor::default_strategies(&config.selectors),
                &config.site_url,
            ),
            fetcher: ArticleFetcher::new(config)?,
            writer,
            after_item: config.pacing.after_item,
        })
    }

    pub async fn run<S: Session>(
        &self,
        session: &S,
        item: &<S::Tab as Tab>::Item,
        ctx: &ItemCtx,
    ) -> Result<ItemOutcome> {
        let found = match self.extractor.extract(item).await {
            Extraction::Found(found) => found,
            Extraction::Missing(reason) => {
                warn!("{} 无法提取标题和链接: {}", ctx, reason);
                self.write(ctx, &ExtractedItem::missing(), None)?;
                return Ok(ItemOutcome::Placeholder);
            }
        };

        info!("{} 处理: {}", ctx, truncate_text(&found.title, 60));
        let mut record = ExtractedItem::from_title_link(&found);

        if self.mode == ContentMode::LinksOnly {
            self.write(ctx, &record, None)?;
            return Ok(ItemOutcome::Saved);
        }

        let outcome = match self.fetcher.fetch(session, &found).await {
            ArticleOutcome::Fetched { title, body } => {
                record.title = Some(title);
                record.body = Some(body);
                self.write(ctx, &record, None)?;
                info!(
                    "{} ✅ 已保存: {}",
                    ctx,
                    truncate_text(record.title.as_deref().unwrap_or_default(), 60)
                );
                ItemOutcome::Saved
            }
            ArticleOutcome::Failed(reason) => {
                warn!("{} ❌ 处理文章失败: {}", ctx, reason);
                self.write(ctx, &record, Some(&reason))?;
                ItemOutcome::Placeholder
            }
        };

        pacing::pause(self.after_item, "避免请求过快").await;
        Ok(outcome)
    }

    fn write(&self, ctx: &ItemCtx, record: &ExtractedItem, failure: Option<&str>) -> Result<()> {
        self.writer
            .append(ctx.index, record, failure)
            .with_context(|| format!("{} 写入输出文件失败", ctx))
    }
}
