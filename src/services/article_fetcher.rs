//! 文章抓取服务 - 业务能力层
//!
//! 在新标签页中打开文章，等待正文渲染后解析。
//! 标签页由 `with_tab` 管理，任何情况下都会关闭并切回主标签页。

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::infrastructure::{with_tab, Session, Tab};
use crate::models::{Article, TitleLink};
use crate::services::article_parser::ArticleParser;

/// 文章抓取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// 成功，标题已按需回退到列表页标题
    Fetched { title: String, body: String },
    /// 失败，附带原因
    Failed(String),
}

/// 文章抓取服务
pub struct ArticleFetcher {
    root_selector: String,
    load_timeout: Duration,
    parser: ArticleParser,
}

impl ArticleFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let selectors = &config.selectors;
        Ok(Self {
            root_selector: selectors.article_root.clone(),
            load_timeout: config.timeouts.article_load(),
            parser: ArticleParser::new(&selectors.article_titles, &selectors.article_bodies)?,
        })
    }

    /// 抓取文章，失败时返回 `Failed` 而不是错误
    pub async fn fetch<S: Session>(&self, session: &S, item: &TitleLink) -> ArticleOutcome {
        let result = with_tab(session, &item.link, |tab| async move {
            self.read_article(&tab).await
        })
        .await;

        match result {
            Ok(article) => ArticleOutcome::Fetched {
                title: article.title.unwrap_or_else(|| item.title.clone()),
                body: article.body,
            },
            Err(e) => ArticleOutcome::Failed(format!("{:#}", e)),
        }
    }

    async fn read_article<T: Tab>(&self, tab: &T) -> Result<Article> {
        tab.wait_for(&self.root_selector, self.load_timeout)
            .await
            .context("文章正文未加载")?;

        let html = tab.content().await.context("无法读取页面源码")?;
        debug!("文章页 HTML 长度: {}", html.len());

        self.parser.parse(&html)
    }
}
