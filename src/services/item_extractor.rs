//! 收藏项提取服务 - 业务能力层
//!
//! 按顺序尝试一组提取策略，第一个同时拿到标题和链接的策略胜出

use tracing::debug;
use url::Url;

use crate::config::Selectors;
use crate::infrastructure::ItemHandle;
use crate::models::TitleLink;

/// 提取策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// 标题文字和链接都取自同一个 a 标签
    Anchor { anchor: String },
    /// 标题文字取自标题容器，链接取自其中的 a 标签
    Split { title: String, anchor: String },
}

impl ExtractionStrategy {
    async fn apply<I: ItemHandle>(&self, item: &I) -> anyhow::Result<(String, Option<String>)> {
        match self {
            ExtractionStrategy::Anchor { anchor } => {
                let title = item.text_of(anchor).await?;
                let link = item.attribute_of(anchor, "href").await?;
                Ok((title, link))
            }
            ExtractionStrategy::Split { title, anchor } => {
                let title = item.text_of(title).await?;
                let link = item.attribute_of(anchor, "href").await?;
                Ok((title, link))
            }
        }
    }
}

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(TitleLink),
    Missing(String),
}

/// 收藏项提取服务
pub struct ItemExtractor {
    strategies: Vec<ExtractionStrategy>,
    base_url: Option<Url>,
}

impl ItemExtractor {
    pub fn new(strategies: Vec<ExtractionStrategy>, site_url: &str) -> Self {
        Self {
            strategies,
            base_url: Url::parse(site_url).ok(),
        }
    }

    /// 默认策略：先取标题内的 a 标签，再退回到标题容器 + a 标签
    pub fn default_strategies(selectors: &Selectors) -> Vec<ExtractionStrategy> {
        vec![
            ExtractionStrategy::Anchor {
                anchor: selectors.item_anchor.clone(),
            },
            ExtractionStrategy::Split {
                title: selectors.item_title.clone(),
                anchor: selectors.item_anchor.clone(),
            },
        ]
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    /// 提取标题和链接，永远不返回错误
    pub async fn extract<I: ItemHandle>(&self, item: &I) -> Extraction {
        let mut last_failure = "没有可用的提取策略".to_string();

        for strategy in &self.strategies {
            match strategy.apply(item).await {
                Ok((title, link)) => {
                    let title = title.trim().to_string();
                    let link = link
                        .map(|href| self.resolve_link(href.trim()))
                        .filter(|href| !href.is_empty());
                    match link {
                        Some(link) if !title.is_empty() => {
                            return Extraction::Found(TitleLink { title, link });
                        }
                        _ => {
                            debug!("策略 {:?} 未拿到完整的标题和链接", strategy);
                            last_failure = "标题或链接为空".to_string();
                        }
                    }
                }
                Err(e) => {
                    debug!("策略 {:?} 失败: {}", strategy, e);
                    last_failure = e.to_string();
                }
            }
        }

        Extraction::Missing(last_failure)
    }

    /// 把 `//zhuanlan.zhihu.com/p/1`、`/question/1` 这类地址补全
    fn resolve_link(&self, href: &str) -> String {
        if href.is_empty() {
            return String::new();
        }
        match &self.base_url {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// 按选择器返回固定文本 / href 的收藏项
    #[derive(Default)]
    struct StubItem {
        texts: HashMap<&'static str, &'static str>,
        hrefs: HashMap<&'static str, Option<&'static str>>,
    }

    #[async_trait]
    impl ItemHandle for StubItem {
        async fn text_of(&self, selector: &str) -> anyhow::Result<String> {
            self.texts
                .get(selector)
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow::anyhow!("找不到元素: {}", selector))
        }

        async fn attribute_of(&self, selector: &str, _name: &str) -> anyhow::Result<Option<String>> {
            self.hrefs
                .get(selector)
                .map(|h| h.map(str::to_string))
                .ok_or_else(|| anyhow::anyhow!("找不到元素: {}", selector))
        }
    }

    fn extractor() -> ItemExtractor {
        ItemExtractor::new(
            ItemExtractor::default_strategies(&Selectors::default()),
            "https://www.zhihu.com",
        )
    }

    #[tokio::test]
    async fn test_primary_strategy() {
        let item = StubItem {
            texts: HashMap::from([(".ContentItem-title a", " 如何学习 Rust？ ")]),
            hrefs: HashMap::from([(
                ".ContentItem-title a",
                Some("https://www.zhihu.com/question/1/answer/2"),
            )]),
        };
        assert_eq!(
            extractor().extract(&item).await,
            Extraction::Found(TitleLink {
                title: "如何学习 Rust？".to_string(),
                link: "https://www.zhihu.com/question/1/answer/2".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_fallback_when_anchor_text_is_empty() {
        let item = StubItem {
            texts: HashMap::from([
                (".ContentItem-title a", ""),
                (".ContentItem-title", "专栏文章"),
            ]),
            hrefs: HashMap::from([(".ContentItem-title a", Some("//zhuanlan.zhihu.com/p/42"))]),
        };
        assert_eq!(
            extractor().extract(&item).await,
            Extraction::Found(TitleLink {
                title: "专栏文章".to_string(),
                link: "https://zhuanlan.zhihu.com/p/42".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_relative_link_resolved() {
        let item = StubItem {
            texts: HashMap::from([(".ContentItem-title a", "问题")]),
            hrefs: HashMap::from([(".ContentItem-title a", Some("/question/7"))]),
        };
        match extractor().extract(&item).await {
            Extraction::Found(found) => assert_eq!(found.link, "https://www.zhihu.com/question/7"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_when_every_strategy_fails() {
        let item = StubItem::default();
        assert!(matches!(
            extractor().extract(&item).await,
            Extraction::Missing(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_when_link_absent() {
        let item = StubItem {
            texts: HashMap::from([
                (".ContentItem-title a", "标题"),
                (".ContentItem-title", "标题"),
            ]),
            hrefs: HashMap::from([(".ContentItem-title a", None)]),
        };
        assert!(matches!(
            extractor().extract(&item).await,
            Extraction::Missing(_)
        ));
    }

    #[tokio::test]
    async fn test_strategies_are_tried_in_order() {
        let extractor = extractor();
        assert!(matches!(
            extractor.strategies()[0],
            ExtractionStrategy::Anchor { .. }
        ));
        assert!(matches!(
            extractor.strategies()[1],
            ExtractionStrategy::Split { .. }
        ));
    }
}
