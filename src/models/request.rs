//! 收藏夹抓取请求
//!
//! 根据调用方给出的参数确定页码范围、描述文字和输出文件名

use std::path::{Path, PathBuf};

use crate::error::{AppError, ConfigError};

/// 抓取模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// 仅标题和链接
    LinksOnly,
    /// 完整内容
    FullContent,
}

impl ContentMode {
    pub fn from_only_title_link(only_title_link: bool) -> Self {
        if only_title_link {
            ContentMode::LinksOnly
        } else {
            ContentMode::FullContent
        }
    }

    /// 文件名后缀
    pub fn file_suffix(self) -> &'static str {
        match self {
            ContentMode::LinksOnly => "标题和链接",
            ContentMode::FullContent => "完整内容",
        }
    }

    /// 文件头和日志中的模式描述
    pub fn description(self) -> &'static str {
        match self {
            ContentMode::LinksOnly => "仅标题和链接",
            ContentMode::FullContent => "完整内容",
        }
    }
}

/// 调用方实际给出了哪些页码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBounds {
    Both { from: u32, to: u32 },
    FromOnly(u32),
    ToOnly(u32),
    All,
}

/// 解析后的页码范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
    pub bounds: RangeBounds,
}

impl PageRange {
    /// 按默认规则补全页码
    ///
    /// - 都未给出：`(1, ceiling)`
    /// - 只给起始页：只抓这一页
    /// - 只给结束页：从第 1 页开始
    pub fn resolve(from_page: Option<u32>, to_page: Option<u32>, ceiling: u32) -> Self {
        let bounds = match (from_page, to_page) {
            (Some(from), Some(to)) => RangeBounds::Both { from, to },
            (Some(from), None) => RangeBounds::FromOnly(from),
            (None, Some(to)) => RangeBounds::ToOnly(to),
            (None, None) => RangeBounds::All,
        };
        let (start, end) = match bounds {
            RangeBounds::Both { from, to } => (from, to),
            RangeBounds::FromOnly(from) => (from, from),
            RangeBounds::ToOnly(to) => (1, to),
            RangeBounds::All => (1, ceiling),
        };
        Self { start, end, bounds }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn is_last(&self, page: u32) -> bool {
        page >= self.end
    }

    /// 文件名中的页码部分（带前导下划线）
    pub fn file_suffix(&self) -> String {
        match self.bounds {
            RangeBounds::Both { from, to } => format!("_{}-{}页", from, to),
            RangeBounds::FromOnly(from) => format!("_从{}页开始", from),
            RangeBounds::ToOnly(to) => format!("_到{}页", to),
            RangeBounds::All => "_全量".to_string(),
        }
    }

    pub fn description(&self) -> String {
        match self.bounds {
            RangeBounds::Both { from, to } => format!("从第{}页到第{}页", from, to),
            RangeBounds::FromOnly(from) => format!("从第{}页开始", from),
            RangeBounds::ToOnly(to) => format!("到第{}页结束", to),
            RangeBounds::All => "所有页面".to_string(),
        }
    }
}

/// 一次运行的抓取请求，构造后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    pub collection_id: String,
    pub content_mode: ContentMode,
    pub page_range: PageRange,
}

impl CollectionRequest {
    pub fn new(
        collection_id: impl Into<String>,
        only_title_link: bool,
        from_page: Option<u32>,
        to_page: Option<u32>,
        page_ceiling: u32,
    ) -> Result<Self, AppError> {
        let collection_id = collection_id.into().trim().to_string();
        if collection_id.is_empty() {
            return Err(ConfigError::EmptyCollectionId.into());
        }
        Ok(Self {
            collection_id,
            content_mode: ContentMode::from_only_title_link(only_title_link),
            page_range: PageRange::resolve(from_page, to_page, page_ceiling),
        })
    }

    /// 输出文件名：`{label}_{id}{页码}_{模式}.txt`
    pub fn output_file_name(&self, label: &str) -> String {
        format!(
            "{}_{}{}_{}.txt",
            label,
            self.collection_id,
            self.page_range.file_suffix(),
            self.content_mode.file_suffix()
        )
    }

    pub fn output_path(&self, dir: &Path, label: &str) -> PathBuf {
        dir.join(self.output_file_name(label))
    }

    /// 收藏夹某一页的地址
    pub fn page_url(&self, site_url: &str, page: u32) -> String {
        format!(
            "{}/collection/{}?page={}",
            site_url.trim_end_matches('/'),
            self.collection_id,
            page
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let all = PageRange::resolve(None, None, 1000);
        assert_eq!((all.start, all.end), (1, 1000));

        let from = PageRange::resolve(Some(65), None, 1000);
        assert_eq!((from.start, from.end), (65, 65));

        let to = PageRange::resolve(None, Some(7), 1000);
        assert_eq!((to.start, to.end), (1, 7));

        let both = PageRange::resolve(Some(3), Some(9), 1000);
        assert_eq!((both.start, both.end), (3, 9));
    }

    #[test]
    fn test_resolved_start_never_exceeds_end_for_valid_input() {
        for from in 1..=20u32 {
            for to in from..=20u32 {
                let cases = [
                    PageRange::resolve(Some(from), Some(to), 1000),
                    PageRange::resolve(Some(from), None, 1000),
                    PageRange::resolve(None, Some(to), 1000),
                ];
                for range in cases {
                    assert!(range.start <= range.end, "{:?}", range);
                }
            }
        }
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = PageRange::resolve(Some(5), Some(2), 1000);
        assert!(range.is_empty());
        assert_eq!(range.pages().count(), 0);
    }

    #[test]
    fn test_output_file_names() {
        let req = CollectionRequest::new("88652213", false, Some(1), Some(2), 1000).unwrap();
        assert_eq!(
            req.output_file_name("知乎收藏"),
            "知乎收藏_88652213_1-2页_完整内容.txt"
        );

        let req = CollectionRequest::new("713314943", true, Some(65), None, 1000).unwrap();
        assert_eq!(
            req.output_file_name("知乎收藏"),
            "知乎收藏_713314943_从65页开始_标题和链接.txt"
        );

        let req = CollectionRequest::new("1", true, None, Some(4), 1000).unwrap();
        assert_eq!(req.output_file_name("知乎收藏"), "知乎收藏_1_到4页_标题和链接.txt");

        let req = CollectionRequest::new("1", false, None, None, 1000).unwrap();
        assert_eq!(req.output_file_name("知乎收藏"), "知乎收藏_1_全量_完整内容.txt");
    }

    #[test]
    fn test_file_name_is_reproducible() {
        let a = CollectionRequest::new("42", true, Some(2), Some(3), 1000).unwrap();
        let b = CollectionRequest::new("42", true, Some(2), Some(3), 1000).unwrap();
        assert_eq!(a.output_file_name("x"), b.output_file_name("x"));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            PageRange::resolve(Some(1), Some(10), 1000).description(),
            "从第1页到第10页"
        );
        assert_eq!(PageRange::resolve(Some(3), None, 1000).description(), "从第3页开始");
        assert_eq!(PageRange::resolve(None, Some(8), 1000).description(), "到第8页结束");
        assert_eq!(PageRange::resolve(None, None, 1000).description(), "所有页面");
    }

    #[test]
    fn test_empty_collection_id_rejected() {
        let err = CollectionRequest::new("  ", true, None, None, 1000).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::EmptyCollectionId)));
    }

    #[test]
    fn test_page_url() {
        let req = CollectionRequest::new("88652213", true, None, None, 1000).unwrap();
        assert_eq!(
            req.page_url("https://www.zhihu.com/", 3),
            "https://www.zhihu.com/collection/88652213?page=3"
        );
    }
}
