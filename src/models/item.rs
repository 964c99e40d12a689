/// 从收藏项中提取到的标题和链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLink {
    pub title: String,
    pub link: String,
}

/// 单个收藏项的抓取结果，写入文件后即丢弃
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub body: Option<String>,
}

impl ExtractedItem {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn from_title_link(found: &TitleLink) -> Self {
        Self {
            title: Some(found.title.clone()),
            link: Some(found.link.clone()),
            body: None,
        }
    }
}

/// 从文章页解析出的内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    /// 文章页内的标题，可能缺失
    pub title: Option<String>,
    /// 转换后的纯文本正文
    pub body: String,
}
