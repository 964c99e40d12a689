//! 输出文件写入服务 - 业务能力层
//!
//! 只负责"往输出文件追加记录"能力，不关心流程。
//! 每次写入都重新打开、关闭文件，程序中途崩溃时之前的记录都已落盘。

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::AppError;
use crate::models::{CollectionRequest, ContentMode, ExtractedItem};

const RULE_WIDTH: usize = 80;

/// 无法提取标题和链接时的占位文字
pub const MISSING_TITLE_LINK: &str = "无法提取标题和链接";

/// 输出文件写入服务
#[derive(Debug, Clone)]
pub struct RecordWriter {
    path: PathBuf,
    mode: ContentMode,
}

impl RecordWriter {
    pub fn new(path: impl Into<PathBuf>, mode: ContentMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 创建（覆盖）输出文件并写入文件头
    pub fn write_header(&self, request: &CollectionRequest, generated_at: NaiveDateTime) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| AppError::file_write_failed(dir, e))?;
        }
        let header = format!(
            "知乎收藏内容汇总\n收藏夹ID: {}\n抓取模式: {}\n页码范围: {}\n生成时间: {}\n{}\n\n",
            request.collection_id,
            request.content_mode.description(),
            request.page_range.description(),
            generated_at.format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(RULE_WIDTH)
        );
        fs::write(&self.path, header).map_err(|e| AppError::file_write_failed(&self.path, e))?;
        Ok(())
    }

    /// 追加一条记录
    ///
    /// `failure` 只在完整内容模式下使用，表示正文抓取失败的原因
    pub fn append(&self, index: usize, item: &ExtractedItem, failure: Option<&str>) -> Result<()> {
        let record = format_record(self.mode, index, item, failure);
        debug!("写入第 {} 条记录 ({} 字节)", index, record.len());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;
        file.write_all(record.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;
        Ok(())
    }
}

/// 按模式格式化一条记录
pub fn format_record(
    mode: ContentMode,
    index: usize,
    item: &ExtractedItem,
    failure: Option<&str>,
) -> String {
    let dash_rule = "-".repeat(RULE_WIDTH);
    let equal_rule = "=".repeat(RULE_WIDTH);

    let (title, link) = match (&item.title, &item.link) {
        (Some(title), Some(link)) => (title, link),
        _ => {
            return match mode {
                ContentMode::LinksOnly => {
                    format!("{}. {}\n{}\n", index, MISSING_TITLE_LINK, dash_rule)
                }
                ContentMode::FullContent => {
                    format!("{}. {}\n\n{}\n\n", index, MISSING_TITLE_LINK, equal_rule)
                }
            };
        }
    };

    match mode {
        ContentMode::LinksOnly => format!("{}. {}\n链接: {}\n{}\n", index, title, link, dash_rule),
        ContentMode::FullContent => match (&item.body, failure) {
            (Some(body), None) => format!(
                "{}. {}\n链接: {}\n{}\n{}\n\n{}\n\n",
                index,
                title,
                link,
                dash_rule,
                body.trim(),
                equal_rule
            ),
            (_, reason) => format!(
                "{}. {}\n链接: {}\n错误: 无法提取内容 ({})\n\n{}\n\n",
                index,
                title,
                link,
                reason.unwrap_or("正文为空"),
                equal_rule
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleLink;
    use pretty_assertions::assert_eq;

    fn found() -> ExtractedItem {
        ExtractedItem::from_title_link(&TitleLink {
            title: "标题".to_string(),
            link: "https://www.zhihu.com/question/1".to_string(),
        })
    }

    #[test]
    fn test_link_record() {
        let record = format_record(ContentMode::LinksOnly, 3, &found(), None);
        assert_eq!(
            record,
            format!(
                "3. 标题\n链接: https://www.zhihu.com/question/1\n{}\n",
                "-".repeat(80)
            )
        );
    }

    #[test]
    fn test_placeholder_links_mode() {
        let record = format_record(ContentMode::LinksOnly, 9, &ExtractedItem::missing(), None);
        assert_eq!(record, format!("9. 无法提取标题和链接\n{}\n", "-".repeat(80)));
    }

    #[test]
    fn test_full_record_ends_with_equal_rule() {
        let mut item = found();
        item.body = Some("\n正文内容\n".to_string());
        let record = format_record(ContentMode::FullContent, 1, &item, None);
        assert_eq!(
            record,
            format!(
                "1. 标题\n链接: https://www.zhihu.com/question/1\n{}\n正文内容\n\n{}\n\n",
                "-".repeat(80),
                "=".repeat(80)
            )
        );
    }

    #[test]
    fn test_full_failure_record_keeps_title_and_link() {
        let record = format_record(ContentMode::FullContent, 2, &found(), Some("超时"));
        assert!(record.starts_with("2. 标题\n链接: https://www.zhihu.com/question/1\n"));
        assert!(record.contains("错误: 无法提取内容 (超时)"));
        assert!(record.ends_with(&format!("{}\n\n", "=".repeat(80))));
    }

    #[test]
    fn test_placeholder_full_mode() {
        let record = format_record(ContentMode::FullContent, 4, &ExtractedItem::missing(), None);
        assert!(record.starts_with("4. 无法提取标题和链接\n"));
        assert!(record.ends_with(&format!("{}\n\n", "=".repeat(80))));
    }

    #[test]
    fn test_header_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let request = CollectionRequest::new("88652213", true, Some(1), Some(2), 1000).unwrap();
        let path = dir.path().join(request.output_file_name("知乎收藏"));
        let writer = RecordWriter::new(&path, request.content_mode);
        let at = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();

        writer.write_header(&request, at).unwrap();
        writer.append(1, &found(), None).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!(
                "知乎收藏内容汇总\n收藏夹ID: 88652213\n抓取模式: 仅标题和链接\n页码范围: 从第1页到第2页\n生成时间: 2024-05-01 08:30:00\n{}\n\n1. 标题\n链接: https://www.zhihu.com/question/1\n{}\n",
                "=".repeat(80),
                "-".repeat(80)
            )
        );
    }

    #[test]
    fn test_write_failure_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        // 目录本身不能作为文件打开
        let writer = RecordWriter::new(dir.path(), ContentMode::LinksOnly);
        let err = writer.append(1, &found(), None).unwrap_err();
        assert!(crate::error::is_output_failure(&err));
    }
}
