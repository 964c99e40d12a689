//! 文章解析 - 业务能力层
//!
//! 从文章页 HTML 中取标题和正文，正文转换为纯文本：
//! 链接只保留文字，图片删除，粗体/斜体去掉格式

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{AppError, BrowserError};
use crate::models::Article;

/// 只保留内容的内联标签
const UNWRAP_TAGS: &[&str] = &["a", "em", "i", "strong", "b", "u", "span", "font"];
/// 整个丢弃的标签
const DROP_TAGS: &[&str] = &[
    "img", "figure", "svg", "noscript", "script", "style", "button", "video", "iframe",
];
const VOID_TAGS: &[&str] = &["br", "hr", "wbr"];

/// HTML 转 Markdown 的外部实现
pub trait MarkdownConverter: Send + Sync {
    fn to_markdown(&self, html: &str) -> Result<String>;
}

/// 基于 htmd 的转换器
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmdConverter;

impl MarkdownConverter for HtmdConverter {
    fn to_markdown(&self, html: &str) -> Result<String> {
        htmd::convert(html).map_err(|e| anyhow!("HTML 转换失败: {}", e))
    }
}

/// 文章解析器
pub struct ArticleParser<C = HtmdConverter> {
    title_selectors: Vec<Selector>,
    body_selectors: Vec<Selector>,
    blank_lines: Regex,
    converter: C,
}

impl ArticleParser<HtmdConverter> {
    pub fn new(title_selectors: &[String], body_selectors: &[String]) -> Result<Self> {
        Self::with_converter(title_selectors, body_selectors, HtmdConverter)
    }
}

impl<C: MarkdownConverter> ArticleParser<C> {
    pub fn with_converter(
        title_selectors: &[String],
        body_selectors: &[String],
        converter: C,
    ) -> Result<Self> {
        Ok(Self {
            title_selectors: parse_selectors(title_selectors)?,
            body_selectors: parse_selectors(body_selectors)?,
            blank_lines: Regex::new(r"\n[ \t]*(\n[ \t]*)+\n")?,
            converter,
        })
    }

    /// 解析整页 HTML
    ///
    /// 找不到标题时 `title` 为 None；找不到正文时 `body` 为空字符串
    pub fn parse(&self, html: &str) -> Result<Article> {
        let document = Html::parse_document(html);

        let title = self
            .title_selectors
            .iter()
            .find_map(|sel| document.select(sel).next())
            .map(|el| el.text().map(str::trim).collect::<String>())
            .filter(|t| !t.is_empty());

        let body = match self
            .body_selectors
            .iter()
            .find_map(|sel| document.select(sel).next())
        {
            Some(content) => {
                let cleaned = clean_fragment(content);
                let markdown = self
                    .converter
                    .to_markdown(&cleaned)
                    .context("正文转换失败")?;
                tidy_text(&self.blank_lines, &markdown)
            }
            None => String::new(),
        };

        Ok(Article { title, body })
    }
}

fn parse_selectors(selectors: &[String]) -> Result<Vec<Selector>> {
    selectors
        .iter()
        .map(|s| {
            Selector::parse(s).map_err(|_| {
                AppError::Browser(BrowserError::InvalidSelector {
                    selector: s.clone(),
                })
                .into()
            })
        })
        .collect()
}

/// 重新序列化正文节点，去掉链接、图片和强调格式
fn clean_fragment(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_element(root, &mut out);
    out
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if DROP_TAGS.contains(&name) {
        return;
    }
    if VOID_TAGS.contains(&name) {
        out.push('<');
        out.push_str(name);
        out.push('>');
        return;
    }

    let keep_tag = !UNWRAP_TAGS.contains(&name);
    if keep_tag {
        out.push('<');
        out.push_str(name);
        out.push('>');
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_escaped(&text.text, out),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    write_element(child_el, out);
                }
            }
            _ => {}
        }
    }
    if keep_tag {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
}

fn push_escaped(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// 合并多余空行并去掉首尾空白
fn tidy_text(blank_lines: &Regex, text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    blank_lines
        .replace_all(&normalized, "\n\n")
        .trim()
        .to_string()
}
