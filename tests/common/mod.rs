//! 内存中的假浏览器，模拟登录页、收藏夹列表页和文章页

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use zhihu_collect::config::{Credentials, DelayRange, PacingConfig};
use zhihu_collect::{AppError, Config, ItemHandle, Session, Tab};

const ITEM_SELECTOR: &str = ".ContentItem";
const ITEM_TITLE: &str = ".ContentItem-title";
const ITEM_ANCHOR: &str = ".ContentItem-title a";
const SUBMIT: &str = ".SignFlow-submitButton";
const ARTICLE_ROOT: &str = ".Post-Main, .Question-main";
const HOME_URL: &str = "https://www.zhihu.com/";

/// 测试用配置：不等待，输出到临时目录
pub fn test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.output_dir = output_dir.to_path_buf();
    config.error_screenshot = output_dir.join("main_error.png");
    config.pacing = PacingConfig::none();
    config.scroll.delay = DelayRange::zero();
    config.timeouts.login_redirect_secs = 0;
    config.timeouts.poll_interval_ms = 1;
    config.credentials = Credentials {
        username: "tester".to_string(),
        password: "secret".to_string(),
    };
    config
}

/// 带标题和正文的文章页
pub fn article_html(title: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    format!(
        r#"<html><body><div class="Post-Main"><h1 class="Post-Title">{}</h1><div class="Post-RichTextContainer">{}<img src="cover.png"></div></div></body></html>"#,
        title, body
    )
}

/// 列表页上的收藏项
#[derive(Debug, Clone, Default)]
pub struct FakeItem {
    anchor_text: Option<String>,
    title_text: Option<String>,
    href: Option<String>,
}

impl FakeItem {
    pub fn link(title: &str, href: &str) -> Self {
        Self {
            anchor_text: Some(title.to_string()),
            title_text: Some(title.to_string()),
            href: Some(href.to_string()),
        }
    }

    /// 没有标题也没有链接（例如被删除的内容）
    pub fn broken() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemHandle for FakeItem {
    async fn text_of(&self, selector: &str) -> Result<String> {
        let text = match selector {
            ITEM_ANCHOR => self.anchor_text.clone(),
            ITEM_TITLE => self.title_text.clone(),
            _ => None,
        };
        text.ok_or_else(|| AppError::element_not_found(selector).into())
    }

    async fn attribute_of(&self, selector: &str, name: &str) -> Result<Option<String>> {
        if selector != ITEM_ANCHOR || self.anchor_text.is_none() {
            return Err(AppError::element_not_found(selector).into());
        }
        Ok(if name == "href" { self.href.clone() } else { None })
    }
}

/// 整个假站点的共享状态
#[derive(Debug, Default)]
pub struct SiteState {
    pub login_form: bool,
    pub login_succeeds: bool,
    pub pages: HashMap<u32, Vec<FakeItem>>,
    /// 链接 → HTML；不在表中的文章永远不会渲染出正文
    pub articles: HashMap<String, String>,
    /// 导航直接失败的地址（断网、DNS 错误等）
    pub unreachable: HashSet<String>,
    /// 主标签页访问过的地址
    pub visited: Vec<String>,
    /// 新标签页访问过的地址
    pub opened: Vec<String>,
    pub open_tabs: usize,
    pub max_open_tabs: usize,
    /// 每次切回主标签页时的标签页数量
    pub tabs_on_refocus: Vec<usize>,
    pub focused: usize,
    pub next_tab_id: usize,
    pub screenshots: Vec<PathBuf>,
    pub quit: bool,
}

pub type Shared = Arc<Mutex<SiteState>>;

/// 假站点构造器
pub struct FakeSite {
    state: SiteState,
}

impl FakeSite {
    pub fn new() -> Self {
        Self {
            state: SiteState {
                login_form: true,
                login_succeeds: true,
                open_tabs: 1,
                max_open_tabs: 1,
                next_tab_id: 1,
                ..SiteState::default()
            },
        }
    }

    pub fn page(mut self, page: u32, items: Vec<FakeItem>) -> Self {
        self.state.pages.insert(page, items);
        self
    }

    pub fn article(mut self, link: &str, html: String) -> Self {
        self.state.articles.insert(link.to_string(), html);
        self
    }

    /// 导航到该地址时直接出错
    pub fn unreachable(mut self, url: &str) -> Self {
        self.state.unreachable.insert(url.to_string());
        self
    }

    /// 提交后停留在登录页（验证码等）
    pub fn rejecting_login(mut self) -> Self {
        self.state.login_succeeds = false;
        self
    }

    /// 登录页没有输入框
    pub fn without_login_form(mut self) -> Self {
        self.state.login_form = false;
        self
    }

    pub fn session(self) -> (FakeSession, Shared) {
        let state = Arc::new(Mutex::new(self.state));
        let primary = FakeTab {
            id: 0,
            state: state.clone(),
            url: Arc::new(Mutex::new("about:blank".to_string())),
        };
        (
            FakeSession {
                state: state.clone(),
                primary,
            },
            state,
        )
    }
}

#[derive(Clone)]
pub struct FakeTab {
    id: usize,
    state: Shared,
    url: Arc<Mutex<String>>,
}

impl FakeTab {
    fn url(&self) -> String {
        self.url.lock().unwrap().clone()
    }

    fn listing_page(url: &str) -> Option<u32> {
        if !url.contains("/collection/") {
            return None;
        }
        url.rsplit_once("page=")?.1.parse().ok()
    }

    fn has(&self, selector: &str) -> bool {
        let url = self.url();
        let state = self.state.lock().unwrap();
        if url.contains("signin") {
            return state.login_form;
        }
        if let Some(page) = Self::listing_page(&url) {
            return selector == ITEM_SELECTOR
                && state.pages.get(&page).is_some_and(|items| !items.is_empty());
        }
        selector == ARTICLE_ROOT && state.articles.contains_key(&url)
    }
}

#[async_trait]
impl Tab for FakeTab {
    type Item = FakeItem;

    async fn goto(&self, url: &str) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            if self.id == 0 {
                state.visited.push(url.to_string());
            } else {
                state.opened.push(url.to_string());
            }
            if state.unreachable.contains(url) {
                return Err(anyhow!("net::ERR_CONNECTION_RESET at {}", url));
            }
        }
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        if self.has(selector) {
            Ok(())
        } else {
            Err(AppError::wait_timeout(selector, timeout).into())
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        if !self.has(selector) {
            return Err(AppError::element_not_found(selector).into());
        }
        if selector == SUBMIT && self.state.lock().unwrap().login_succeeds {
            *self.url.lock().unwrap() = HOME_URL.to_string();
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, _text: &str) -> Result<()> {
        if self.has(selector) {
            Ok(())
        } else {
            Err(AppError::element_not_found(selector).into())
        }
    }

    async fn eval(&self, js_code: &str) -> Result<JsonValue> {
        if js_code.starts_with("window.scrollTo") {
            Ok(json!(true))
        } else {
            Ok(json!(2400))
        }
    }

    async fn find_items(&self, selector: &str) -> Result<Vec<FakeItem>> {
        let url = self.url();
        let state = self.state.lock().unwrap();
        Ok(match Self::listing_page(&url) {
            Some(page) if selector == ITEM_SELECTOR => {
                state.pages.get(&page).cloned().unwrap_or_default()
            }
            _ => Vec::new(),
        })
    }

    async fn content(&self) -> Result<String> {
        let url = self.url();
        self.state
            .lock()
            .unwrap()
            .articles
            .get(&url)
            .cloned()
            .ok_or_else(|| anyhow!("页面没有内容: {}", url))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.state.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }
}

pub struct FakeSession {
    state: Shared,
    primary: FakeTab,
}

#[async_trait]
impl Session for FakeSession {
    type Tab = FakeTab;

    fn primary(&self) -> &FakeTab {
        &self.primary
    }

    async fn open_tab(&self) -> Result<FakeTab> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_tab_id;
        state.next_tab_id += 1;
        state.open_tabs += 1;
        state.max_open_tabs = state.max_open_tabs.max(state.open_tabs);
        state.focused = id;
        Ok(FakeTab {
            id,
            state: self.state.clone(),
            url: Arc::new(Mutex::new("about:blank".to_string())),
        })
    }

    async fn close_tab(&self, _tab: FakeTab) -> Result<()> {
        self.state.lock().unwrap().open_tabs -= 1;
        Ok(())
    }

    async fn focus_primary(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.focused = 0;
        let open = state.open_tabs;
        state.tabs_on_refocus.push(open);
        Ok(())
    }

    async fn tab_count(&self) -> Result<usize> {
        Ok(self.state.lock().unwrap().open_tabs)
    }

    async fn quit(&mut self) -> Result<()> {
        self.state.lock().unwrap().quit = true;
        Ok(())
    }
}
