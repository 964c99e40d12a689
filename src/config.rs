use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{AppError, ConfigError};

/// 程序配置
///
/// 一次构建、整个运行期间只读，显式传入各层。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 站点根地址
    pub site_url: String,
    /// 登录页地址
    pub signin_url: String,
    /// 输出文件名前缀
    pub output_label: String,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 未指定页码时的页数上限
    pub page_ceiling: u32,
    /// 连续空页达到该值后停止翻页（None 表示不限制）
    pub max_consecutive_empty_pages: Option<u32>,
    /// 主流程出错时的截图文件
    pub error_screenshot: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    pub credentials: Credentials,
    pub browser: BrowserSettings,
    pub timeouts: Timeouts,
    pub scroll: ScrollConfig,
    pub pacing: PacingConfig,
    pub selectors: Selectors,
}

/// 登录凭据
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 浏览器启动参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// 连接已打开浏览器的调试端口；为空时自行启动浏览器
    pub debug_port: Option<u16>,
    /// 无头模式。默认有界面，方便手动处理验证码
    pub headless: bool,
    /// 浏览器可执行文件路径；为空时由 chromiumoxide 自动查找
    pub executable: Option<PathBuf>,
    pub user_agent: String,
}

/// 各类等待的超时时间（秒）
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub login_toggle_secs: u64,
    pub login_field_secs: u64,
    pub login_redirect_secs: u64,
    pub page_load_secs: u64,
    pub article_load_secs: u64,
    /// 轮询 DOM / URL 的间隔（毫秒）
    pub poll_interval_ms: u64,
}

impl Timeouts {
    pub fn login_toggle(&self) -> Duration {
        Duration::from_secs(self.login_toggle_secs)
    }

    pub fn login_field(&self) -> Duration {
        Duration::from_secs(self.login_field_secs)
    }

    pub fn login_redirect(&self) -> Duration {
        Duration::from_secs(self.login_redirect_secs)
    }

    pub fn page_load(&self) -> Duration {
        Duration::from_secs(self.page_load_secs)
    }

    pub fn article_load(&self) -> Duration {
        Duration::from_secs(self.article_load_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 滚动加载参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// 页面高度连续不变多少次视为加载完毕
    pub stable_rounds: u32,
    /// 滚动次数上限
    pub max_rounds: u32,
    pub delay: DelayRange,
}

/// 随机等待区间（毫秒，闭区间）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub const fn zero() -> Self {
        Self::fixed(0)
    }
}

/// 限速参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// 每处理完一篇文章后的等待
    pub after_item: DelayRange,
    /// 两页之间的等待
    pub between_pages: DelayRange,
    /// 某页出错后的等待
    pub error_backoff: DelayRange,
    /// 点击登录方式切换后的等待
    pub after_toggle: DelayRange,
}

/// 页面选择器
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub login_toggle: String,
    pub username: String,
    pub password: String,
    pub submit: String,
    pub content_item: String,
    pub item_title: String,
    pub item_anchor: String,
    pub article_root: String,
    pub article_titles: Vec<String>,
    pub article_bodies: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: "https://www.zhihu.com".to_string(),
            signin_url: "https://www.zhihu.com/signin".to_string(),
            output_label: "知乎收藏".to_string(),
            output_dir: PathBuf::from("."),
            page_ceiling: 1000,
            max_consecutive_empty_pages: None,
            error_screenshot: PathBuf::from("main_error.png"),
            verbose_logging: false,
            credentials: Credentials::default(),
            browser: BrowserSettings::default(),
            timeouts: Timeouts::default(),
            scroll: ScrollConfig::default(),
            pacing: PacingConfig::default(),
            selectors: Selectors::default(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            debug_port: None,
            headless: false,
            executable: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login_toggle_secs: 10,
            login_field_secs: 10,
            login_redirect_secs: 15,
            page_load_secs: 15,
            article_load_secs: 30,
            poll_interval_ms: 250,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            stable_rounds: 3,
            max_rounds: 30,
            delay: DelayRange::new(500, 1000),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            after_item: DelayRange::new(1000, 2000),
            between_pages: DelayRange::new(2000, 4000),
            error_backoff: DelayRange::fixed(5000),
            after_toggle: DelayRange::fixed(1000),
        }
    }
}

impl PacingConfig {
    /// 不做任何等待，用于测试
    pub fn none() -> Self {
        Self {
            after_item: DelayRange::zero(),
            between_pages: DelayRange::zero(),
            error_backoff: DelayRange::zero(),
            after_toggle: DelayRange::zero(),
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            login_toggle: ".SignContainer-switch span".to_string(),
            username: "input[name='username']".to_string(),
            password: "input[name='password']".to_string(),
            submit: ".SignFlow-submitButton".to_string(),
            content_item: ".ContentItem".to_string(),
            item_title: ".ContentItem-title".to_string(),
            item_anchor: ".ContentItem-title a".to_string(),
            article_root: ".Post-Main, .Question-main".to_string(),
            article_titles: vec![
                "h1.QuestionHeader-title".to_string(),
                "h1.Post-Title".to_string(),
            ],
            article_bodies: vec![
                "div.Post-RichTextContainer".to_string(),
                "div.QuestionAnswer-content".to_string(),
                "div.RichContent".to_string(),
            ],
        }
    }
}

impl Config {
    /// 读取配置：先取默认值或 TOML 文件，再叠加环境变量
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(v) = std::env::var("ZHIHU_USERNAME") {
            self.credentials.username = v;
        }
        if let Ok(v) = std::env::var("ZHIHU_PASSWORD") {
            self.credentials.password = v;
        }
        if let Ok(v) = std::env::var("BROWSER_DEBUG_PORT") {
            self.browser.debug_port = Some(parse_env("BROWSER_DEBUG_PORT", &v, "u16")?);
        }
        if let Ok(v) = std::env::var("HEADLESS") {
            self.browser.headless = parse_env("HEADLESS", &v, "bool")?;
        }
        if let Ok(v) = std::env::var("CHROME_EXECUTABLE") {
            self.browser.executable = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
        .into()
    })
}
