//! 登录服务 - 业务能力层
//!
//! 只负责"用账号密码登录"能力，不重试

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::{sleep, Instant};
use tracing::{info, warn};
use url::Url;

use crate::config::{Config, Credentials, DelayRange, Selectors, Timeouts};
use crate::error::{AppError, BrowserError};
use crate::infrastructure::Tab;
use crate::services::pacing;

/// 登录结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// 已跳转到登录后的页面
    Authenticated,
    /// 未能完成登录（超时、需要验证码等）
    Rejected(String),
}

/// 登录服务
pub struct LoginService {
    signin_url: String,
    site_host: String,
    credentials: Credentials,
    selectors: Selectors,
    timeouts: Timeouts,
    after_toggle: DelayRange,
}

impl LoginService {
    pub fn new(config: &Config) -> Self {
        let site_host = Url::parse(&config.site_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| config.site_url.clone());
        Self {
            signin_url: config.signin_url.clone(),
            site_host,
            credentials: config.credentials.clone(),
            selectors: config.selectors.clone(),
            timeouts: config.timeouts.clone(),
            after_toggle: config.pacing.after_toggle,
        }
    }

    /// 登录
    ///
    /// 找不到输入框或提交按钮时返回错误；等待跳转超时返回 `Rejected`
    pub async fn login<T: Tab>(&self, tab: &T) -> Result<LoginOutcome> {
        info!("启动浏览器登录知乎...");
        if self.credentials.username.is_empty() {
            warn!("⚠️ 未配置用户名 (ZHIHU_USERNAME)，登录大概率会失败");
        }

        tab.goto(&self.signin_url)
            .await
            .with_context(|| format!("无法打开登录页: {}", self.signin_url))?;

        // 切换到密码登录
        match self.switch_to_password_mode(tab).await {
            Ok(()) => pacing::pause(self.after_toggle, "切换登录方式").await,
            Err(e) => warn!("无法点击登录方式切换，尝试继续: {}", e),
        }

        tab.wait_for(&self.selectors.username, self.timeouts.login_field())
            .await
            .context("找不到用户名输入框")?;
        tab.fill(&self.selectors.username, &self.credentials.username)
            .await
            .context("无法输入用户名")?;
        tab.fill(&self.selectors.password, &self.credentials.password)
            .await
            .context("无法输入密码")?;
        tab.click(&self.selectors.submit)
            .await
            .context("无法点击登录按钮")?;

        match self
            .wait_for_redirect(tab, self.timeouts.login_redirect(), self.timeouts.poll_interval())
            .await
        {
            Ok(()) => {
                info!("✓ 登录成功!");
                Ok(LoginOutcome::Authenticated)
            }
            Err(e) => {
                warn!("登录失败或需要验证码: {}", e);
                Ok(LoginOutcome::Rejected(e.to_string()))
            }
        }
    }

    async fn switch_to_password_mode<T: Tab>(&self, tab: &T) -> Result<()> {
        tab.wait_for(&self.selectors.login_toggle, self.timeouts.login_toggle())
            .await?;
        tab.click(&self.selectors.login_toggle).await
    }

    /// 轮询当前地址，直到离开登录页
    async fn wait_for_redirect<T: Tab>(
        &self,
        tab: &T,
        timeout: Duration,
        poll: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut current_url = String::new();
        loop {
            // 跳转过程中读取地址可能失败，继续轮询即可
            if let Ok(url) = tab.current_url().await {
                if self.is_authenticated_url(&url) {
                    return Ok(());
                }
                current_url = url;
            }
            if Instant::now() >= deadline {
                return Err(AppError::Browser(BrowserError::RedirectTimeout {
                    current_url,
                    timeout,
                })
                .into());
            }
            sleep(poll).await;
        }
    }

    fn is_authenticated_url(&self, url: &str) -> bool {
        url.contains(&self.site_host) && !url.contains("signin")
    }
}
