//! 收藏夹导出器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个运行的入口，驱动如下状态机：
//!
//! ```text
//! Init → LoggingIn ─┬→ Failed ───────────────┐
//!                   └→ PagingPages ──────────┴→ BrowserClosed
//! ```
//!
//! - 文件头在碰浏览器之前写入
//! - 登录被拒：不访问任何列表页
//! - 列表页导航或查询出错：放弃该页，等待更久后继续下一页
//! - 写文件失败或登录过程出错：截图留证
//! - 无论成功失败，最后都关闭浏览器

use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error;
use crate::infrastructure::{Session, Tab};
use crate::models::CollectionRequest;
use crate::orchestrator::page_processor::{PageProcessor, PageStats};
use crate::services::{pacing, LoginOutcome, LoginService, RecordWriter};
use crate::utils::logging;
use crate::workflow::IndexCounter;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    LoggingIn,
    PagingPages,
    Failed,
    BrowserClosed,
}

/// 运行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// 页码范围内的页面都已处理
    Completed,
    /// 登录未通过，没有访问列表页
    LoginRejected(String),
    /// 主流程出错中止
    Aborted(String),
}

/// 运行统计
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub outcome: RunOutcome,
    pub final_state: RunState,
    /// 写入的记录数（含占位记录）
    pub total_items: usize,
    pub pages_loaded: usize,
    pub pages_empty: usize,
    pub pages_failed: usize,
}

impl RunSummary {
    fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            outcome: RunOutcome::Completed,
            final_state: RunState::Init,
            total_items: 0,
            pages_loaded: 0,
            pages_empty: 0,
            pages_failed: 0,
        }
    }

    fn record_page(&mut self, stats: &PageStats) {
        if stats.is_empty() {
            self.pages_empty += 1;
        } else {
            self.pages_loaded += 1;
        }
    }
}

/// 收藏夹导出器
pub struct Exporter<'c> {
    config: &'c Config,
    request: CollectionRequest,
    writer: RecordWriter,
    state: RunState,
}

impl<'c> Exporter<'c> {
    /// 创建导出器并写入文件头
    pub fn start(config: &'c Config, request: CollectionRequest) -> Result<Self> {
        let path = request.output_path(&config.output_dir, &config.output_label);
        let writer = RecordWriter::new(path, request.content_mode);

        logging::log_startup(&request, writer.path());
        writer.write_header(&request, chrono::Local::now().naive_local())?;

        Ok(Self {
            config,
            request,
            writer,
            state: RunState::Init,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn writer(&self) -> &RecordWriter {
        &self.writer
    }

    /// 运行整个流程，结束时浏览器会话一定已关闭
    pub async fn run<S: Session>(&mut self, session: &mut S) -> Result<RunSummary> {
        let mut summary = RunSummary::new(self.writer.path().to_path_buf());

        if let Err(e) = self.drive(&*session, &mut summary).await {
            error!("❌ 主流程出错: {:#}", e);
            self.transition(RunState::Failed);
            summary.outcome = RunOutcome::Aborted(format!("{:#}", e));
            self.capture_screenshot(&*session).await;
        }

        info!("关闭浏览器...");
        if let Err(e) = session.quit().await {
            warn!("关闭浏览器失败: {}", e);
        }
        self.transition(RunState::BrowserClosed);
        summary.final_state = self.state;

        logging::print_final_stats(
            summary.total_items,
            summary.pages_loaded,
            summary.pages_empty,
            &summary.output_path,
        );
        Ok(summary)
    }

    async fn drive<S: Session>(&mut self, session: &S, summary: &mut RunSummary) -> Result<()> {
        self.transition(RunState::LoggingIn);
        let login = LoginService::new(self.config);
        if let LoginOutcome::Rejected(reason) = login.login(session.primary()).await? {
            error!("登录失败，无法继续下载");
            self.transition(RunState::Failed);
            summary.outcome = RunOutcome::LoginRejected(reason);
            return Ok(());
        }

        self.transition(RunState::PagingPages);
        let processor = PageProcessor::new(self.config, &self.request, self.writer.clone())?;
        let mut counter = IndexCounter::new();
        let result = self
            .page_loop(session, &processor, &mut counter, summary)
            .await;
        summary.total_items = counter.written();
        result
    }

    async fn page_loop<S: Session>(
        &self,
        session: &S,
        processor: &PageProcessor,
        counter: &mut IndexCounter,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let range = self.request.page_range;
        if range.is_empty() {
            warn!(
                "⚠️ 起始页 {} 大于结束页 {}，没有需要处理的页面",
                range.start, range.end
            );
            return Ok(());
        }

        let pacing_config = &self.config.pacing;
        let mut consecutive_empty = 0u32;

        for page in range.pages() {
            logging::log_page_start(page);

            match processor.process(session, page, counter).await {
                Ok(stats) => {
                    summary.record_page(&stats);
                    logging::log_page_complete(page, stats.observed);

                    consecutive_empty = if stats.is_empty() { consecutive_empty + 1 } else { 0 };
                    if let Some(limit) = self.config.max_consecutive_empty_pages {
                        if consecutive_empty >= limit {
                            info!("连续 {} 页没有内容，停止翻页", consecutive_empty);
                            break;
                        }
                    }

                    if !range.is_last(page) {
                        pacing::pause(pacing_config.between_pages, "翻页间隔").await;
                    }
                }
                Err(e) if error::is_output_failure(&e) => return Err(e),
                Err(e) => {
                    error!("处理第 {} 页时出错: {:#}", page, e);
                    summary.pages_failed += 1;
                    if !range.is_last(page) {
                        pacing::pause(pacing_config.error_backoff, "出错后等待").await;
                    }
                }
            }
        }
        Ok(())
    }

    async fn capture_screenshot<S: Session>(&self, session: &S) {
        let path = &self.config.error_screenshot;
        match session.primary().screenshot(path).await {
            Ok(()) => info!("已保存错误截图: {}", path.display()),
            Err(e) => warn!("保存错误截图失败: {}", e),
        }
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!("状态: {:?} → {:?}", self.state, next);
        self.state = next;
    }
}
