//! # Zhihu Collect
//!
//! 用浏览器登录知乎，逐页抓取收藏夹，把标题和链接或完整正文保存到文本文件
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 浏览器能力抽象（`Session` / `Tab`）和 chromiumoxide 实现
//! - `with_tab` - 临时标签页，保证关闭并切回主标签页
//!
//! ### ② 业务能力层（Services）
//! - `LoginService` - 账号密码登录
//! - `PageLoader` - 列表页加载和滚动
//! - `ItemExtractor` - 按策略提取标题和链接
//! - `ArticleFetcher` / `ArticleParser` - 文章正文抓取和转换
//! - `RecordWriter` - 追加写输出文件
//!
//! ### ③ 流程层（Workflow）
//! - `ItemCtx` - 页码、页内位置、全局序号
//! - `ItemFlow` - 一个收藏项的处理流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/exporter` - 运行状态机：登录 → 翻页 → 关闭浏览器
//! - `orchestrator/page_processor` - 单页处理

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::process_collection;
pub use config::Config;
pub use error::{AppError, BrowserError, ConfigError, FileError};
pub use infrastructure::{with_tab, ItemHandle, Session, Tab};
pub use models::{CollectionRequest, ContentMode, PageRange};
pub use orchestrator::{Exporter, RunOutcome, RunState, RunSummary};
