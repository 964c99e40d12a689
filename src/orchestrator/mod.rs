//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `exporter` - 整体运行
//! - 写文件头、登录、翻页、截图、关闭浏览器
//! - 运行状态机和全局统计
//!
//! ### `page_processor` - 单页处理
//! - 加载列表页、遍历收藏项、分配全局序号
//!
//! ## 层次关系
//!
//! ```text
//! exporter (处理页码范围)
//!     ↓
//! page_processor (处理一页的收藏项)
//!     ↓
//! workflow::ItemFlow (处理单个收藏项)
//!     ↓
//! services (能力层：login / page_loader / extractor / fetcher / writer)
//!     ↓
//! infrastructure (基础设施：Session / Tab)
//! ```

pub mod exporter;
pub mod page_processor;

pub use exporter::{Exporter, RunOutcome, RunState, RunSummary};
pub use page_processor::{PageProcessor, PageStats};
