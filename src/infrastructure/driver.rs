//! 浏览器能力抽象 - 基础设施层
//!
//! 上层只通过这两个 trait 使用浏览器：
//! - `Tab`：单个标签页上的导航、等待、脚本、元素读取
//! - `Session`：标签页的打开、关闭、切换和整个会话的退出
//!
//! chromiumoxide 的实现在 `chrome` 模块，测试中使用内存实现。

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// 列表页中的单个收藏项
#[async_trait]
pub trait ItemHandle: Send + Sync {
    /// 读取子元素的文本，子元素不存在时返回错误
    async fn text_of(&self, selector: &str) -> Result<String>;

    /// 读取子元素的属性，子元素不存在时返回错误，属性不存在时返回 None
    async fn attribute_of(&self, selector: &str, name: &str) -> Result<Option<String>>;
}

/// 标签页
#[async_trait]
pub trait Tab: Clone + Send + Sync {
    type Item: ItemHandle;

    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// 等待元素出现，超时返回 `BrowserError::WaitTimeout`
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// 清空输入框并输入文字
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;

    /// 执行 JS 并返回 JSON 结果
    async fn eval(&self, js_code: &str) -> Result<JsonValue>;

    async fn find_items(&self, selector: &str) -> Result<Vec<Self::Item>>;

    /// 当前页面完整 HTML
    async fn content(&self) -> Result<String>;

    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// 执行 JS 并反序列化为指定类型
    async fn eval_as<T: DeserializeOwned + Send>(&self, js_code: &str) -> Result<T> {
        let value = self.eval(js_code).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// 浏览器会话
#[async_trait]
pub trait Session: Send + Sync {
    type Tab: Tab;

    /// 主标签页，列表页都在这里打开
    fn primary(&self) -> &Self::Tab;

    /// 打开一个空白标签页并切换过去
    async fn open_tab(&self) -> Result<Self::Tab>;

    async fn close_tab(&self, tab: Self::Tab) -> Result<()>;

    /// 将焦点切回主标签页
    async fn focus_primary(&self) -> Result<()>;

    async fn tab_count(&self) -> Result<usize>;

    /// 关闭会话
    async fn quit(&mut self) -> Result<()>;
}
