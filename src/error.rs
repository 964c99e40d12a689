use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error(transparent)]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error(transparent)]
    File(#[from] FileError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {reason}")]
    LaunchFailed { reason: String },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port})")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 等待元素超时
    #[error("等待元素 {selector} 超时 ({}秒)", .timeout.as_secs())]
    WaitTimeout { selector: String, timeout: Duration },
    /// 等待跳转超时
    #[error("等待页面跳转超时 ({}秒), 当前地址: {current_url}", .timeout.as_secs())]
    RedirectTimeout {
        current_url: String,
        timeout: Duration,
    },
    /// 列表页导航或查询出错，整页放弃
    #[error("第 {page} 页加载出错: {reason}")]
    PageLoadFailed { page: u32, reason: String },
    /// 元素不存在
    #[error("找不到元素: {selector}")]
    ElementNotFound { selector: String },
    /// 无效的选择器
    #[error("无效的选择器: {selector}")]
    InvalidSelector { selector: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({})", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 收藏夹ID为空
    #[error("收藏夹ID不能为空")]
    EmptyCollectionId,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建等待超时错误
    pub fn wait_timeout(selector: impl Into<String>, timeout: Duration) -> Self {
        AppError::Browser(BrowserError::WaitTimeout {
            selector: selector.into(),
            timeout,
        })
    }

    /// 创建元素不存在错误
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        AppError::Browser(BrowserError::ElementNotFound {
            selector: selector.into(),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为等待超时
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            AppError::Browser(BrowserError::WaitTimeout { .. })
                | AppError::Browser(BrowserError::RedirectTimeout { .. })
        )
    }
}

/// 判断 anyhow 错误链中是否含有输出文件写入失败
///
/// 输出文件不可写时继续翻页没有意义，这类错误需要越过页级别的兜底
pub fn is_output_failure(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<AppError>(),
            Some(AppError::File(FileError::WriteFailed { .. }))
        )
    })
}

/// 判断 anyhow 错误是否为等待超时
pub fn is_timeout(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<AppError>(), Some(e) if e.is_timeout()))
}
