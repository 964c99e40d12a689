//! 收藏项处理上下文
//!
//! 封装"我正在处理第几页的第几项、全局序号是多少"这一信息

use std::fmt::Display;

/// 收藏项处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCtx {
    /// 列表页页码
    pub page: u32,

    /// 在当前页中的位置（从1开始）
    pub position: usize,

    /// 全局序号，跨页连续递增（从1开始），写入输出文件
    pub index: usize,
}

impl ItemCtx {
    pub fn new(page: u32, position: usize, index: usize) -> Self {
        Self {
            page,
            position,
            index,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[第 {} 页 第 {} 项 #{}]", self.page, self.position, self.index)
    }
}

/// 全局序号计数器
#[derive(Debug, Default)]
pub struct IndexCounter {
    last: usize,
    written: usize,
}

impl IndexCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取下一个序号
    pub fn next_index(&mut self) -> usize {
        self.last += 1;
        self.last
    }

    /// 记录一条已写入文件的记录
    pub fn mark_written(&mut self) {
        self.written += 1;
    }

    /// 已写入文件的记录数
    pub fn written(&self) -> usize {
        self.written
    }
}
