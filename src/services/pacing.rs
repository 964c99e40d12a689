//! 限速服务 - 业务能力层
//!
//! 所有"避免请求过快"的随机等待都从这里走

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

use crate::config::DelayRange;

/// 在区间内随机取一个时长
pub fn pick(range: DelayRange) -> Duration {
    let (low, high) = if range.min_ms <= range.max_ms {
        (range.min_ms, range.max_ms)
    } else {
        (range.max_ms, range.min_ms)
    };
    if low == high {
        return Duration::from_millis(low);
    }
    Duration::from_millis(rand::thread_rng().gen_range(low..=high))
}

/// 随机等待
pub async fn pause(range: DelayRange, reason: &str) {
    let delay = pick(range);
    if delay.is_zero() {
        return;
    }
    debug!("等待 {} 毫秒 ({})", delay.as_millis(), reason);
    sleep(delay).await;
}
