// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};

/// 重试延迟表（秒），按已尝试次数索引，超出部分取最后一项
pub const RETRY_DELAYS_SECS: [i64; 5] = [60, 300, 900, 3600, 21600];

/// 单条投递记录允许的最大尝试次数
pub const MAX_ATTEMPTS: i32 = 5;

/// Webhook重试策略
///
/// 阶梯式封顶退避：延迟从固定的递增表中取值，
/// 尝试次数超出表长时一直使用最后一项。
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 最大尝试次数
    pub max_attempts: i32,
    /// 延迟表（秒），必须非递减
    pub delays_secs: &'static [i64],
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delays_secs: &RETRY_DELAYS_SECS,
        }
    }
}

impl RetryPolicy {
    /// 计算给定尝试次数对应的退避时长
    ///
    /// # 参数
    ///
    /// * `attempts` - 已完成的尝试次数
    ///
    /// # 返回值
    ///
    /// 延迟表中对应的时长，负数按0处理，越界按最后一项处理
    pub fn calculate_backoff(&self, attempts: i32) -> Duration {
        let last = self.delays_secs.len().saturating_sub(1);
        let index = usize::try_from(attempts.max(0)).unwrap_or(usize::MAX).min(last);
        Duration::seconds(self.delays_secs.get(index).copied().unwrap_or(0))
    }

    /// 计算下次重试时间
    ///
    /// # 参数
    ///
    /// * `attempts` - 本次失败之后的尝试次数
    /// * `base_time` - 计算基准时间（通常为当前时间）
    ///
    /// # 返回值
    ///
    /// 基准时间加上对应退避时长
    pub fn next_retry_time(&self, attempts: i32, base_time: DateTime<Utc>) -> DateTime<Utc> {
        base_time + self.calculate_backoff(attempts)
    }

    /// 是否还能继续尝试
    pub fn should_retry(&self, attempts: i32) -> bool {
        attempts < self.max_attempts
    }
}
