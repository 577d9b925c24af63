// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::webhook_delivery_repository::WebhookDeliveryRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::webhook_dispatcher::{DispatchOutcome, WebhookDispatcher};
use crate::utils::clock::Clock;
use chrono::Duration;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 一次清扫的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// 从卡住状态放回 Failed 的记录数
    pub requeued: u64,
    /// 查询到的到期记录数
    pub selected: usize,
    /// 成功认领的记录数
    pub claimed: usize,
    pub delivered: usize,
    pub failed: usize,
    /// 认领后被分发器拒绝、已释放认领的记录数
    pub released: usize,
}

/// 重试清扫器
///
/// 一次清扫：先回收卡住的记录，再查询到期的失败投递，
/// 逐条认领（Failed → Retrying）并同步分发。
/// 清扫节奏由外部驱动，见 `workers::retry_worker`。
#[derive(Clone)]
pub struct RetrySweeper {
    deliveries: Arc<dyn WebhookDeliveryRepository>,
    dispatcher: Arc<WebhookDispatcher>,
    clock: Arc<dyn Clock>,
    batch_size: u64,
    stall_timeout: Duration,
}

impl RetrySweeper {
    /// 创建新的清扫器
    ///
    /// # 参数
    ///
    /// * `deliveries` - 投递仓库
    /// * `dispatcher` - 分发器
    /// * `clock` - 时钟
    /// * `batch_size` - 每次清扫最多处理的记录数
    /// * `stall_timeout` - 记录停留在 Retrying/Pending 多久算卡住
    pub fn new(
        deliveries: Arc<dyn WebhookDeliveryRepository>,
        dispatcher: Arc<WebhookDispatcher>,
        clock: Arc<dyn Clock>,
        batch_size: u64,
        stall_timeout: Duration,
    ) -> Self {
        Self {
            deliveries,
            dispatcher,
            clock,
            batch_size,
            stall_timeout,
        }
    }

    /// 执行一次清扫
    ///
    /// # 返回值
    ///
    /// * `Ok(SweepReport)` - 本次清扫的统计
    /// * `Err(RepositoryError)` - 回收或查询阶段的存储错误
    pub async fn sweep(&self) -> Result<SweepReport, RepositoryError> {
        let mut report = SweepReport::default();
        let now = self.clock.now();

        report.requeued = self
            .deliveries
            .requeue_stalled(now - self.stall_timeout, now)
            .await?;
        if report.requeued > 0 {
            warn!(count = report.requeued, "Requeued stalled webhook deliveries");
        }

        let due = self
            .deliveries
            .find_due_for_retry(now, self.dispatcher.policy().max_attempts, self.batch_size)
            .await?;
        report.selected = due.len();

        for delivery in due {
            let claimed = match self
                .deliveries
                .claim_for_retry(delivery.id, self.clock.now())
                .await
            {
                Ok(claimed) => claimed,
                Err(e) => {
                    error!(delivery_id = %delivery.id, "Failed to claim delivery: {}", e);
                    continue;
                }
            };
            if !claimed {
                debug!(delivery_id = %delivery.id, "Delivery claimed by another sweep");
                continue;
            }
            report.claimed += 1;
            counter!("webhook_sweep_claimed_total").increment(1);

            match self.dispatcher.dispatch(delivery.id).await {
                Ok(DispatchOutcome::Delivered) => report.delivered += 1,
                Ok(DispatchOutcome::Failed { .. }) => report.failed += 1,
                Ok(DispatchOutcome::Skipped(reason)) => {
                    debug!(delivery_id = %delivery.id, ?reason, "Releasing claimed delivery");
                    self.release(delivery.id).await;
                    report.released += 1;
                }
                Err(e) => {
                    error!(delivery_id = %delivery.id, "Retry dispatch failed: {}", e);
                    self.release(delivery.id).await;
                    report.released += 1;
                }
            }
        }

        if report.selected > 0 {
            info!(
                selected = report.selected,
                claimed = report.claimed,
                delivered = report.delivered,
                failed = report.failed,
                released = report.released,
                "Retry sweep finished"
            );
        }

        Ok(report)
    }

    async fn release(&self, delivery_id: uuid::Uuid) {
        if let Err(e) = self
            .deliveries
            .release_claim(delivery_id, self.clock.now())
            .await
        {
            error!(%delivery_id, "Failed to release delivery claim: {}", e);
        }
    }
}
