// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::webhook::{DeliveryOutcome, WebhookDelivery, WebhookDeliveryStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 投递记录查询参数
#[derive(Debug, Default, Clone)]
pub struct DeliveryQueryParams {
    /// 通过交易所属用户限定范围
    pub user_id: Uuid,
    pub endpoint_id: Option<Uuid>,
    pub status: Option<WebhookDeliveryStatus>,
    pub limit: u64,
    pub offset: u64,
}

/// Webhook投递仓库特质
///
/// 所有状态变更都是带条件的单条 UPDATE，由返回值告知调用方是否生效
#[async_trait]
pub trait WebhookDeliveryRepository: Send + Sync {
    /// 创建投递记录
    async fn create(&self, delivery: &WebhookDelivery) -> Result<WebhookDelivery, RepositoryError>;

    /// 根据ID查找投递记录
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WebhookDelivery>, RepositoryError>;

    /// 写回一次尝试的结果
    ///
    /// 仅当记录不是 `Success` 且尝试次数仍为 `outcome.attempts - 1` 时生效
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 结果已写入
    /// * `Ok(false)` - 记录已被其他尝试推进或已成功，未写入
    async fn record_outcome(
        &self,
        id: Uuid,
        outcome: &DeliveryOutcome,
    ) -> Result<bool, RepositoryError>;

    /// 认领一条待重试记录：`Failed → Retrying`
    async fn claim_for_retry(&self, id: Uuid, now: DateTime<Utc>)
        -> Result<bool, RepositoryError>;

    /// 释放认领：`Retrying → Failed`，不改动尝试次数和重试时间
    async fn release_claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, RepositoryError>;

    /// 查找到期的失败记录
    ///
    /// 条件：状态为 `Failed`、`next_retry_at <= now`、尝试次数小于上限，
    /// 且端点仍存在并处于启用状态
    async fn find_due_for_retry(
        &self,
        now: DateTime<Utc>,
        max_attempts: i32,
        limit: u64,
    ) -> Result<Vec<WebhookDelivery>, RepositoryError>;

    /// 把卡住的记录放回 `Failed`
    ///
    /// 覆盖 `Retrying` 记录，以及从未尝试过的 `Pending` 记录，
    /// 条件是 `updated_at` 早于 `older_than`
    async fn requeue_stalled(
        &self,
        older_than: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepositoryError>;

    /// 分页查询投递历史，按创建时间倒序
    async fn query(
        &self,
        params: DeliveryQueryParams,
    ) -> Result<(Vec<WebhookDelivery>, u64), RepositoryError>;
}
