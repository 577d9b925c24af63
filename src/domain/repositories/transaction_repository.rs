// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::transaction::{Transaction, TransactionStatus};
use crate::domain::models::webhook::WebhookEndpoint;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 交易仓库特质
///
/// 定义交易数据访问接口
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// 创建交易
    async fn create(&self, transaction: &Transaction) -> Result<Transaction, RepositoryError>;
    /// 根据ID查找交易
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, RepositoryError>;
    /// 更新交易状态，交易不存在时返回 `NotFound`
    async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<Transaction, RepositoryError>;
    /// 查找交易及其所属用户当前启用的全部端点
    async fn find_with_active_endpoints(
        &self,
        id: Uuid,
    ) -> Result<Option<(Transaction, Vec<WebhookEndpoint>)>, RepositoryError>;
}
