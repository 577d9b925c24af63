// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{WebhookDelivery, WebhookDeliveryStatus};
use crate::domain::repositories::transaction_repository::TransactionRepository;
use crate::domain::repositories::webhook_delivery_repository::{
    DeliveryQueryParams, WebhookDeliveryRepository,
};
use crate::domain::repositories::webhook_endpoint_repository::WebhookEndpointRepository;
use crate::utils::errors::DomainError;
use std::sync::Arc;
use uuid::Uuid;

/// 默认分页大小
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// 分页大小上限
pub const MAX_PAGE_SIZE: u64 = 100;

/// 投递历史查询条件
#[derive(Debug, Default, Clone)]
pub struct DeliveryHistoryQuery {
    pub endpoint_id: Option<Uuid>,
    pub status: Option<WebhookDeliveryStatus>,
    /// 默认50，最大100
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// 一页投递记录
#[derive(Debug, Clone)]
pub struct DeliveryPage {
    pub items: Vec<WebhookDelivery>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// 投递历史用例
///
/// 归属通过交易的所属用户判断，端点被删除后历史仍然可见
pub struct DeliveryHistoryUseCase {
    deliveries: Arc<dyn WebhookDeliveryRepository>,
    endpoints: Arc<dyn WebhookEndpointRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl DeliveryHistoryUseCase {
    pub fn new(
        deliveries: Arc<dyn WebhookDeliveryRepository>,
        endpoints: Arc<dyn WebhookEndpointRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            deliveries,
            endpoints,
            transactions,
        }
    }

    /// 分页列出用户的投递记录，新的在前
    ///
    /// # 参数
    ///
    /// * `user_id` - 调用方用户ID
    /// * `query` - 过滤与分页条件
    ///
    /// # 返回值
    ///
    /// * `Ok(DeliveryPage)` - 本页记录与总数
    /// * `Err(DomainError::NotFound)` - 过滤的端点属于其他用户
    pub async fn list(
        &self,
        user_id: Uuid,
        query: DeliveryHistoryQuery,
    ) -> Result<DeliveryPage, DomainError> {
        if let Some(endpoint_id) = query.endpoint_id {
            // A deleted endpoint can still be filtered on, its history stays visible
            if let Some(endpoint) = self.endpoints.find_by_id(endpoint_id).await? {
                if endpoint.user_id != user_id {
                    return Err(DomainError::NotFound);
                }
            }
        }

        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = query.offset.unwrap_or(0);

        let (items, total) = self
            .deliveries
            .query(DeliveryQueryParams {
                user_id,
                endpoint_id: query.endpoint_id,
                status: query.status,
                limit,
                offset,
            })
            .await?;

        Ok(DeliveryPage {
            items,
            total,
            limit,
            offset,
        })
    }

    /// 查看单条投递记录
    ///
    /// 记录不存在或所属交易不属于该用户时返回 `NotFound`
    pub async fn get(&self, user_id: Uuid, delivery_id: Uuid) -> Result<WebhookDelivery, DomainError> {
        let delivery = self
            .deliveries
            .find_by_id(delivery_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        match self.transactions.find_by_id(delivery.transaction_id).await? {
            Some(transaction) if transaction.user_id == user_id => Ok(delivery),
            _ => Err(DomainError::NotFound),
        }
    }
}
