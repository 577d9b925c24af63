// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::transaction::TransactionStatus;
use crate::domain::models::webhook::{WebhookDelivery, WebhookPayload};
use crate::domain::repositories::transaction_repository::TransactionRepository;
use crate::domain::repositories::webhook_delivery_repository::WebhookDeliveryRepository;
use crate::domain::repositories::RepositoryError;
use crate::queue::dispatch_queue::DispatchQueue;
use crate::utils::clock::Clock;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Webhook事件扇出服务
///
/// 交易状态变化时，为交易所属用户的每个启用端点创建一条投递记录，
/// 然后把投递ID交给分发队列，自身不等待投递结果。
#[derive(Clone)]
pub struct WebhookFanout {
    transactions: Arc<dyn TransactionRepository>,
    deliveries: Arc<dyn WebhookDeliveryRepository>,
    queue: Arc<dyn DispatchQueue>,
    clock: Arc<dyn Clock>,
}

impl WebhookFanout {
    /// 创建新的扇出服务
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        deliveries: Arc<dyn WebhookDeliveryRepository>,
        queue: Arc<dyn DispatchQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transactions,
            deliveries,
            queue,
            clock,
        }
    }

    /// 为一次交易状态变化创建并排队投递
    ///
    /// # 参数
    ///
    /// * `transaction_id` - 交易ID
    /// * `status` - 新状态，决定事件名
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Uuid>)` - 已持久化的投递ID，交易不存在或没有启用端点时为空
    /// * `Err(RepositoryError)` - 读取交易失败
    pub async fn trigger_for_transaction(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
    ) -> Result<Vec<Uuid>, RepositoryError> {
        let Some((transaction, endpoints)) = self
            .transactions
            .find_with_active_endpoints(transaction_id)
            .await?
        else {
            debug!(%transaction_id, "Transaction not found, no webhooks to send");
            return Ok(Vec::new());
        };

        if endpoints.is_empty() {
            debug!(%transaction_id, user_id = %transaction.user_id, "No active webhook endpoints");
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let event = status.webhook_event();
        // Serialized once so every endpoint receives identical bytes
        let payload = serde_json::to_string(&WebhookPayload::from_transaction(
            event,
            &transaction,
            now,
        ))
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

        let mut created = Vec::with_capacity(endpoints.len());
        for endpoint in &endpoints {
            let delivery =
                WebhookDelivery::new(transaction.id, endpoint.id, event, payload.clone(), now);

            if let Err(e) = self.deliveries.create(&delivery).await {
                error!(
                    %transaction_id,
                    endpoint_id = %endpoint.id,
                    "Failed to create webhook delivery: {}",
                    e
                );
                continue;
            }
            counter!("webhook_deliveries_created_total").increment(1);
            created.push(delivery.id);

            // A lost handoff is recovered by the stall sweep, the record is already durable
            if let Err(e) = self.queue.enqueue(delivery.id).await {
                warn!(delivery_id = %delivery.id, "Failed to enqueue webhook delivery: {}", e);
            }
        }

        info!(
            %transaction_id,
            event = %event,
            deliveries = created.len(),
            "Webhook deliveries created"
        );

        Ok(created)
    }

    /// 交易状态变化的通知入口
    ///
    /// 与 [`Self::trigger_for_transaction`] 相同，但任何错误只记录日志，
    /// 调用方永远不会因为Webhook而失败
    pub async fn notify_status_change(&self, transaction_id: Uuid, status: TransactionStatus) {
        if let Err(e) = self.trigger_for_transaction(transaction_id, status).await {
            error!(%transaction_id, %status, "Webhook fan-out failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "webhook_fanout_test.rs"]
mod tests;
