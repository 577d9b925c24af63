// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::domain::repositories::transaction_repository::TransactionRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::webhook_fanout::WebhookFanout;
use crate::utils::clock::Clock;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 交易状态服务
///
/// 外部交易处理模块的入口：持久化状态后触发Webhook扇出。
/// 扇出的任何失败都只记录日志，不会让状态更新失败。
pub struct TransactionStatusService {
    transactions: Arc<dyn TransactionRepository>,
    fanout: Arc<WebhookFanout>,
    clock: Arc<dyn Clock>,
}

impl TransactionStatusService {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        fanout: Arc<WebhookFanout>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transactions,
            fanout,
            clock,
        }
    }

    /// 记录一笔新交易并发送 `payment.pending`
    ///
    /// # 参数
    ///
    /// * `user_id` - 所属用户ID
    /// * `amount` - 金额
    /// * `transaction_type` - 交易类型
    ///
    /// # 返回值
    ///
    /// * `Ok(Transaction)` - 已持久化的交易
    /// * `Err(RepositoryError)` - 持久化失败
    pub async fn create_transaction(
        &self,
        user_id: Uuid,
        amount: Decimal,
        transaction_type: TransactionType,
    ) -> Result<Transaction, RepositoryError> {
        let transaction = Transaction::new(user_id, amount, transaction_type, self.clock.now());
        let created = self.transactions.create(&transaction).await?;
        info!(transaction_id = %created.id, %user_id, "Transaction created");

        self.fanout
            .notify_status_change(created.id, created.status)
            .await;
        Ok(created)
    }

    /// 更新交易状态并通知已注册的端点
    ///
    /// # 参数
    ///
    /// * `transaction_id` - 交易ID
    /// * `status` - 新状态
    ///
    /// # 返回值
    ///
    /// * `Ok(Transaction)` - 更新后的交易
    /// * `Err(RepositoryError::NotFound)` - 交易不存在
    pub async fn update_status(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
    ) -> Result<Transaction, RepositoryError> {
        let updated = self
            .transactions
            .update_status(transaction_id, status, self.clock.now())
            .await?;
        info!(%transaction_id, %status, "Transaction status updated");

        self.fanout.notify_status_change(transaction_id, status).await;
        Ok(updated)
    }
}
