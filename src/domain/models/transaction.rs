// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::webhook::WebhookEvent;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 交易实体
///
/// 由外部的交易处理模块维护，投递引擎只读取其
/// ID、所属用户、金额、类型和状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// 交易唯一标识符
    pub id: Uuid,
    /// 所属用户ID，决定哪些Webhook端点会收到通知
    pub user_id: Uuid,
    /// 交易金额，保持原始精度
    pub amount: Decimal,
    /// 交易类型
    pub transaction_type: TransactionType,
    /// 交易状态
    pub status: TransactionStatus,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// 创建一笔新的待处理交易
    ///
    /// # 参数
    ///
    /// * `user_id` - 所属用户ID
    /// * `amount` - 交易金额
    /// * `transaction_type` - 交易类型
    /// * `now` - 创建时间
    ///
    /// # 返回值
    ///
    /// 状态为 `Pending` 的交易
    pub fn new(
        user_id: Uuid,
        amount: Decimal,
        transaction_type: TransactionType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            transaction_type,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 交易类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// 充值
    Deposit,
    /// 提现
    Withdrawal,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "DEPOSIT"),
            TransactionType::Withdrawal => write!(f, "WITHDRAWAL"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            _ => Err(()),
        }
    }
}

/// 交易状态枚举
///
/// 状态流转：Pending → Processing → Completed/Failed。
/// 每次变化都会触发一次Webhook扇出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// 待处理
    #[default]
    Pending,
    /// 处理中
    Processing,
    /// 已完成
    Completed,
    /// 已失败
    Failed,
}

impl TransactionStatus {
    /// 状态对应的Webhook事件
    ///
    /// 映射是穷尽的：新增状态时编译器会要求在这里补上事件
    pub fn webhook_event(self) -> WebhookEvent {
        match self {
            TransactionStatus::Pending => WebhookEvent::PaymentPending,
            TransactionStatus::Processing => WebhookEvent::PaymentProcessing,
            TransactionStatus::Completed => WebhookEvent::PaymentSuccess,
            TransactionStatus::Failed => WebhookEvent::PaymentFailed,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Processing => write!(f, "PROCESSING"),
            TransactionStatus::Completed => write!(f, "COMPLETED"),
            TransactionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TransactionStatus::Pending),
            "PROCESSING" => Ok(TransactionStatus::Processing),
            "COMPLETED" => Ok(TransactionStatus::Completed),
            "FAILED" => Ok(TransactionStatus::Failed),
            _ => Err(()),
        }
    }
}
