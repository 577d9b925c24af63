// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::transaction::{Transaction, TransactionStatus, TransactionType};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Webhook端点实体
///
/// 商户注册的通知目标。密钥在注册时生成一次，之后不会被隐式更换。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    /// 端点唯一标识符
    pub id: Uuid,
    /// 所属用户ID
    pub user_id: Uuid,
    /// 回调URL，必须是绝对的 http(s) 地址
    pub url: String,
    /// 签名密钥
    pub secret: String,
    /// 是否启用，停用的端点不会再收到任何投递
    pub is_active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl WebhookEndpoint {
    /// 创建一个新的启用状态的端点
    ///
    /// # 参数
    ///
    /// * `user_id` - 所属用户ID
    /// * `url` - 回调URL
    /// * `secret` - 签名密钥
    /// * `now` - 创建时间
    ///
    /// # 返回值
    ///
    /// 返回新的端点实例
    pub fn new(user_id: Uuid, url: String, secret: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            url,
            secret,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Webhook事件名
///
/// 由交易状态推导，见 [`TransactionStatus::webhook_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "payment.pending")]
    PaymentPending,
    #[serde(rename = "payment.processing")]
    PaymentProcessing,
    #[serde(rename = "payment.success")]
    PaymentSuccess,
    #[serde(rename = "payment.failed")]
    PaymentFailed,
}

impl WebhookEvent {
    /// 事件在线上传输时使用的名字
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::PaymentPending => "payment.pending",
            WebhookEvent::PaymentProcessing => "payment.processing",
            WebhookEvent::PaymentSuccess => "payment.success",
            WebhookEvent::PaymentFailed => "payment.failed",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Webhook投递状态
///
/// Pending → Success，或 Pending → Failed → Retrying → Success/Failed。
/// Success 是终态；达到最大尝试次数的 Failed 也是终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookDeliveryStatus {
    /// 已创建，等待首次投递
    #[default]
    Pending,
    /// 已被重试清扫认领，正在投递
    Retrying,
    /// 投递成功
    Success,
    /// 投递失败，等待重试或已耗尽
    Failed,
}

impl fmt::Display for WebhookDeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WebhookDeliveryStatus::Pending => write!(f, "PENDING"),
            WebhookDeliveryStatus::Retrying => write!(f, "RETRYING"),
            WebhookDeliveryStatus::Success => write!(f, "SUCCESS"),
            WebhookDeliveryStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for WebhookDeliveryStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(WebhookDeliveryStatus::Pending),
            "RETRYING" => Ok(WebhookDeliveryStatus::Retrying),
            "SUCCESS" => Ok(WebhookDeliveryStatus::Success),
            "FAILED" => Ok(WebhookDeliveryStatus::Failed),
            _ => Err(()),
        }
    }
}

/// Webhook投递记录
///
/// 一笔交易的一次状态变化通知到一个端点。负载在创建时冻结，
/// 每次重试签名和发送的都是同一份字节。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookDelivery {
    /// 投递唯一标识符
    pub id: Uuid,
    /// 关联的交易ID
    pub transaction_id: Uuid,
    /// 目标端点ID，端点被删除后仍保留
    pub webhook_endpoint_id: Uuid,
    /// 事件名
    pub event: String,
    /// 序列化后的负载，创建后不再变化
    pub payload: String,
    /// 投递状态
    pub status: WebhookDeliveryStatus,
    /// 已尝试次数，只增不减
    pub attempts: i32,
    /// 最后一次尝试时间
    pub last_attempt_at: Option<DateTime<Utc>>,
    /// 下次重试时间，为空表示未排期
    pub next_retry_at: Option<DateTime<Utc>>,
    /// 最后一次响应的HTTP状态码
    pub response_status: Option<i32>,
    /// 最后一次响应体（截断）
    pub response_body: Option<String>,
    /// 最后一次错误描述（截断）
    pub error_message: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl WebhookDelivery {
    /// 创建一条可立即投递的记录
    ///
    /// # 参数
    ///
    /// * `transaction_id` - 交易ID
    /// * `webhook_endpoint_id` - 目标端点ID
    /// * `event` - 事件
    /// * `payload` - 已序列化的负载
    /// * `now` - 创建时间，同时作为 `next_retry_at`
    ///
    /// # 返回值
    ///
    /// 状态为 `Pending`、尝试次数为0的投递记录
    pub fn new(
        transaction_id: Uuid,
        webhook_endpoint_id: Uuid,
        event: WebhookEvent,
        payload: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            webhook_endpoint_id,
            event: event.as_str().to_string(),
            payload,
            status: WebhookDeliveryStatus::Pending,
            attempts: 0,
            last_attempt_at: None,
            next_retry_at: Some(now),
            response_status: None,
            response_body: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 是否已经成功
    pub fn is_succeeded(&self) -> bool {
        self.status == WebhookDeliveryStatus::Success
    }
}

/// 发往商户的通知负载
///
/// 字段名使用 camelCase，金额以字符串表示以免丢失精度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    pub transaction_id: Uuid,
    pub user_id: Uuid,
    pub status: TransactionStatus,
    pub amount: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// ISO-8601，毫秒精度，UTC
    pub timestamp: String,
}

impl WebhookPayload {
    /// 根据交易构建负载
    ///
    /// # 参数
    ///
    /// * `event` - 事件
    /// * `transaction` - 交易
    /// * `captured_at` - 负载生成时间
    pub fn from_transaction(
        event: WebhookEvent,
        transaction: &Transaction,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event,
            transaction_id: transaction.id,
            user_id: transaction.user_id,
            status: transaction.status,
            amount: transaction.amount.to_string(),
            transaction_type: transaction.transaction_type,
            timestamp: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// 一次投递尝试的结果
///
/// 作为一个整体写回投递记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// 结果状态，只会是 `Success` 或 `Failed`
    pub status: WebhookDeliveryStatus,
    /// 本次尝试之后的尝试次数
    pub attempts: i32,
    /// 尝试时间
    pub attempted_at: DateTime<Utc>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub response_status: Option<i32>,
    pub response_body: Option<String>,
    pub error_message: Option<String>,
}

impl DeliveryOutcome {
    /// 投递成功
    pub fn success(
        attempts: i32,
        attempted_at: DateTime<Utc>,
        response_status: i32,
        response_body: String,
    ) -> Self {
        Self {
            status: WebhookDeliveryStatus::Success,
            attempts,
            attempted_at,
            next_retry_at: None,
            response_status: Some(response_status),
            response_body: Some(response_body),
            error_message: None,
        }
    }

    /// 收到了非2xx响应
    pub fn http_failure(
        attempts: i32,
        attempted_at: DateTime<Utc>,
        next_retry_at: DateTime<Utc>,
        response_status: i32,
        response_body: String,
        error_message: String,
    ) -> Self {
        Self {
            status: WebhookDeliveryStatus::Failed,
            attempts,
            attempted_at,
            next_retry_at: Some(next_retry_at),
            response_status: Some(response_status),
            response_body: Some(response_body),
            error_message: Some(error_message),
        }
    }

    /// 没有拿到任何响应
    pub fn transport_failure(
        attempts: i32,
        attempted_at: DateTime<Utc>,
        next_retry_at: DateTime<Utc>,
        error_message: String,
    ) -> Self {
        Self {
            status: WebhookDeliveryStatus::Failed,
            attempts,
            attempted_at,
            next_retry_at: Some(next_retry_at),
            response_status: None,
            response_body: None,
            error_message: Some(error_message),
        }
    }
}
