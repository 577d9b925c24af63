// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::TransportError;
use async_trait::async_trait;
use uuid::Uuid;

/// 一次出站Webhook请求
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    /// 投递ID，放入 `X-Webhook-Delivery` 请求头
    pub delivery_id: Uuid,
    /// 目标URL
    pub url: String,
    /// 事件名，放入 `X-Webhook-Event` 请求头
    pub event: String,
    /// 原样发送的JSON负载
    pub payload: String,
    /// 负载签名，放入 `X-Webhook-Signature` 请求头
    pub signature: String,
}

/// 对端返回的响应，任何状态码都算“拿到了响应”
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    /// 状态码的标准描述，如 "Service Unavailable"
    pub reason: Option<String>,
    pub body: String,
}

impl WebhookResponse {
    /// 是否为2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Webhook传输特质
///
/// 定义Webhook发送的出站通道，由进程启动时注入
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// 发送一次请求
    ///
    /// # 参数
    ///
    /// * `request` - 出站请求
    ///
    /// # 返回值
    ///
    /// * `Ok(WebhookResponse)` - 拿到了响应（不论状态码）
    /// * `Err(TransportError)` - 没有拿到响应
    async fn send(&self, request: &WebhookRequest) -> Result<WebhookResponse, TransportError>;
}
