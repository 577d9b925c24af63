// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::WebhookSettings;
use crate::domain::services::webhook_transport::{
    WebhookRequest, WebhookResponse, WebhookTransport,
};
use crate::utils::errors::TransportError;
use crate::utils::text::MAX_RESPONSE_BODY_CHARS;
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::debug;

/// 签名请求头
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";
/// 事件名请求头
pub const EVENT_HEADER: &str = "X-Webhook-Event";
/// 投递ID请求头
pub const DELIVERY_HEADER: &str = "X-Webhook-Delivery";

// A UTF-8 char is at most 4 bytes, enough for the stored prefix
const MAX_BODY_BYTES: usize = MAX_RESPONSE_BODY_CHARS * 4;

/// 基于reqwest的Webhook传输实现
///
/// 持有一个共享的HTTP客户端，生命周期由进程启动/关闭管理
#[derive(Clone)]
pub struct ReqwestWebhookTransport {
    /// HTTP 客户端
    client: Client,
}

impl ReqwestWebhookTransport {
    /// 创建新的传输实现
    ///
    /// # 参数
    ///
    /// * `settings` - Webhook配置，提供超时与User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestWebhookTransport)` - 创建成功
    /// * `Err(reqwest::Error)` - 客户端构建失败
    pub fn new(settings: &WebhookSettings) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            Duration::from_secs(settings.request_timeout_secs),
            &settings.user_agent,
        )
    }

    /// 使用指定的超时创建
    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

/// 读取响应体，最多 `limit` 字节
///
/// 状态行已经收到，读取响应体时出错（连接中断、超时）只会得到截至出错时的内容，
/// 不会把这次投递变成没有响应的传输失败
async fn read_capped_body(mut response: reqwest::Response, limit: usize) -> String {
    let mut buf: Vec<u8> = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = limit - buf.len();
                buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
                if buf.len() >= limit {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!(status = %response.status(), "Response body read aborted: {}", e);
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[async_trait]
impl WebhookTransport for ReqwestWebhookTransport {
    async fn send(&self, request: &WebhookRequest) -> Result<WebhookResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, &request.signature)
            .header(EVENT_HEADER, &request.event)
            .header(DELIVERY_HEADER, request.delivery_id.to_string())
            // Stored bytes, unchanged, so the signature matches what the receiver sees
            .body(request.payload.clone())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = read_capped_body(response, MAX_BODY_BYTES).await;

        Ok(WebhookResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}
