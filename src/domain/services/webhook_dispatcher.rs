// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::DeliveryOutcome;
use crate::domain::repositories::webhook_delivery_repository::WebhookDeliveryRepository;
use crate::domain::repositories::webhook_endpoint_repository::WebhookEndpointRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::webhook_signer;
use crate::domain::services::webhook_transport::{WebhookRequest, WebhookTransport};
use crate::utils::clock::Clock;
use crate::utils::errors::TransportError;
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::text::{truncate_chars, MAX_ERROR_MESSAGE_CHARS, MAX_RESPONSE_BODY_CHARS};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 跳过投递的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 投递记录不存在
    DeliveryNotFound,
    /// 端点已被删除
    EndpointNotFound,
    /// 端点已停用
    EndpointInactive,
    /// 记录已成功
    AlreadySucceeded,
    /// 已达到最大尝试次数
    AttemptsExhausted,
    /// 结果写回时发现记录已被其他尝试推进
    Superseded,
}

/// 单次分发的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 对端返回2xx
    Delivered,
    /// 失败并已排期，`exhausted` 表示不会再重试
    Failed { exhausted: bool },
    /// 未发起请求，或结果未被写入
    Skipped(SkipReason),
}

/// Webhook分发器
///
/// 对一条投递记录执行一次真实投递：签名、发送、分类响应、原子写回结果。
/// 投递失败只体现在记录上，只有存储层错误会返回给调用方。
#[derive(Clone)]
pub struct WebhookDispatcher {
    deliveries: Arc<dyn WebhookDeliveryRepository>,
    endpoints: Arc<dyn WebhookEndpointRepository>,
    transport: Arc<dyn WebhookTransport>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
}

impl WebhookDispatcher {
    /// 创建新的分发器
    ///
    /// # 参数
    ///
    /// * `deliveries` - 投递仓库
    /// * `endpoints` - 端点仓库
    /// * `transport` - 出站传输
    /// * `clock` - 时钟
    pub fn new(
        deliveries: Arc<dyn WebhookDeliveryRepository>,
        endpoints: Arc<dyn WebhookEndpointRepository>,
        transport: Arc<dyn WebhookTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            deliveries,
            endpoints,
            transport,
            clock,
            policy: RetryPolicy::default(),
        }
    }

    /// 当前使用的重试策略
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// 对一条投递记录执行一次投递
    ///
    /// # 参数
    ///
    /// * `delivery_id` - 投递记录ID
    ///
    /// # 返回值
    ///
    /// * `Ok(DispatchOutcome)` - 本次调用的结果
    /// * `Err(RepositoryError)` - 读写存储失败
    pub async fn dispatch(&self, delivery_id: Uuid) -> Result<DispatchOutcome, RepositoryError> {
        let Some(delivery) = self.deliveries.find_by_id(delivery_id).await? else {
            debug!(%delivery_id, "Delivery not found, nothing to dispatch");
            return Ok(DispatchOutcome::Skipped(SkipReason::DeliveryNotFound));
        };

        if delivery.is_succeeded() {
            debug!(%delivery_id, "Delivery already succeeded");
            return Ok(DispatchOutcome::Skipped(SkipReason::AlreadySucceeded));
        }

        if !self.policy.should_retry(delivery.attempts) {
            debug!(%delivery_id, attempts = delivery.attempts, "Delivery attempts exhausted");
            return Ok(DispatchOutcome::Skipped(SkipReason::AttemptsExhausted));
        }

        // Always re-read the endpoint, its active flag can change at any time
        let Some(endpoint) = self.endpoints.find_by_id(delivery.webhook_endpoint_id).await? else {
            debug!(
                %delivery_id,
                endpoint_id = %delivery.webhook_endpoint_id,
                "Endpoint no longer exists"
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::EndpointNotFound));
        };

        if !endpoint.is_active {
            debug!(%delivery_id, endpoint_id = %endpoint.id, "Endpoint is inactive");
            return Ok(DispatchOutcome::Skipped(SkipReason::EndpointInactive));
        }

        let request = WebhookRequest {
            delivery_id: delivery.id,
            url: endpoint.url.clone(),
            event: delivery.event.clone(),
            signature: webhook_signer::sign(delivery.payload.as_bytes(), &endpoint.secret),
            payload: delivery.payload.clone(),
        };

        info!(%delivery_id, url = %endpoint.url, event = %delivery.event, "Delivering webhook");
        counter!("webhook_delivery_attempts_total").increment(1);

        let start = Instant::now();
        let result = self.transport.send(&request).await;
        histogram!("webhook_delivery_duration_seconds").record(start.elapsed().as_secs_f64());

        let attempted_at = self.clock.now();
        let attempts = delivery.attempts + 1;
        let next_retry_at = self.policy.next_retry_time(attempts, attempted_at);

        let (outcome, failure_reason) = match result {
            Ok(response) if response.is_success() => (
                DeliveryOutcome::success(
                    attempts,
                    attempted_at,
                    i32::from(response.status),
                    truncate_chars(&response.body, MAX_RESPONSE_BODY_CHARS),
                ),
                None,
            ),
            Ok(response) => {
                let summary = format!(
                    "HTTP {}: {}",
                    response.status,
                    response.reason.as_deref().unwrap_or_default()
                );
                (
                    DeliveryOutcome::http_failure(
                        attempts,
                        attempted_at,
                        next_retry_at,
                        i32::from(response.status),
                        truncate_chars(&response.body, MAX_RESPONSE_BODY_CHARS),
                        truncate_chars(summary.trim_end(), MAX_ERROR_MESSAGE_CHARS),
                    ),
                    Some("http_error"),
                )
            }
            Err(err) => {
                let reason = match err {
                    TransportError::Timeout(_) => "timeout",
                    TransportError::Connect(_) | TransportError::Request(_) => "network_error",
                };
                (
                    DeliveryOutcome::transport_failure(
                        attempts,
                        attempted_at,
                        next_retry_at,
                        truncate_chars(&err.to_string(), MAX_ERROR_MESSAGE_CHARS),
                    ),
                    Some(reason),
                )
            }
        };

        if !self.deliveries.record_outcome(delivery.id, &outcome).await? {
            warn!(%delivery_id, attempts, "Delivery was advanced concurrently, outcome dropped");
            return Ok(DispatchOutcome::Skipped(SkipReason::Superseded));
        }

        match failure_reason {
            None => {
                info!(%delivery_id, status = ?outcome.response_status, "Webhook delivered");
                counter!("webhook_delivery_success_total").increment(1);
                Ok(DispatchOutcome::Delivered)
            }
            Some(reason) => {
                counter!("webhook_delivery_failed_total", "reason" => reason).increment(1);
                let exhausted = !self.policy.should_retry(attempts);
                if exhausted {
                    warn!(
                        %delivery_id,
                        attempts,
                        error = ?outcome.error_message,
                        "Webhook delivery exhausted all attempts"
                    );
                    counter!("webhook_delivery_exhausted_total").increment(1);
                } else {
                    warn!(
                        %delivery_id,
                        attempts,
                        error = ?outcome.error_message,
                        next_retry_at = %next_retry_at,
                        "Webhook delivery failed, scheduled for retry"
                    );
                }
                Ok(DispatchOutcome::Failed { exhausted })
            }
        }
    }
}

#[cfg(test)]
#[path = "webhook_dispatcher_test.rs"]
mod tests;
