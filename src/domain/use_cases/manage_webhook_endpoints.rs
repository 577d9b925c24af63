// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::WebhookEndpoint;
use crate::domain::repositories::webhook_endpoint_repository::WebhookEndpointRepository;
use crate::utils::clock::Clock;
use crate::utils::errors::DomainError;
use rand::Rng;
use std::sync::Arc;
use tracing::info;
use url::Url;
use uuid::Uuid;

/// 端点更新请求，未提供的字段保持不变
#[derive(Debug, Default, Clone)]
pub struct UpdateWebhookEndpoint {
    pub url: Option<String>,
    pub is_active: Option<bool>,
}

/// Webhook端点管理用例
pub struct WebhookEndpointUseCase {
    repo: Arc<dyn WebhookEndpointRepository>,
    clock: Arc<dyn Clock>,
}

impl WebhookEndpointUseCase {
    pub fn new(repo: Arc<dyn WebhookEndpointRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// 注册新端点
    ///
    /// # 参数
    ///
    /// * `user_id` - 所属用户ID
    /// * `url` - 回调URL，必须是绝对的 http(s) 地址
    ///
    /// # 返回值
    ///
    /// * `Ok(WebhookEndpoint)` - 新端点，包含生成的密钥
    /// * `Err(DomainError)` - URL无效或存储失败
    pub async fn register(&self, user_id: Uuid, url: &str) -> Result<WebhookEndpoint, DomainError> {
        let url = validate_url(url)?;
        let endpoint = WebhookEndpoint::new(user_id, url, generate_secret(), self.clock.now());
        let created = self.repo.create(&endpoint).await?;
        info!(endpoint_id = %created.id, %user_id, "Webhook endpoint registered");
        Ok(created)
    }

    /// 列出用户的全部端点，新的在前
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<WebhookEndpoint>, DomainError> {
        Ok(self.repo.find_by_user(user_id).await?)
    }

    /// 更新端点的URL或启用标记
    ///
    /// # 参数
    ///
    /// * `user_id` - 调用方用户ID
    /// * `endpoint_id` - 端点ID
    /// * `changes` - 要修改的字段
    ///
    /// # 返回值
    ///
    /// * `Ok(WebhookEndpoint)` - 更新后的端点，密钥不变
    /// * `Err(DomainError::NotFound)` - 端点不存在或不属于该用户
    pub async fn update(
        &self,
        user_id: Uuid,
        endpoint_id: Uuid,
        changes: UpdateWebhookEndpoint,
    ) -> Result<WebhookEndpoint, DomainError> {
        let mut endpoint = self.find_owned(user_id, endpoint_id).await?;

        if let Some(url) = changes.url {
            endpoint.url = validate_url(&url)?;
        }
        if let Some(is_active) = changes.is_active {
            endpoint.is_active = is_active;
        }
        endpoint.updated_at = self.clock.now();

        let updated = self.repo.update(&endpoint).await?;
        info!(
            %endpoint_id,
            is_active = updated.is_active,
            "Webhook endpoint updated"
        );
        Ok(updated)
    }

    /// 删除端点
    ///
    /// 物理删除，已有的投递记录保留端点ID
    pub async fn delete(&self, user_id: Uuid, endpoint_id: Uuid) -> Result<(), DomainError> {
        self.find_owned(user_id, endpoint_id).await?;
        if !self.repo.delete(endpoint_id).await? {
            return Err(DomainError::NotFound);
        }
        info!(%endpoint_id, %user_id, "Webhook endpoint deleted");
        Ok(())
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        endpoint_id: Uuid,
    ) -> Result<WebhookEndpoint, DomainError> {
        match self.repo.find_by_id(endpoint_id).await? {
            Some(endpoint) if endpoint.user_id == user_id => Ok(endpoint),
            _ => Err(DomainError::NotFound),
        }
    }
}

/// 校验回调URL
fn validate_url(raw: &str) -> Result<String, DomainError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| DomainError::Validation(format!("invalid webhook url: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DomainError::Validation(format!(
            "unsupported webhook url scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(DomainError::Validation(
            "webhook url must include a host".to_string(),
        ));
    }

    Ok(parsed.to_string())
}

/// 生成32字节随机密钥，十六进制编码
fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}
