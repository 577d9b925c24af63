// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::webhook::WebhookEndpoint;
use async_trait::async_trait;
use uuid::Uuid;

/// Webhook端点仓库特质
///
/// 定义Webhook端点数据访问接口
#[async_trait]
pub trait WebhookEndpointRepository: Send + Sync {
    /// 创建端点
    async fn create(&self, endpoint: &WebhookEndpoint) -> Result<WebhookEndpoint, RepositoryError>;
    /// 根据ID查找端点，每次都从存储读取
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WebhookEndpoint>, RepositoryError>;
    /// 查找用户的全部端点，按创建时间倒序
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<WebhookEndpoint>, RepositoryError>;
    /// 查找用户当前启用的端点
    async fn find_active_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WebhookEndpoint>, RepositoryError>;
    /// 更新端点的URL与启用标记，密钥不会被写入
    async fn update(&self, endpoint: &WebhookEndpoint) -> Result<WebhookEndpoint, RepositoryError>;
    /// 物理删除端点，返回是否删除了记录
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}
