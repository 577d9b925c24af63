// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::WebhookEndpoint;
use crate::domain::repositories::webhook_endpoint_repository::WebhookEndpointRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::webhook_endpoint;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// Webhook端点仓库实现
#[derive(Clone)]
pub struct WebhookEndpointRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl WebhookEndpointRepoImpl {
    /// 创建新的Webhook端点仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<webhook_endpoint::Model> for WebhookEndpoint {
    fn from(model: webhook_endpoint::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            url: model.url,
            secret: model.secret,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl WebhookEndpointRepository for WebhookEndpointRepoImpl {
    async fn create(&self, endpoint: &WebhookEndpoint) -> Result<WebhookEndpoint, RepositoryError> {
        let model = webhook_endpoint::ActiveModel {
            id: Set(endpoint.id),
            user_id: Set(endpoint.user_id),
            url: Set(endpoint.url.clone()),
            secret: Set(endpoint.secret.clone()),
            is_active: Set(endpoint.is_active),
            created_at: Set(endpoint.created_at),
            updated_at: Set(endpoint.updated_at),
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WebhookEndpoint>, RepositoryError> {
        let model = webhook_endpoint::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<WebhookEndpoint>, RepositoryError> {
        let models = webhook_endpoint::Entity::find()
            .filter(webhook_endpoint::Column::UserId.eq(user_id))
            .order_by_desc(webhook_endpoint::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_active_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WebhookEndpoint>, RepositoryError> {
        let models = webhook_endpoint::Entity::find()
            .filter(webhook_endpoint::Column::UserId.eq(user_id))
            .filter(webhook_endpoint::Column::IsActive.eq(true))
            .order_by_asc(webhook_endpoint::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, endpoint: &WebhookEndpoint) -> Result<WebhookEndpoint, RepositoryError> {
        // Secret is deliberately left NotSet
        let active = webhook_endpoint::ActiveModel {
            id: Unchanged(endpoint.id),
            url: Set(endpoint.url.clone()),
            is_active: Set(endpoint.is_active),
            updated_at: Set(endpoint.updated_at),
            ..Default::default()
        };

        match active.update(self.db.as_ref()).await {
            Ok(model) => Ok(model.into()),
            Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = webhook_endpoint::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }
}
