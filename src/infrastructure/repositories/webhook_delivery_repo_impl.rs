// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::webhook::{DeliveryOutcome, WebhookDelivery};
use crate::domain::repositories::webhook_delivery_repository::{
    DeliveryQueryParams, WebhookDeliveryRepository,
};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::sea_orm_active_enums::SeaDeliveryStatus;
use crate::infrastructure::database::entities::{
    transaction as transaction_entity, webhook_delivery, webhook_endpoint,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// Webhook投递仓库实现
#[derive(Clone)]
pub struct WebhookDeliveryRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl WebhookDeliveryRepoImpl {
    /// 创建新的Webhook投递仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 单条记录的条件状态迁移
    async fn transition(
        &self,
        id: Uuid,
        from: SeaDeliveryStatus,
        to: SeaDeliveryStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = webhook_delivery::Entity::update_many()
            .col_expr(webhook_delivery::Column::Status, Expr::value(to))
            .col_expr(webhook_delivery::Column::UpdatedAt, Expr::value(now))
            .filter(webhook_delivery::Column::Id.eq(id))
            .filter(webhook_delivery::Column::Status.eq(from))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected == 1)
    }
}

impl From<webhook_delivery::Model> for WebhookDelivery {
    fn from(model: webhook_delivery::Model) -> Self {
        Self {
            id: model.id,
            transaction_id: model.transaction_id,
            webhook_endpoint_id: model.webhook_endpoint_id,
            event: model.event,
            payload: model.payload,
            status: model.status.into(),
            attempts: model.attempts,
            last_attempt_at: model.last_attempt_at,
            next_retry_at: model.next_retry_at,
            response_status: model.response_status,
            response_body: model.response_body,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&WebhookDelivery> for webhook_delivery::ActiveModel {
    fn from(delivery: &WebhookDelivery) -> Self {
        Self {
            id: Set(delivery.id),
            transaction_id: Set(delivery.transaction_id),
            webhook_endpoint_id: Set(delivery.webhook_endpoint_id),
            event: Set(delivery.event.clone()),
            payload: Set(delivery.payload.clone()),
            status: Set(delivery.status.into()),
            attempts: Set(delivery.attempts),
            last_attempt_at: Set(delivery.last_attempt_at),
            next_retry_at: Set(delivery.next_retry_at),
            response_status: Set(delivery.response_status),
            response_body: Set(delivery.response_body.clone()),
            error_message: Set(delivery.error_message.clone()),
            created_at: Set(delivery.created_at),
            updated_at: Set(delivery.updated_at),
        }
    }
}

#[async_trait]
impl WebhookDeliveryRepository for WebhookDeliveryRepoImpl {
    async fn create(&self, delivery: &WebhookDelivery) -> Result<WebhookDelivery, RepositoryError> {
        webhook_delivery::Entity::insert(webhook_delivery::ActiveModel::from(delivery))
            .exec(self.db.as_ref())
            .await?;

        Ok(delivery.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WebhookDelivery>, RepositoryError> {
        let model = webhook_delivery::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn record_outcome(
        &self,
        id: Uuid,
        outcome: &DeliveryOutcome,
    ) -> Result<bool, RepositoryError> {
        let result = webhook_delivery::Entity::update_many()
            .col_expr(
                webhook_delivery::Column::Status,
                Expr::value(SeaDeliveryStatus::from(outcome.status)),
            )
            .col_expr(
                webhook_delivery::Column::Attempts,
                Expr::value(outcome.attempts),
            )
            .col_expr(
                webhook_delivery::Column::LastAttemptAt,
                Expr::value(Some(outcome.attempted_at)),
            )
            .col_expr(
                webhook_delivery::Column::NextRetryAt,
                Expr::value(outcome.next_retry_at),
            )
            .col_expr(
                webhook_delivery::Column::ResponseStatus,
                Expr::value(outcome.response_status),
            )
            .col_expr(
                webhook_delivery::Column::ResponseBody,
                Expr::value(outcome.response_body.clone()),
            )
            .col_expr(
                webhook_delivery::Column::ErrorMessage,
                Expr::value(outcome.error_message.clone()),
            )
            .col_expr(
                webhook_delivery::Column::UpdatedAt,
                Expr::value(outcome.attempted_at),
            )
            .filter(webhook_delivery::Column::Id.eq(id))
            .filter(webhook_delivery::Column::Status.ne(SeaDeliveryStatus::Success))
            .filter(webhook_delivery::Column::Attempts.eq(outcome.attempts - 1))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn claim_for_retry(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        self.transition(id, SeaDeliveryStatus::Failed, SeaDeliveryStatus::Retrying, now)
            .await
    }

    async fn release_claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, RepositoryError> {
        self.transition(id, SeaDeliveryStatus::Retrying, SeaDeliveryStatus::Failed, now)
            .await
    }

    async fn find_due_for_retry(
        &self,
        now: DateTime<Utc>,
        max_attempts: i32,
        limit: u64,
    ) -> Result<Vec<WebhookDelivery>, RepositoryError> {
        let models = webhook_delivery::Entity::find()
            .inner_join(webhook_endpoint::Entity)
            .filter(webhook_delivery::Column::Status.eq(SeaDeliveryStatus::Failed))
            .filter(webhook_delivery::Column::NextRetryAt.lte(now))
            .filter(webhook_delivery::Column::Attempts.lt(max_attempts))
            .filter(webhook_endpoint::Column::IsActive.eq(true))
            .order_by_asc(webhook_delivery::Column::NextRetryAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn requeue_stalled(
        &self,
        older_than: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = webhook_delivery::Entity::update_many()
            .col_expr(
                webhook_delivery::Column::Status,
                Expr::value(SeaDeliveryStatus::Failed),
            )
            .col_expr(webhook_delivery::Column::UpdatedAt, Expr::value(now))
            .filter(
                Condition::any()
                    .add(webhook_delivery::Column::Status.eq(SeaDeliveryStatus::Retrying))
                    .add(
                        Condition::all()
                            .add(webhook_delivery::Column::Status.eq(SeaDeliveryStatus::Pending))
                            .add(webhook_delivery::Column::Attempts.eq(0)),
                    ),
            )
            .filter(webhook_delivery::Column::UpdatedAt.lt(older_than))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn query(
        &self,
        params: DeliveryQueryParams,
    ) -> Result<(Vec<WebhookDelivery>, u64), RepositoryError> {
        let mut select = webhook_delivery::Entity::find()
            .inner_join(transaction_entity::Entity)
            .filter(transaction_entity::Column::UserId.eq(params.user_id));

        if let Some(endpoint_id) = params.endpoint_id {
            select = select.filter(webhook_delivery::Column::WebhookEndpointId.eq(endpoint_id));
        }

        if let Some(status) = params.status {
            select = select.filter(webhook_delivery::Column::Status.eq(SeaDeliveryStatus::from(status)));
        }

        let total = select.clone().count(self.db.as_ref()).await?;

        let models = select
            .order_by_desc(webhook_delivery::Column::CreatedAt)
            .offset(params.offset)
            .limit(params.limit)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}
