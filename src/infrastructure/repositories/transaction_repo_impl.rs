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

use crate::domain::models::transaction::{Transaction, TransactionStatus};
use crate::domain::models::webhook::WebhookEndpoint;
use crate::domain::repositories::transaction_repository::TransactionRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::sea_orm_active_enums::SeaTransactionStatus;
use crate::infrastructure::database::entities::{
    transaction as transaction_entity, webhook_endpoint as endpoint_entity,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// 交易仓库实现
///
/// 基于SeaORM实现的交易数据访问层
#[derive(Clone)]
pub struct TransactionRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TransactionRepositoryImpl {
    /// 创建新的交易仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<transaction_entity::Model> for Transaction {
    type Error = RepositoryError;

    fn try_from(model: transaction_entity::Model) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&model.amount).map_err(|e| {
            RepositoryError::InvalidData(format!(
                "transaction {} amount '{}': {}",
                model.id, model.amount, e
            ))
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            amount,
            transaction_type: model.transaction_type.into(),
            status: model.status.into(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl TransactionRepository for TransactionRepositoryImpl {
    async fn create(&self, transaction: &Transaction) -> Result<Transaction, RepositoryError> {
        let active_model = transaction_entity::ActiveModel {
            id: Set(transaction.id),
            user_id: Set(transaction.user_id),
            amount: Set(transaction.amount.to_string()),
            transaction_type: Set(transaction.transaction_type.into()),
            status: Set(transaction.status.into()),
            created_at: Set(transaction.created_at),
            updated_at: Set(transaction.updated_at),
        };

        transaction_entity::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(transaction.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, RepositoryError> {
        transaction_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Transaction::try_from)
            .transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<Transaction, RepositoryError> {
        let mut active = transaction_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into_active_model();

        active.status = Set(SeaTransactionStatus::from(status));
        active.updated_at = Set(now);

        let updated = active.update(self.db.as_ref()).await?;
        Transaction::try_from(updated)
    }

    async fn find_with_active_endpoints(
        &self,
        id: Uuid,
    ) -> Result<Option<(Transaction, Vec<WebhookEndpoint>)>, RepositoryError> {
        let Some(transaction) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let endpoints = endpoint_entity::Entity::find()
            .filter(endpoint_entity::Column::UserId.eq(transaction.user_id))
            .filter(endpoint_entity::Column::IsActive.eq(true))
            .order_by_asc(endpoint_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(Some((transaction, endpoints)))
    }
}
