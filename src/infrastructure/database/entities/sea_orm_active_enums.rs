// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::transaction::{TransactionStatus, TransactionType};
use crate::domain::models::webhook::WebhookDeliveryStatus;
use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SeaTransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl From<TransactionStatus> for SeaTransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pending => SeaTransactionStatus::Pending,
            TransactionStatus::Processing => SeaTransactionStatus::Processing,
            TransactionStatus::Completed => SeaTransactionStatus::Completed,
            TransactionStatus::Failed => SeaTransactionStatus::Failed,
        }
    }
}

impl From<SeaTransactionStatus> for TransactionStatus {
    fn from(status: SeaTransactionStatus) -> Self {
        match status {
            SeaTransactionStatus::Pending => TransactionStatus::Pending,
            SeaTransactionStatus::Processing => TransactionStatus::Processing,
            SeaTransactionStatus::Completed => TransactionStatus::Completed,
            SeaTransactionStatus::Failed => TransactionStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SeaTransactionType {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<TransactionType> for SeaTransactionType {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Deposit => SeaTransactionType::Deposit,
            TransactionType::Withdrawal => SeaTransactionType::Withdrawal,
        }
    }
}

impl From<SeaTransactionType> for TransactionType {
    fn from(kind: SeaTransactionType) -> Self {
        match kind {
            SeaTransactionType::Deposit => TransactionType::Deposit,
            SeaTransactionType::Withdrawal => TransactionType::Withdrawal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SeaDeliveryStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "retrying")]
    Retrying,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl From<WebhookDeliveryStatus> for SeaDeliveryStatus {
    fn from(status: WebhookDeliveryStatus) -> Self {
        match status {
            WebhookDeliveryStatus::Pending => SeaDeliveryStatus::Pending,
            WebhookDeliveryStatus::Retrying => SeaDeliveryStatus::Retrying,
            WebhookDeliveryStatus::Success => SeaDeliveryStatus::Success,
            WebhookDeliveryStatus::Failed => SeaDeliveryStatus::Failed,
        }
    }
}

impl From<SeaDeliveryStatus> for WebhookDeliveryStatus {
    fn from(status: SeaDeliveryStatus) -> Self {
        match status {
            SeaDeliveryStatus::Pending => WebhookDeliveryStatus::Pending,
            SeaDeliveryStatus::Retrying => WebhookDeliveryStatus::Retrying,
            SeaDeliveryStatus::Success => WebhookDeliveryStatus::Success,
            SeaDeliveryStatus::Failed => WebhookDeliveryStatus::Failed,
        }
    }
}
