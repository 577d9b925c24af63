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

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_transactions;
mod m20250601_000002_create_webhook_endpoints;
mod m20250601_000003_create_webhook_deliveries;

/// 数据库迁移器
///
/// 按顺序建立交易、Webhook端点和投递记录三张表。
/// 投递记录与另外两张表之间不建外键，端点删除后历史仍然保留。
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_transactions::Migration),
            Box::new(m20250601_000002_create_webhook_endpoints::Migration),
            Box::new(m20250601_000003_create_webhook_deliveries::Migration),
        ]
    }
}
