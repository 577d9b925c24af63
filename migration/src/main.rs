// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// payrelay 迁移命令行
///
/// 管理 `transactions`、`webhook_endpoints`、`webhook_deliveries` 三张表，
/// 连接串读取 `DATABASE_URL`，例如 `DATABASE_URL=... cargo run -p migration -- up`
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
