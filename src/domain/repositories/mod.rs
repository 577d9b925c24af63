// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 交易仓库（transaction_repository）：读取交易及其所属用户的启用端点
/// - Webhook端点仓库（webhook_endpoint_repository）：管理端点配置
/// - Webhook投递仓库（webhook_delivery_repository）：投递记录的创建、认领与结果写回
pub mod transaction_repository;
pub mod webhook_delivery_repository;
pub mod webhook_endpoint_repository;

pub use crate::utils::errors::RepositoryError;
