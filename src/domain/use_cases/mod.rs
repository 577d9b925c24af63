// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域用例模块
///
/// 每个用例代表一个完整的业务流程，均以调用方用户ID限定范围：
/// - 端点管理（manage_webhook_endpoints）：注册、列出、更新、删除Webhook端点
/// - 投递历史（delivery_history）：分页查询投递记录和查看单条记录
pub mod delivery_history;
pub mod manage_webhook_endpoints;
