// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 交易（transaction）：外部交易处理模块维护的支付记录
/// - Webhook（webhook）：端点、投递记录、事件名与通知负载
///
/// 这些模型构成了投递引擎的数据基础。
pub mod transaction;
pub mod webhook;
