// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 投递引擎的核心逻辑，从叶子到根：
/// - 签名（webhook_signer）：对负载计算 HMAC-SHA256
/// - 传输（webhook_transport）：出站HTTP的抽象，便于替换
/// - 分发器（webhook_dispatcher）：对一条投递记录执行一次真实投递
/// - 扇出（webhook_fanout）：交易状态变化时为每个启用端点创建投递
/// - 重试清扫（retry_sweeper）：重新驱动到期的失败投递
pub mod retry_sweeper;
pub mod webhook_dispatcher;
pub mod webhook_fanout;
pub mod webhook_signer;
pub mod webhook_transport;
