// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供扇出到投递工作器之间的分发队列
pub mod dispatch_queue;
