// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 负责把交易状态变化与Webhook投递引擎衔接起来
pub mod use_cases;
