// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台投递与重试清扫的工作器，以及工作器生命周期管理
pub mod delivery_worker;
pub mod manager;
pub mod retry_worker;
pub mod worker;

pub use worker::Worker;
