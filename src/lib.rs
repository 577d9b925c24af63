// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 交易状态变化与Webhook投递引擎之间的衔接
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、投递引擎服务和仓库接口
pub mod domain;

/// 基础设施模块
///
/// 数据库、出站HTTP和指标导出等外部集成
pub mod infrastructure;

/// 队列模块
///
/// 扇出与投递工作器之间的分发队列
pub mod queue;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现后台投递、重试清扫和工作器管理
pub mod workers;
