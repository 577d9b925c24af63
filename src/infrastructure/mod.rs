// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统交互。
///
/// 包含的子模块：
/// - 数据库（database）：数据库连接和实体映射
/// - 可观测性（observability）：Prometheus指标导出
/// - 仓库实现（repositories）：领域仓库接口的SeaORM实现
/// - 服务（services）：出站Webhook传输
///
/// 基础设施层依赖于领域层的抽象接口，而不是反过来。
pub mod database;
pub mod observability;
pub mod repositories;
pub mod services;
