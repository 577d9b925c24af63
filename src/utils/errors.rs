// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// 记录未找到
    #[error("Record not found")]
    NotFound,

    /// 存储的数据无法映射为领域模型
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// 出站HTTP传输错误
///
/// 表示没有拿到任何HTTP响应的失败（超时、连接失败等）。
/// 拿到响应但状态码非2xx不属于传输错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 请求超时
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 连接失败（DNS、拒绝连接等）
    #[error("connection failed: {0}")]
    Connect(String),

    /// 其他请求错误
    #[error("request failed: {0}")]
    Request(String),
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 校验失败
    #[error("Validation error: {0}")]
    Validation(String),

    /// 资源不存在或不属于调用方
    #[error("Not found")]
    NotFound,

    /// 仓库错误
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("内部错误: {0}")]
    InternalError(String),
}
