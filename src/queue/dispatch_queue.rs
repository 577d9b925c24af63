// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// 接收端已关闭
    #[error("Dispatch queue closed")]
    Closed,
}

/// 分发队列特质
///
/// 入队不得阻塞调用方
#[async_trait]
pub trait DispatchQueue: Send + Sync {
    /// 投递ID入队
    async fn enqueue(&self, delivery_id: Uuid) -> Result<(), QueueError>;
}

/// 分发队列的接收端，由投递工作器持有
pub type DispatchReceiver = mpsc::UnboundedReceiver<Uuid>;

/// 基于进程内通道的分发队列
#[derive(Clone)]
pub struct ChannelDispatchQueue {
    sender: mpsc::UnboundedSender<Uuid>,
}

impl ChannelDispatchQueue {
    /// 创建新的通道队列
    ///
    /// # 返回值
    ///
    /// 队列本身和交给投递工作器的接收端
    pub fn new() -> (Self, DispatchReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl DispatchQueue for ChannelDispatchQueue {
    async fn enqueue(&self, delivery_id: Uuid) -> Result<(), QueueError> {
        self.sender
            .send(delivery_id)
            .map_err(|_| QueueError::Closed)
    }
}
