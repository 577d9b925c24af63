// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::services::webhook_dispatcher::WebhookDispatcher;
use crate::queue::dispatch_queue::DispatchReceiver;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 投递工作器
///
/// 消费分发队列中的投递ID，以有界并发调用分发器。
/// 队列的发送端全部关闭后自然结束。
pub struct DeliveryWorker {
    dispatcher: Arc<WebhookDispatcher>,
    receiver: Mutex<Option<DispatchReceiver>>,
    concurrency: usize,
}

impl DeliveryWorker {
    /// 创建新的投递工作器
    ///
    /// # 参数
    ///
    /// * `dispatcher` - 分发器
    /// * `receiver` - 分发队列接收端
    /// * `concurrency` - 同时进行的投递数上限
    ///
    /// # 返回值
    ///
    /// 返回新的投递工作器实例
    pub fn new(
        dispatcher: Arc<WebhookDispatcher>,
        receiver: DispatchReceiver,
        concurrency: usize,
    ) -> Self {
        Self {
            dispatcher,
            receiver: Mutex::new(Some(receiver)),
            concurrency: concurrency.max(1),
        }
    }
}

#[async_trait]
impl Worker for DeliveryWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        let receiver = self.receiver.lock().take().ok_or_else(|| {
            WorkerError::InternalError("delivery worker is already running".to_string())
        })?;

        info!(concurrency = self.concurrency, "Delivery worker started");

        let dispatcher = &self.dispatcher;
        futures::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|id| (id, receiver))
        })
        .for_each_concurrent(self.concurrency, |delivery_id| async move {
            match dispatcher.dispatch(delivery_id).await {
                Ok(outcome) => debug!(%delivery_id, ?outcome, "Dispatch finished"),
                Err(e) => error!(%delivery_id, "Failed to dispatch webhook: {}", e),
            }
        })
        .await;

        info!("Dispatch queue closed, delivery worker stopped");
        Ok(())
    }

    fn name(&self) -> &str {
        "delivery_worker"
    }
}
