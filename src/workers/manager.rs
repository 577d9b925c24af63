// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::workers::worker::Worker;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 关闭信号的接收端，值变为 `true` 表示应停止
pub type ShutdownSignal = watch::Receiver<bool>;

/// 工作管理器
///
/// 负责后台工作器的启动与关闭
pub struct WorkerManager {
    workers: Vec<Arc<dyn Worker>>,
    handles: Vec<(String, JoinHandle<()>)>,
    shutdown_tx: watch::Sender<bool>,
}

impl Default for WorkerManager {
    fn default() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            workers: Vec::new(),
            handles: Vec::new(),
            shutdown_tx,
        }
    }
}

impl WorkerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅关闭信号
    ///
    /// 周期性工作器在两轮之间检查它，已经开始的一轮会完整执行
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown_tx.subscribe()
    }

    /// 注册一个工作器，调用 `start_workers` 后才会运行
    pub fn register(&mut self, worker: Arc<dyn Worker>) {
        self.workers.push(worker);
    }

    pub fn start_workers(&mut self) {
        for worker in self.workers.drain(..) {
            let name = worker.name().to_string();
            let task_name = name.clone();
            let handle = tokio::spawn(async move {
                match worker.run().await {
                    Ok(()) => info!(worker = %task_name, "Worker finished"),
                    Err(e) => error!(worker = %task_name, "Worker failed: {}", e),
                }
            });
            self.handles.push((name, handle));
        }
        info!(count = self.handles.len(), "Workers started");
    }

    /// 优雅关闭
    ///
    /// 发出关闭信号，然后在 `grace` 内等待各工作器自行退出，
    /// 进行中的投递因此能写回结果。超时仍未退出的工作器会被中止。
    ///
    /// # 参数
    ///
    /// * `grace` - 最长等待时间
    ///
    /// # 返回值
    ///
    /// 被强制中止的工作器数量
    pub async fn shutdown(&mut self, grace: Duration) -> usize {
        info!(grace_secs = grace.as_secs_f64(), "Shutting down workers...");
        self.shutdown_tx.send_replace(true);

        let deadline = tokio::time::Instant::now() + grace;
        let mut aborted = 0;
        for (name, mut handle) in self.handles.drain(..) {
            if tokio::time::timeout_at(deadline, &mut handle).await.is_err() {
                warn!(worker = %name, "Worker did not stop in time, aborting");
                handle.abort();
                aborted += 1;
            }
        }

        info!(aborted, "Workers shut down");
        aborted
    }

    /// 等待 Ctrl-C
    pub async fn wait_for_signal(&self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    }
}
