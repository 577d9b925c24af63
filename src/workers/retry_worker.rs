// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::retry_sweeper::RetrySweeper;
use crate::utils::errors::WorkerError;
use crate::workers::manager::ShutdownSignal;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// 重试工作器
///
/// 按固定间隔驱动重试清扫。上一次清扫结束前不会开始下一次，
/// 收到关闭信号后在两轮清扫之间退出。
pub struct RetryWorker {
    sweeper: Arc<RetrySweeper>,
    interval: Duration,
    shutdown: ShutdownSignal,
}

impl RetryWorker {
    pub fn new(sweeper: Arc<RetrySweeper>, interval: Duration, shutdown: ShutdownSignal) -> Self {
        Self {
            sweeper,
            interval,
            shutdown,
        }
    }
}

#[async_trait]
impl Worker for RetryWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!(interval_secs = self.interval.as_secs(), "Retry worker started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut shutdown = self.shutdown.clone();
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    // Runs to completion, the signal is only checked between sweeps
                    if let Err(e) = self.sweeper.sweep().await {
                        error!("Retry sweep failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Retry worker stopped");
        Ok(())
    }

    fn name(&self) -> &str {
        "retry_worker"
    }
}
