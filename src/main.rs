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

use payrelay::application::use_cases::transaction_status::TransactionStatusService;
use payrelay::config::settings::Settings;
use payrelay::domain::services::retry_sweeper::RetrySweeper;
use payrelay::domain::services::webhook_dispatcher::WebhookDispatcher;
use payrelay::domain::services::webhook_fanout::WebhookFanout;
use payrelay::infrastructure::database::connection;
use payrelay::infrastructure::observability::metrics::init_metrics;
use payrelay::infrastructure::repositories::transaction_repo_impl::TransactionRepositoryImpl;
use payrelay::infrastructure::repositories::webhook_delivery_repo_impl::WebhookDeliveryRepoImpl;
use payrelay::infrastructure::repositories::webhook_endpoint_repo_impl::WebhookEndpointRepoImpl;
use payrelay::infrastructure::services::webhook_transport_impl::ReqwestWebhookTransport;
use payrelay::queue::dispatch_queue::ChannelDispatchQueue;
use payrelay::utils::clock::{Clock, SystemClock};
use payrelay::utils::telemetry;
use payrelay::workers::delivery_worker::DeliveryWorker;
use payrelay::workers::manager::WorkerManager;
use payrelay::workers::retry_worker::RetryWorker;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动后台工作器
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(settings.telemetry.json);
    info!("Starting payrelay...");
    init_metrics(&settings.metrics)?;

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");
    connection::run_migrations(db.as_ref()).await?;

    // 4. Initialize components
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let transaction_repo = Arc::new(TransactionRepositoryImpl::new(db.clone()));
    let endpoint_repo = Arc::new(WebhookEndpointRepoImpl::new(db.clone()));
    let delivery_repo = Arc::new(WebhookDeliveryRepoImpl::new(db.clone()));
    let transport = Arc::new(ReqwestWebhookTransport::new(&settings.webhook)?);

    let dispatcher = Arc::new(WebhookDispatcher::new(
        delivery_repo.clone(),
        endpoint_repo.clone(),
        transport,
        clock.clone(),
    ));

    let (queue, receiver) = ChannelDispatchQueue::new();
    let fanout = Arc::new(WebhookFanout::new(
        transaction_repo.clone(),
        delivery_repo.clone(),
        Arc::new(queue),
        clock.clone(),
    ));

    let sweeper = Arc::new(RetrySweeper::new(
        delivery_repo.clone(),
        dispatcher.clone(),
        clock.clone(),
        settings.webhook.retry_batch_size,
        chrono::Duration::seconds(settings.webhook.stall_timeout_secs),
    ));

    // Handed to the transaction-processing collaborator in an embedding host.
    // It holds the only queue sender, dropping it is what closes the dispatch queue.
    let status_service = TransactionStatusService::new(transaction_repo, fanout, clock);

    // 5. Start workers
    let mut worker_manager = WorkerManager::new();
    worker_manager.register(Arc::new(DeliveryWorker::new(
        dispatcher,
        receiver,
        settings.webhook.dispatch_concurrency,
    )));
    worker_manager.register(Arc::new(RetryWorker::new(
        sweeper,
        Duration::from_secs(settings.webhook.sweep_interval_secs),
        worker_manager.shutdown_signal(),
    )));
    worker_manager.start_workers();

    info!("payrelay is running, press Ctrl-C to stop");
    worker_manager.wait_for_signal().await;

    // 6. Graceful shutdown: close the queue so the delivery worker drains it,
    // then give in-flight attempts time to record their outcome
    drop(status_service);
    let grace = Duration::from_secs(settings.webhook.request_timeout_secs * 2);
    worker_manager.shutdown(grace).await;

    info!("payrelay stopped");
    Ok(())
}
