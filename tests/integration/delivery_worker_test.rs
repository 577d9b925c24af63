// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, start_time, TestApp};
use chrono::Duration as ChronoDuration;
use payrelay::domain::models::transaction::TransactionStatus;
use payrelay::domain::models::webhook::WebhookDeliveryStatus;
use payrelay::domain::repositories::webhook_delivery_repository::WebhookDeliveryRepository;
use payrelay::utils::errors::WorkerError;
use payrelay::workers::delivery_worker::DeliveryWorker;
use payrelay::workers::manager::WorkerManager;
use payrelay::workers::retry_worker::RetryWorker;
use payrelay::workers::Worker;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_for_status(app: &TestApp, id: Uuid, status: WebhookDeliveryStatus) {
    for _ in 0..250 {
        if app.delivery(id).await.status == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("delivery {id} never reached {status}");
}

#[tokio::test]
async fn test_worker_dispatches_queued_deliveries() {
    let mut app = create_test_app().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let worker = Arc::new(DeliveryWorker::new(
        app.dispatcher.clone(),
        app.receiver.take().unwrap(),
        4,
    ));
    let handle = tokio::spawn({
        let worker = worker.clone();
        async move { worker.run().await }
    });

    let user_id = Uuid::new_v4();
    for i in 0..3 {
        app.seed_endpoint(user_id, &format!("{}/{}", server.uri(), i), true)
            .await;
    }
    let tx = app.seed_transaction(user_id, TransactionStatus::Processing).await;
    let ids = app
        .fanout
        .trigger_for_transaction(tx.id, TransactionStatus::Completed)
        .await
        .unwrap();
    assert_eq!(ids.len(), 3);

    for id in &ids {
        wait_for_status(&app, *id, WebhookDeliveryStatus::Success).await;
    }

    // The receiver can only be consumed once
    assert!(matches!(
        worker.run().await,
        Err(WorkerError::InternalError(_))
    ));

    // Dropping every producer closes the queue and ends the worker
    let TestApp {
        fanout,
        status_service,
        sweeper,
        ..
    } = app;
    drop((fanout, status_service, sweeper));
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_manager_runs_retry_worker() {
    let app = create_test_app().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let user_id = Uuid::new_v4();
    let endpoint = app.seed_endpoint(user_id, &server.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Completed).await;
    let delivery = app
        .seed_delivery(
            &tx,
            &endpoint,
            WebhookDeliveryStatus::Failed,
            1,
            start_time() - ChronoDuration::minutes(1),
        )
        .await;

    let mut manager = WorkerManager::new();
    manager.register(Arc::new(RetryWorker::new(
        app.sweeper.clone(),
        Duration::from_millis(50),
        manager.shutdown_signal(),
    )));
    manager.start_workers();

    wait_for_status(&app, delivery.id, WebhookDeliveryStatus::Success).await;
    // Stops between sweeps, nothing has to be aborted
    assert_eq!(manager.shutdown(Duration::from_secs(5)).await, 0);

    let stored = app.delivery(delivery.id).await;
    assert_eq!(stored.attempts, 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_shutdown_lets_in_flight_attempt_record_outcome() {
    let mut app = create_test_app().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .mount(&server)
        .await;

    let mut manager = WorkerManager::new();
    manager.register(Arc::new(DeliveryWorker::new(
        app.dispatcher.clone(),
        app.receiver.take().unwrap(),
        4,
    )));
    manager.register(Arc::new(RetryWorker::new(
        app.sweeper.clone(),
        Duration::from_secs(60),
        manager.shutdown_signal(),
    )));
    manager.start_workers();

    let user_id = Uuid::new_v4();
    app.seed_endpoint(user_id, &server.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Processing).await;
    let ids = app
        .fanout
        .trigger_for_transaction(tx.id, TransactionStatus::Completed)
        .await
        .unwrap();
    assert_eq!(ids.len(), 1);

    // Shut down while the merchant is still answering
    tokio::time::sleep(Duration::from_millis(200)).await;
    let TestApp {
        fanout,
        status_service,
        deliveries,
        ..
    } = app;
    drop((fanout, status_service));
    assert_eq!(manager.shutdown(Duration::from_secs(5)).await, 0);

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    let stored = deliveries.find_by_id(ids[0]).await.unwrap().unwrap();
    assert_eq!(stored.status, WebhookDeliveryStatus::Success);
    assert_eq!(stored.attempts, 1);
}

#[tokio::test]
async fn test_queued_ids_are_drained_on_shutdown() {
    let mut app = create_test_app().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
        .mount(&server)
        .await;

    let user_id = Uuid::new_v4();
    for i in 0..5 {
        app.seed_endpoint(user_id, &format!("{}/{}", server.uri(), i), true)
            .await;
    }
    let tx = app.seed_transaction(user_id, TransactionStatus::Processing).await;
    // Queued before the worker even starts
    let ids = app
        .fanout
        .trigger_for_transaction(tx.id, TransactionStatus::Failed)
        .await
        .unwrap();

    let mut manager = WorkerManager::new();
    manager.register(Arc::new(DeliveryWorker::new(
        app.dispatcher.clone(),
        app.receiver.take().unwrap(),
        1,
    )));
    manager.start_workers();

    let TestApp {
        fanout,
        status_service,
        deliveries,
        ..
    } = app;
    drop((fanout, status_service));
    assert_eq!(manager.shutdown(Duration::from_secs(5)).await, 0);

    for id in ids {
        let stored = deliveries.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, WebhookDeliveryStatus::Success);
    }
}
