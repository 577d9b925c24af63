// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, start_time, STALL_TIMEOUT_SECS};
use chrono::Duration;
use payrelay::domain::models::transaction::TransactionStatus;
use payrelay::domain::models::webhook::WebhookDeliveryStatus;
use payrelay::domain::repositories::webhook_delivery_repository::WebhookDeliveryRepository;
use payrelay::domain::services::retry_sweeper::RetrySweeper;
use payrelay::utils::retry_policy::MAX_ATTEMPTS;
use std::sync::Arc;
use uuid::Uuid;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn ok_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_sweep_selects_only_due_failed_deliveries() {
    let app = create_test_app().await;
    let server = ok_server().await;
    let user_id = Uuid::new_v4();
    let active = app.seed_endpoint(user_id, &server.uri(), true).await;
    let inactive = app.seed_endpoint(user_id, &server.uri(), false).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Completed).await;
    let past = start_time() - Duration::minutes(1);
    let future = start_time() + Duration::minutes(10);

    let due = app
        .seed_delivery(&tx, &active, WebhookDeliveryStatus::Failed, 1, past)
        .await;
    let not_yet = app
        .seed_delivery(&tx, &active, WebhookDeliveryStatus::Failed, 1, future)
        .await;
    let exhausted = app
        .seed_delivery(&tx, &active, WebhookDeliveryStatus::Failed, MAX_ATTEMPTS, past)
        .await;
    let paused = app
        .seed_delivery(&tx, &inactive, WebhookDeliveryStatus::Failed, 1, past)
        .await;
    let done = app
        .seed_delivery(&tx, &active, WebhookDeliveryStatus::Success, 1, past)
        .await;

    let report = app.sweeper.sweep().await.unwrap();
    assert_eq!(report.selected, 1);
    assert_eq!(report.claimed, 1);
    assert_eq!(report.delivered, 1);

    let stored = app.delivery(due.id).await;
    assert_eq!(stored.status, WebhookDeliveryStatus::Success);
    assert_eq!(stored.attempts, 2);

    for untouched in [not_yet, exhausted, paused, done] {
        assert_eq!(app.delivery(untouched.id).await, untouched);
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sweep_respects_batch_size_and_order() {
    let app = create_test_app().await;
    let server = ok_server().await;
    let user_id = Uuid::new_v4();
    let endpoint = app.seed_endpoint(user_id, &server.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Completed).await;

    let oldest = app
        .seed_delivery(
            &tx,
            &endpoint,
            WebhookDeliveryStatus::Failed,
            1,
            start_time() - Duration::minutes(30),
        )
        .await;
    let middle = app
        .seed_delivery(
            &tx,
            &endpoint,
            WebhookDeliveryStatus::Failed,
            1,
            start_time() - Duration::minutes(20),
        )
        .await;
    let newest = app
        .seed_delivery(
            &tx,
            &endpoint,
            WebhookDeliveryStatus::Failed,
            1,
            start_time() - Duration::minutes(10),
        )
        .await;

    let sweeper = RetrySweeper::new(
        app.deliveries.clone(),
        app.dispatcher.clone(),
        app.clock.clone(),
        2,
        Duration::seconds(STALL_TIMEOUT_SECS),
    );
    let report = sweeper.sweep().await.unwrap();
    assert_eq!(report.selected, 2);
    assert_eq!(report.delivered, 2);

    assert_eq!(app.delivery(oldest.id).await.status, WebhookDeliveryStatus::Success);
    assert_eq!(app.delivery(middle.id).await.status, WebhookDeliveryStatus::Success);
    assert_eq!(app.delivery(newest.id).await.status, WebhookDeliveryStatus::Failed);
}

#[tokio::test]
async fn test_claim_is_exclusive() {
    let app = create_test_app().await;
    let user_id = Uuid::new_v4();
    let endpoint = app.seed_endpoint(user_id, "https://merchant.test/", true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Completed).await;
    let delivery = app
        .seed_delivery(&tx, &endpoint, WebhookDeliveryStatus::Failed, 1, start_time())
        .await;
    let now = start_time();

    assert!(app.deliveries.claim_for_retry(delivery.id, now).await.unwrap());
    assert!(!app.deliveries.claim_for_retry(delivery.id, now).await.unwrap());
    assert_eq!(
        app.delivery(delivery.id).await.status,
        WebhookDeliveryStatus::Retrying
    );

    // A claimed record is invisible to the next selection
    let due = app
        .deliveries
        .find_due_for_retry(now, MAX_ATTEMPTS, 10)
        .await
        .unwrap();
    assert!(due.is_empty());

    assert!(app.deliveries.release_claim(delivery.id, now).await.unwrap());
    assert_eq!(
        app.delivery(delivery.id).await.status,
        WebhookDeliveryStatus::Failed
    );
}

#[tokio::test]
async fn test_concurrent_sweeps_deliver_once() {
    let app = create_test_app().await;
    let server = ok_server().await;
    let user_id = Uuid::new_v4();
    let endpoint = app.seed_endpoint(user_id, &server.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Completed).await;
    let delivery = app
        .seed_delivery(
            &tx,
            &endpoint,
            WebhookDeliveryStatus::Failed,
            1,
            start_time() - Duration::minutes(1),
        )
        .await;

    let first = Arc::clone(&app.sweeper);
    let second = Arc::clone(&app.sweeper);
    let (a, b) = tokio::join!(first.sweep(), second.sweep());
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.claimed + b.claimed, 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert_eq!(app.delivery(delivery.id).await.attempts, 2);
}

#[tokio::test]
async fn test_stalled_claim_is_recovered() {
    let app = create_test_app().await;
    let server = ok_server().await;
    let user_id = Uuid::new_v4();
    let endpoint = app.seed_endpoint(user_id, &server.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Completed).await;
    // Left in RETRYING by a process that died mid-attempt
    let stalled = app
        .seed_delivery(&tx, &endpoint, WebhookDeliveryStatus::Retrying, 2, start_time())
        .await;

    let report = app.sweeper.sweep().await.unwrap();
    assert_eq!(report.requeued, 0);
    assert_eq!(
        app.delivery(stalled.id).await.status,
        WebhookDeliveryStatus::Retrying
    );

    app.clock.advance(Duration::seconds(STALL_TIMEOUT_SECS + 1));
    let report = app.sweeper.sweep().await.unwrap();
    assert_eq!(report.requeued, 1);
    assert_eq!(report.delivered, 1);

    let stored = app.delivery(stalled.id).await;
    assert_eq!(stored.status, WebhookDeliveryStatus::Success);
    assert_eq!(stored.attempts, 3);
}

#[tokio::test]
async fn test_lost_first_attempt_is_recovered() {
    let app = create_test_app().await;
    let server = ok_server().await;
    let user_id = Uuid::new_v4();
    let endpoint = app.seed_endpoint(user_id, &server.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Completed).await;
    // Created but the handoff to the dispatch queue never happened
    let orphan = app
        .seed_delivery(&tx, &endpoint, WebhookDeliveryStatus::Pending, 0, start_time())
        .await;

    app.clock.advance(Duration::seconds(STALL_TIMEOUT_SECS + 1));
    let report = app.sweeper.sweep().await.unwrap();
    assert_eq!(report.requeued, 1);
    assert_eq!(report.delivered, 1);

    let stored = app.delivery(orphan.id).await;
    assert_eq!(stored.status, WebhookDeliveryStatus::Success);
    assert_eq!(stored.attempts, 1);
}
