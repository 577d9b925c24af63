// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, start_time};
use chrono::Duration;
use payrelay::domain::models::transaction::{TransactionStatus, TransactionType};
use payrelay::domain::models::webhook::WebhookDeliveryStatus;
use payrelay::domain::repositories::webhook_delivery_repository::WebhookDeliveryRepository;
use payrelay::utils::clock::Clock;
use payrelay::utils::retry_policy::MAX_ATTEMPTS;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration as StdDuration;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_completed_deposit_is_delivered_once() {
    let mut app = create_test_app().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let user_id = Uuid::new_v4();
    app.seed_endpoint(user_id, &format!("{}/payments", server.uri()), true)
        .await;
    let tx = app
        .status_service
        .create_transaction(
            user_id,
            Decimal::from_str("100.00").unwrap(),
            TransactionType::Deposit,
        )
        .await
        .unwrap();
    // The PENDING notification is not part of this scenario
    let receiver = app.receiver.as_mut().unwrap();
    let pending_id = receiver.try_recv().unwrap();
    assert_eq!(app.delivery(pending_id).await.event, "payment.pending");

    app.clock.advance(Duration::seconds(5));
    let updated = app
        .status_service
        .update_status(tx.id, TransactionStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated.status, TransactionStatus::Completed);

    let ids = app.drain_queue().await;
    assert_eq!(ids.len(), 1);

    let delivery = app.delivery(ids[0]).await;
    assert_eq!(delivery.event, "payment.success");
    assert_eq!(delivery.status, WebhookDeliveryStatus::Success);
    assert_eq!(delivery.attempts, 1);
    assert_eq!(delivery.response_status, Some(200));
    assert_eq!(delivery.next_retry_at, None);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["event"], "payment.success");
    assert_eq!(body["transactionId"], tx.id.to_string());
    assert_eq!(body["userId"], user_id.to_string());
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["amount"], "100.00");
    assert_eq!(body["type"], "DEPOSIT");
    assert_eq!(body["timestamp"], "2025-06-01T12:00:05.000Z");
    assert_eq!(requests[0].body, delivery.payload.as_bytes());

    // Nothing left for the sweep
    let report = app.sweeper.sweep().await.unwrap();
    assert_eq!(report.selected, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_unavailable_endpoint_is_retried_until_success() {
    let mut app = create_test_app().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // Slow enough for the claimed state to be observed mid-attempt
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(StdDuration::from_millis(500)))
        .mount(&server)
        .await;

    let user_id = Uuid::new_v4();
    app.seed_endpoint(user_id, &server.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Processing).await;

    app.status_service
        .update_status(tx.id, TransactionStatus::Completed)
        .await
        .unwrap();
    let ids = app.drain_queue().await;
    let id = ids[0];

    let failed = app.delivery(id).await;
    assert_eq!(failed.status, WebhookDeliveryStatus::Failed);
    assert_eq!(failed.attempts, 1);
    assert_eq!(failed.response_status, Some(503));
    assert_eq!(
        failed.error_message.as_deref(),
        Some("HTTP 503: Service Unavailable")
    );
    assert_eq!(failed.next_retry_at, Some(start_time() + Duration::seconds(300)));

    // Not due yet
    let report = app.sweeper.sweep().await.unwrap();
    assert_eq!(report.selected, 0);

    app.clock.advance(Duration::seconds(301));
    let due = app
        .deliveries
        .find_due_for_retry(app.clock.now(), MAX_ATTEMPTS, 10)
        .await
        .unwrap();
    assert_eq!(due.len(), 1);

    let (report, seen) = tokio::join!(app.sweeper.sweep(), async {
        let mut seen = Vec::new();
        for _ in 0..40 {
            let status = app.delivery(id).await.status;
            seen.push(status);
            if status == WebhookDeliveryStatus::Success {
                break;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
        seen
    });
    let report = report.unwrap();
    assert_eq!(report.claimed, 1);
    assert_eq!(report.delivered, 1);
    assert!(seen.contains(&WebhookDeliveryStatus::Retrying));
    assert!(!seen.contains(&WebhookDeliveryStatus::Pending));

    let delivered = app.delivery(id).await;
    assert_eq!(delivered.status, WebhookDeliveryStatus::Success);
    assert_eq!(delivered.attempts, 2);
    assert_eq!(delivered.response_status, Some(200));
    assert_eq!(delivered.error_message, None);
    assert_eq!(delivered.next_retry_at, None);
    // Retries resend the bytes frozen at creation
    assert_eq!(delivered.payload, failed.payload);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn test_every_endpoint_receives_identical_bytes() {
    let mut app = create_test_app().await;
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(server)
            .await;
    }

    let user_id = Uuid::new_v4();
    app.seed_endpoint(user_id, &first.uri(), true).await;
    app.seed_endpoint(user_id, &second.uri(), true).await;
    let tx = app.seed_transaction(user_id, TransactionStatus::Processing).await;

    app.status_service
        .update_status(tx.id, TransactionStatus::Failed)
        .await
        .unwrap();
    let ids = app.drain_queue().await;
    assert_eq!(ids.len(), 2);

    let a = first.received_requests().await.unwrap();
    let b = second.received_requests().await.unwrap();
    assert_eq!(a[0].body, b[0].body);
    let body: Value = serde_json::from_slice(&a[0].body).unwrap();
    assert_eq!(body["event"], "payment.failed");

    for id in ids {
        assert_eq!(app.delivery(id).await.status, WebhookDeliveryStatus::Success);
    }
    first.verify().await;
    second.verify().await;
}
