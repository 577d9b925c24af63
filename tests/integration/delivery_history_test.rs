// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, start_time, TestApp};
use chrono::Duration;
use payrelay::domain::models::transaction::TransactionStatus;
use payrelay::domain::models::webhook::WebhookDeliveryStatus;
use payrelay::domain::use_cases::delivery_history::{
    DeliveryHistoryQuery, DeliveryHistoryUseCase, MAX_PAGE_SIZE,
};
use payrelay::utils::errors::DomainError;
use uuid::Uuid;

fn history(app: &TestApp) -> DeliveryHistoryUseCase {
    DeliveryHistoryUseCase::new(
        app.deliveries.clone(),
        app.endpoints.clone(),
        app.transactions.clone(),
    )
}

#[tokio::test]
async fn test_list_is_scoped_to_owner_and_newest_first() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    let endpoint = app.seed_endpoint(owner, "https://a.test/", true).await;
    let foreign_endpoint = app.seed_endpoint(other, "https://b.test/", true).await;
    let tx = app.seed_transaction(owner, TransactionStatus::Completed).await;
    let foreign_tx = app.seed_transaction(other, TransactionStatus::Completed).await;

    let mut expected = Vec::new();
    for _ in 0..3 {
        let delivery = app
            .seed_delivery(&tx, &endpoint, WebhookDeliveryStatus::Pending, 0, start_time())
            .await;
        expected.push(delivery.id);
        app.clock.advance(Duration::seconds(1));
    }
    app.seed_delivery(
        &foreign_tx,
        &foreign_endpoint,
        WebhookDeliveryStatus::Pending,
        0,
        start_time(),
    )
    .await;
    expected.reverse();

    let page = history(&app)
        .list(owner, DeliveryHistoryQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.limit, 50);
    assert_eq!(page.offset, 0);
    let ids: Vec<Uuid> = page.items.iter().map(|d| d.id).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_list_filters_and_pages() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let first = app.seed_endpoint(owner, "https://a.test/", true).await;
    let second = app.seed_endpoint(owner, "https://b.test/", true).await;
    let tx = app.seed_transaction(owner, TransactionStatus::Completed).await;

    for _ in 0..4 {
        app.seed_delivery(&tx, &first, WebhookDeliveryStatus::Failed, 1, start_time())
            .await;
        app.clock.advance(Duration::seconds(1));
    }
    app.seed_delivery(&tx, &second, WebhookDeliveryStatus::Success, 1, start_time())
        .await;

    let use_case = history(&app);

    let failed = use_case
        .list(
            owner,
            DeliveryHistoryQuery {
                status: Some(WebhookDeliveryStatus::Failed),
                limit: Some(3),
                offset: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(failed.total, 4);
    assert_eq!(failed.items.len(), 2);

    let by_endpoint = use_case
        .list(
            owner,
            DeliveryHistoryQuery {
                endpoint_id: Some(second.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_endpoint.total, 1);
    assert_eq!(by_endpoint.items[0].webhook_endpoint_id, second.id);

    let clamped = use_case
        .list(
            owner,
            DeliveryHistoryQuery {
                limit: Some(10_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(clamped.limit, MAX_PAGE_SIZE);
}

#[tokio::test]
async fn test_foreign_endpoint_filter_is_not_found() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let foreign = app
        .seed_endpoint(Uuid::new_v4(), "https://b.test/", true)
        .await;

    let result = history(&app)
        .list(
            owner,
            DeliveryHistoryQuery {
                endpoint_id: Some(foreign.id),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::NotFound)));
}

#[tokio::test]
async fn test_get_checks_ownership() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let endpoint = app.seed_endpoint(owner, "https://a.test/", true).await;
    let tx = app.seed_transaction(owner, TransactionStatus::Completed).await;
    let delivery = app
        .seed_delivery(&tx, &endpoint, WebhookDeliveryStatus::Failed, 2, start_time())
        .await;

    let use_case = history(&app);
    let found = use_case.get(owner, delivery.id).await.unwrap();
    assert_eq!(found.id, delivery.id);
    assert_eq!(found.attempts, 2);

    assert!(matches!(
        use_case.get(Uuid::new_v4(), delivery.id).await,
        Err(DomainError::NotFound)
    ));
    assert!(matches!(
        use_case.get(owner, Uuid::new_v4()).await,
        Err(DomainError::NotFound)
    ));
}
