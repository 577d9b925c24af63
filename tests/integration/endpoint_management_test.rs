// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use chrono::Duration;
use payrelay::domain::models::transaction::TransactionStatus;
use payrelay::domain::repositories::webhook_endpoint_repository::WebhookEndpointRepository;
use payrelay::domain::use_cases::manage_webhook_endpoints::{
    UpdateWebhookEndpoint, WebhookEndpointUseCase,
};
use payrelay::utils::errors::DomainError;
use uuid::Uuid;

#[tokio::test]
async fn test_register_and_list_endpoints() {
    let app = create_test_app().await;
    let use_case = WebhookEndpointUseCase::new(app.endpoints.clone(), app.clock.clone());
    let user_id = Uuid::new_v4();

    let first = use_case
        .register(user_id, "https://merchant.test/hooks")
        .await
        .unwrap();
    app.clock.advance(Duration::seconds(1));
    let second = use_case
        .register(user_id, "https://merchant.test/backup")
        .await
        .unwrap();
    use_case
        .register(Uuid::new_v4(), "https://someone-else.test/")
        .await
        .unwrap();

    assert!(first.is_active);
    assert_eq!(first.secret.len(), 64);
    assert_ne!(first.secret, second.secret);

    let listed = use_case.list(user_id).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_register_rejects_invalid_url() {
    let app = create_test_app().await;
    let use_case = WebhookEndpointUseCase::new(app.endpoints.clone(), app.clock.clone());

    for url in ["", "merchant.test/hooks", "ftp://merchant.test/hooks"] {
        let result = use_case.register(Uuid::new_v4(), url).await;
        assert!(matches!(result, Err(DomainError::Validation(_))), "{url}");
    }
}

#[tokio::test]
async fn test_update_is_owner_scoped() {
    let app = create_test_app().await;
    let use_case = WebhookEndpointUseCase::new(app.endpoints.clone(), app.clock.clone());
    let owner = Uuid::new_v4();
    let endpoint = use_case
        .register(owner, "https://merchant.test/hooks")
        .await
        .unwrap();

    let stranger = use_case
        .update(
            Uuid::new_v4(),
            endpoint.id,
            UpdateWebhookEndpoint {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(stranger, Err(DomainError::NotFound)));

    app.clock.advance(Duration::seconds(30));
    let updated = use_case
        .update(
            owner,
            endpoint.id,
            UpdateWebhookEndpoint {
                url: Some("https://merchant.test/v2".to_string()),
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.url, "https://merchant.test/v2");
    assert!(!updated.is_active);
    // The secret is never rotated implicitly
    assert_eq!(updated.secret, endpoint.secret);
    assert!(updated.updated_at > endpoint.updated_at);
}

#[tokio::test]
async fn test_deactivated_endpoint_gets_no_new_deliveries() {
    let app = create_test_app().await;
    let use_case = WebhookEndpointUseCase::new(app.endpoints.clone(), app.clock.clone());
    let user_id = Uuid::new_v4();
    let endpoint = use_case
        .register(user_id, "https://merchant.test/hooks")
        .await
        .unwrap();
    let tx = app.seed_transaction(user_id, TransactionStatus::Processing).await;

    use_case
        .update(
            user_id,
            endpoint.id,
            UpdateWebhookEndpoint {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(app.endpoints.find_active_by_user(user_id).await.unwrap().is_empty());
    assert_eq!(app.endpoints.find_by_user(user_id).await.unwrap().len(), 1);

    let ids = app
        .fanout
        .trigger_for_transaction(tx.id, TransactionStatus::Completed)
        .await
        .unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app().await;
    let use_case = WebhookEndpointUseCase::new(app.endpoints.clone(), app.clock.clone());
    let owner = Uuid::new_v4();
    let endpoint = use_case
        .register(owner, "https://merchant.test/hooks")
        .await
        .unwrap();

    assert!(matches!(
        use_case.delete(Uuid::new_v4(), endpoint.id).await,
        Err(DomainError::NotFound)
    ));

    use_case.delete(owner, endpoint.id).await.unwrap();
    assert!(use_case.list(owner).await.unwrap().is_empty());
    assert!(matches!(
        use_case.delete(owner, endpoint.id).await,
        Err(DomainError::NotFound)
    ));
}
