mod common;

use common::{spawn_backend, unreachable_backend, Backend, BLOCKED_DOMAIN};
use pricetracker::client::{ClientError, RemoteClient};
use reqwest::StatusCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;

async fn client_for(backend: Arc<Backend>) -> RemoteClient {
    let base_url = spawn_backend(backend).await;
    RemoteClient::new(base_url).expect("Failed to build client")
}

#[tokio::test]
async fn list_returns_raw_records() {
    let client = client_for(Backend::with_products(2)).await;

    let records = client.list_products().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["product"]["title"], "Tracked item 1");
}

#[tokio::test]
async fn list_failure_is_rejected() {
    let backend = Backend::with_products(1);
    backend.fail_list.store(true, Ordering::SeqCst);
    let client = client_for(backend).await;

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rejected { status: StatusCode::INTERNAL_SERVER_ERROR, .. }
    ));
    assert!(!err.is_connectivity());
}

#[tokio::test]
async fn add_sends_trimmed_url() {
    let backend = Backend::with_products(0);
    let client = client_for(backend.clone()).await;

    let record = client
        .add_product("   https://www.amazon.in/dp/B0TEST1234\n")
        .await
        .unwrap();

    assert_eq!(record["product"]["amazon_url"], "https://www.amazon.in/dp/B0TEST1234");
    assert_eq!(
        *backend.received_urls.lock().unwrap(),
        vec!["https://www.amazon.in/dp/B0TEST1234".to_string()]
    );
}

#[tokio::test]
async fn duplicate_add_carries_detail() {
    let backend = Backend::with_products(0);
    let client = client_for(backend).await;
    let url = "https://www.amazon.in/dp/B0TEST1234";

    client.add_product(url).await.unwrap();
    let err = client.add_product(url).await.unwrap_err();
    assert_eq!(err.detail(), Some("Already tracking this product"));
}

#[tokio::test]
async fn delete_hits_id_path() {
    let backend = Backend::with_products(2);
    let client = client_for(backend.clone()).await;

    client.delete_product("1").await.unwrap();
    assert_eq!(backend.product_ids(), vec!["2".to_string()]);
    assert_eq!(backend.count_requests("DELETE /delete_tracking/1"), 1);
}

#[tokio::test]
async fn unknown_delete_carries_detail() {
    let client = client_for(Backend::with_products(1)).await;

    let err = client.delete_product("999").await.unwrap_err();
    assert_eq!(err.detail(), Some("Tracking not found"));
    assert!(matches!(
        err,
        ClientError::Rejected { status: StatusCode::NOT_FOUND, .. }
    ));
}

#[tokio::test]
async fn email_is_submitted() {
    let backend = Backend::with_products(0);
    let client = client_for(backend.clone()).await;

    client.submit_email("me@test.com").await.unwrap();
    assert_eq!(backend.count_requests("PUT /submit_email"), 1);
}

#[tokio::test]
async fn rejected_email_carries_detail() {
    let client = client_for(Backend::with_products(0)).await;

    let err = client
        .submit_email(&format!("me{BLOCKED_DOMAIN}"))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), Some("Email domain not allowed"));
}

#[tokio::test]
async fn unreachable_backend_is_a_connectivity_error() {
    let client = RemoteClient::new(unreachable_backend()).unwrap();

    let err = client.list_products().await.unwrap_err();
    assert!(err.is_connectivity());
    assert_eq!(err.detail(), None);
}
