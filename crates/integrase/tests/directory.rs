mod common;

use axum::Router;
use common::{config, RecordingAdapter, LIST_ID, SECRET};
use integrase::{patch_list, prepare, DirectoryClient, DirectoryError, ListPatch};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn list_path() -> String {
    format!("/lists/{LIST_ID}")
}

#[tokio::test]
async fn patch_list_returns_updated_fields() {
    let directory = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(list_path()))
        .and(header("Authorization", SECRET))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"claim_bot_api": "https://list.example.com/claim"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"has_updated": ["claim_bot_api"]})),
        )
        .expect(1)
        .mount(&directory)
        .await;

    let cfg = config().with_api_url(directory.uri());
    let patch = ListPatch {
        claim_bot_api: Some("https://list.example.com/claim".into()),
        ..Default::default()
    };

    let resp = patch_list(&cfg, &patch).await.unwrap();
    assert_eq!(resp.has_updated, vec!["claim_bot_api".to_string()]);
    assert!(resp.secret_key.is_none());
}

#[tokio::test]
async fn non_success_surfaces_raw_body() {
    let directory = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(list_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&directory)
        .await;

    let client = DirectoryClient::new(&directory.uri(), LIST_ID, SECRET.into()).unwrap();
    let err = client.patch_list(&ListPatch::default()).await.unwrap_err();

    assert_eq!(err.to_string(), "boom");
    assert!(matches!(err, DirectoryError::Rejected { .. }));
}

#[tokio::test]
async fn rotated_secret_key_is_returned() {
    let directory = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(list_path()))
        .and(body_json(json!({"reset_secret_key": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_updated": ["secret_key"],
            "secret_key": "fresh-key",
        })))
        .mount(&directory)
        .await;

    let cfg = config().with_api_url(format!("{}/", directory.uri()));
    let patch = ListPatch {
        reset_secret_key: true,
        ..Default::default()
    };

    let resp = patch_list(&cfg, &patch).await.unwrap();
    assert_eq!(resp.secret_key.as_deref(), Some("fresh-key"));
}

#[tokio::test]
async fn undecodable_success_body_is_an_error() {
    let directory = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&directory)
        .await;

    let cfg = config().with_api_url(directory.uri());
    let err = patch_list(&cfg, &ListPatch::default()).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Decode(_)), "{err}");
}

#[tokio::test]
async fn prepare_announces_every_route() {
    let directory = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(list_path()))
        .and(header("Authorization", SECRET))
        .and(body_json(json!({
            "claim_bot_api": "https://list.example.com/claim",
            "unclaim_bot_api": "https://list.example.com/unclaim",
            "approve_bot_api": "https://list.example.com/approve",
            "deny_bot_api": "https://list.example.com/deny",
            "data_request_api": "https://list.example.com/data-request",
            "data_deletion_api": "https://list.example.com/data-delete",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"has_updated": []})))
        .expect(1)
        .mount(&directory)
        .await;

    let cfg = config()
        .with_api_url(directory.uri())
        .with_domain("https://list.example.com")
        .with_startup_logs(true);

    prepare(RecordingAdapter::new(cfg), Router::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_announcement_is_not_fatal() {
    let directory = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad secret"))
        .expect(1)
        .mount(&directory)
        .await;

    let cfg = config()
        .with_api_url(directory.uri())
        .with_domain("https://list.example.com");

    assert!(prepare(RecordingAdapter::new(cfg), Router::new()).await.is_ok());
}

#[tokio::test]
async fn no_domain_means_no_announcement() {
    let directory = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&directory)
        .await;

    let cfg = config().with_api_url(directory.uri());
    assert!(prepare(RecordingAdapter::new(cfg), Router::new()).await.is_ok());
}
