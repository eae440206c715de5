use crate::helpers::client::TestClient;
use axum::http::StatusCode;

/// ヘルスチェック: /health が 200 OK を返すか検証
#[tokio::test]
async fn test_health_check() {
    let client = TestClient::without_upstream();
    let (status, body) = client.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_root_banner() {
    let client = TestClient::without_upstream();
    let (status, body) = client.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("/feed"));
}

#[tokio::test]
async fn test_unknown_route() {
    let client = TestClient::without_upstream();
    let (status, _body) = client.get("/xrpc/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
