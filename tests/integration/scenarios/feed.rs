use crate::helpers::{client::TestClient, mock_server::TOTAL_POSTS};
use axum::http::StatusCode;

/// 観点: 1 ページ目は 10 件で続きあり、投稿は分類・抽出済み
#[tokio::test]
async fn test_first_page_is_normalized() {
    let client = TestClient::new().await;
    let (status, body) = client.get("/feed?page=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["hasMore"], true);

    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 10);

    assert_eq!(posts[0]["kind"], "prayer");
    assert_eq!(posts[0]["likeCount"], 2);

    assert_eq!(posts[1]["kind"], "soap");
    assert_eq!(posts[1]["soapData"]["scriptureReference"], "John 3:16");
    assert_eq!(posts[1]["soapData"]["scripture"], "For God so loved...");

    assert_eq!(posts[2]["kind"], "discussion");
    assert_eq!(posts[2]["content"], "See you there");
    assert_eq!(posts[2]["images"][0], "https://cdn.example/hall.png");
    assert!(posts[2].get("soapData").is_none());
}

/// 観点: 2 ページ目は 4 件で終端
#[tokio::test]
async fn test_short_page_ends_feed() {
    let client = TestClient::new().await;
    let (status, body) = client.get("/feed?page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasMore"], false);
    assert_eq!(body["posts"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_feed_all() {
    let client = TestClient::new().await;
    let (status, body) = client.get("/feed/all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasMore"], false);
    assert_eq!(body["posts"].as_array().unwrap().len() as i64, TOTAL_POSTS);
}

#[tokio::test]
async fn test_page_zero_is_rejected() {
    let client = TestClient::new().await;
    let (status, body) = client.get("/feed?page=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

/// 観点: 上流に到達できなければ 502
#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let client = TestClient::without_upstream();
    let (status, body) = client.get("/feed").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Upstream request failed");
}
