use crate::helpers::{client::TestClient, mock_server::FAILING_POST_ID};
use axum::http::StatusCode;

/// 観点: 孤立した返信はルートになり、3 件すべてが辿れる
#[tokio::test]
async fn test_thread_newest() {
    let client = TestClient::new().await;
    let (status, body) = client.get("/posts/7/comments").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["postId"], 7);
    assert_eq!(body["sort"], "newest");
    assert_eq!(body["total"], 3);

    let roots = body["comments"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    // Orphan (10:00) is newer than comment 1 (08:00)
    assert_eq!(roots[0]["id"], 3);
    assert_eq!(roots[1]["id"], 1);
    assert_eq!(roots[1]["replies"][0]["id"], 2);
    assert_eq!(roots[1]["replies"][0]["parentId"], 1);
}

#[tokio::test]
async fn test_thread_most_liked() {
    let client = TestClient::new().await;
    let (status, body) = client.get("/posts/7/comments?sort=most_liked").await;

    assert_eq!(status, StatusCode::OK);
    let roots = body["comments"].as_array().unwrap();
    assert_eq!(roots[0]["likeCount"], 5);
    assert_eq!(roots[1]["likeCount"], 1);
}

#[tokio::test]
async fn test_unknown_sort_is_rejected() {
    let client = TestClient::new().await;
    let (status, _body) = client.get("/posts/7/comments?sort=oldest").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_fetch_failure() {
    let client = TestClient::new().await;
    let (status, _body) = client
        .get(&format!("/posts/{}/comments", FAILING_POST_ID))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_non_positive_post_id() {
    let client = TestClient::new().await;
    let (status, body) = client.get("/posts/0/comments").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post 0 not found");
}
