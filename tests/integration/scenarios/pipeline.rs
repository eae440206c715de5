use crate::helpers::client::TestClient;
use axum::http::StatusCode;
use serde_json::json;

/// 観点: 分類結果と通報用の種別タグが返る
#[tokio::test]
async fn test_classify_endpoint() {
    let client = TestClient::without_upstream();

    let cases = vec![
        (json!({ "type": "prayer_request", "content": "...", "category": "healing" }), "prayer", "prayer_request"),
        (json!({ "soapEntry": { "scripture": "x" } }), "soap", "soap_entry"),
        (json!({ "communityId": 3, "title": "t" }), "community", "community_post"),
        (json!({ "title": "Hello", "content": "world" }), "discussion", "post"),
        (json!(null), "discussion", "post"),
    ];

    for (record, kind, report_type) in cases {
        let (status, body) = client.post_json("/classify", record.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], kind, "{}", record);
        assert_eq!(body["reportContentType"], report_type, "{}", record);
    }
}

#[tokio::test]
async fn test_extract_endpoint() {
    let client = TestClient::without_upstream();

    let (status, body) = client.post_json("/soap/extract", json!({ "content": "" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scriptureReference"], "Scripture Reflection");
    for field in ["scripture", "observation", "application", "prayer"] {
        assert_eq!(body[field], "", "{}", field);
    }

    let (status, body) = client
        .post_json(
            "/soap/extract",
            json!({ "content": "<b>Application:</b> Call a friend<br><b>Prayer:</b> Amen" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"], "Call a friend");
    assert_eq!(body["prayer"], "Amen");
}
