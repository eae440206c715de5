use crate::source::{CommentSource, FeedSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use feed_core::{RawComment, RawPost, RawRecord};
use reqwest::Client;
use serde_json::Value;

/// REST API を叩く FeedSource / CommentSource の実装
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_records(&self, path: &str, query: &[(&str, String)], key: &str) -> Result<Vec<RawRecord>> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("API request failed: {} - {}", status, text);
        }

        let body: Value = res
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;

        records_from_body(body, key)
    }
}

/// Accepts either a bare JSON array or an object wrapping the array under
/// `key` (`{ "posts": [...] }`).
fn records_from_body(body: Value, key: &str) -> Result<Vec<RawRecord>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove(key) {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("Response object has no `{}` array", key),
        },
        other => anyhow::bail!("Unexpected response shape: {}", other),
    };

    Ok(items.into_iter().map(RawRecord::new).collect())
}

#[async_trait]
impl FeedSource for ApiClient {
    async fn fetch_page(&self, page: usize, page_size: usize) -> Result<Vec<RawPost>> {
        tracing::debug!("Fetching feed page {} (size {})", page, page_size);
        self.get_records(
            "/posts",
            &[("page", page.to_string()), ("limit", page_size.to_string())],
            "posts",
        )
        .await
        .with_context(|| format!("Failed to fetch feed page {}", page))
    }

    async fn fetch_all(&self, page_size: usize) -> Result<Vec<RawPost>> {
        tracing::debug!("Fetching whole feed (size {})", page_size);
        self.get_records(
            "/posts",
            &[("page", "1".to_string()), ("limit", page_size.to_string())],
            "posts",
        )
        .await
        .context("Failed to fetch whole feed")
    }
}

#[async_trait]
impl CommentSource for ApiClient {
    async fn fetch_comments(&self, post_id: i64) -> Result<Vec<RawComment>> {
        self.get_records(&format!("/posts/{}/comments", post_id), &[], "comments")
            .await
            .with_context(|| format!("Failed to fetch comments for post {}", post_id))
    }
}
