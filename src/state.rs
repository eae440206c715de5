use serde::Deserialize;
use timeline::ApiClient;

pub const DEFAULT_FEED_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// 上流 REST API のベース URL
    pub feed_api_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let feed_api_url =
            std::env::var("FEED_API_URL").unwrap_or_else(|_| DEFAULT_FEED_API_URL.to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { feed_api_url, port }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub sort: Option<String>,
}

pub type SharedState = AppState;

#[derive(Clone)]
pub struct AppState {
    /// Upstream feed and comment API
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: AppConfig, http_client: reqwest::Client) -> Self {
        Self {
            api: ApiClient::new(http_client, config.feed_api_url),
        }
    }
}
