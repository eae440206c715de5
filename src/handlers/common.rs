pub async fn root() -> &'static str {
    "Fellowship feed pipeline: /feed, /feed/all, /posts/{id}/comments"
}

pub async fn health() -> &'static str {
    "OK"
}
