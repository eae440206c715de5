use axum::response::Json;
use feed_core::{PostKind, RawPost, SoapData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub kind: PostKind,
    /// 通報 API に渡すコンテンツ種別
    pub report_content_type: &'static str,
}

pub async fn classify_post(Json(raw): Json<RawPost>) -> Json<ClassifyResponse> {
    let kind = classifier::classify(&raw);
    Json(ClassifyResponse {
        kind,
        report_content_type: kind.report_content_type(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn extract_soap(Json(req): Json<ExtractRequest>) -> Json<SoapData> {
    Json(legacysoap::extract_legacy_soap(&req.content))
}
