use feed_core::{
    Post, PostKind, RawPost, SoapData, AUTHOR_ID_FIELDS, COMMENT_COUNT_FIELDS, CONTENT_FIELDS,
    CREATED_AT_FIELDS, LIKE_COUNT_FIELDS, POST_ID_FIELDS, SOAP_ENTRY_FIELDS,
};

/// 型なしレコードを Post に正規化する
///
/// 分類 → (SOAP かつ構造化データなしなら) 旧形式の抽出 → 画像参照の分離。
/// id を持たないレコードはタイムラインに載せられないので `None`。
pub fn normalize_post(raw: &RawPost) -> Option<Post> {
    let id = raw.i64_field(POST_ID_FIELDS)?;
    let kind = classifier::classify(raw);

    let content = raw.str_field(CONTENT_FIELDS).unwrap_or_default();
    let (content, images) = legacysoap::extract_image_refs(content);

    let soap_data = match kind {
        PostKind::Soap => Some(match raw.object_field(SOAP_ENTRY_FIELDS) {
            Some(structured) => SoapData::from_structured(structured),
            None => legacysoap::extract_legacy_soap(&content),
        }),
        _ => None,
    };

    Some(Post {
        id,
        content,
        author_id: raw.id_string_field(AUTHOR_ID_FIELDS),
        created_at: raw.timestamp_field(CREATED_AT_FIELDS),
        like_count: raw.count_field(LIKE_COUNT_FIELDS),
        comment_count: raw.count_field(COMMENT_COUNT_FIELDS),
        kind,
        soap_data,
        images,
    })
}

pub fn normalize_page(raw: &[RawPost]) -> Vec<Post> {
    raw.iter()
        .filter_map(|record| {
            let post = normalize_post(record);
            if post.is_none() {
                tracing::warn!("Skipping feed record without an id");
            }
            post
        })
        .collect()
}
