use regex::Regex;
use std::sync::OnceLock;

static IMAGE_REF_REGEX: OnceLock<Regex> = OnceLock::new();

/// 本文中の Markdown 画像参照 `![alt](url)` を取り除き、URL の一覧を返す
pub fn extract_image_refs(content: &str) -> (String, Vec<String>) {
    let regex = IMAGE_REF_REGEX
        .get_or_init(|| Regex::new(r#"!\[[^\]]*\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap());

    let urls: Vec<String> = regex
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();

    if urls.is_empty() {
        return (content.to_string(), urls);
    }

    let text = regex.replace_all(content, "");
    (text.trim().to_string(), urls)
}
