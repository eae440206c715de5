use regex::Regex;
use std::sync::OnceLock;

static BREAK_REGEX: OnceLock<Regex> = OnceLock::new();
static BLOCK_END_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static BLANK_LINES_REGEX: OnceLock<Regex> = OnceLock::new();

/// Characters of the section emoji markers (✍️ carries a variation selector).
pub(crate) const MARKER_CHARS: &[char] = &['📖', '🔍', '💡', '✍', '\u{FE0F}', '🙏'];

/// HTML / markdown の装飾を取り除いてプレーンテキストにする
///
/// - `<br>` と `</p>` / `</div>` は改行に変換
/// - それ以外のタグは削除、`**` も削除
/// - よく使われる HTML エンティティをデコード
/// - 前後の空白とセクション絵文字をトリム
pub fn strip_markup(text: &str) -> String {
    let br = BREAK_REGEX.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
    let block_end =
        BLOCK_END_REGEX.get_or_init(|| Regex::new(r"(?i)</(?:p|div|li|h[1-6])\s*>").unwrap());
    let tag = TAG_REGEX.get_or_init(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());
    let blank_lines = BLANK_LINES_REGEX.get_or_init(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

    let text = text.replace("\r\n", "\n");
    let text = br.replace_all(&text, "\n");
    let text = block_end.replace_all(&text, "\n");
    let text = tag.replace_all(&text, "");
    let text = text.replace("**", "");
    let text = decode_entities(&text);
    let text = blank_lines.replace_all(&text, "\n\n");

    text.trim_matches(|c: char| c.is_whitespace() || MARKER_CHARS.contains(&c))
        .to_string()
}

fn decode_entities(text: &str) -> String {
    // &amp; last so "&amp;lt;" decodes to "&lt;" rather than "<".
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
