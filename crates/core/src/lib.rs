use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// フィードソースから届く型なしレコード
///
/// 履歴的に camelCase と snake_case が混在しているため、各ヘルパーは
/// 候補となるキー名のリストを受け取り、最初に存在したものを採用する。
/// 「キーが存在しない」と「false」は区別する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Value);

pub type RawPost = RawRecord;
pub type RawComment = RawRecord;

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// 最初に存在するキーの値を返す（値が null でも「存在する」とみなす）
    pub fn field(&self, names: &[&str]) -> Option<&Value> {
        let obj = self.as_object()?;
        names.iter().find_map(|name| obj.get(*name))
    }

    pub fn has_field(&self, names: &[&str]) -> bool {
        self.field(names).is_some()
    }

    /// Typed lookups take the first key whose value has the wanted shape, so
    /// `{"type": null, "postType": "soap"}` reads as `"soap"`.
    fn typed_field<'a, T>(&'a self, names: &[&str], read: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        let obj = self.as_object()?;
        names.iter().find_map(|name| obj.get(*name).and_then(&read))
    }

    pub fn str_field(&self, names: &[&str]) -> Option<&str> {
        self.typed_field(names, Value::as_str)
    }

    pub fn bool_field(&self, names: &[&str]) -> Option<bool> {
        self.typed_field(names, Value::as_bool)
    }

    /// Integer ids may arrive as numbers or numeric strings.
    pub fn i64_field(&self, names: &[&str]) -> Option<i64> {
        self.typed_field(names, |value| match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Counters are non-negative; anything else reads as 0.
    pub fn count_field(&self, names: &[&str]) -> u32 {
        self.typed_field(names, Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(0)
    }

    pub fn timestamp_field(&self, names: &[&str]) -> Option<DateTime<Utc>> {
        self.typed_field(names, |value| value.as_str().and_then(parse_timestamp))
    }

    /// null 以外のオブジェクトのみ返す
    pub fn object_field(&self, names: &[&str]) -> Option<&Map<String, Value>> {
        self.typed_field(names, Value::as_object)
    }

    /// Opaque identifiers may be strings or numbers upstream.
    pub fn id_string_field(&self, names: &[&str]) -> Option<String> {
        self.typed_field(names, |value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Database exports without an offset are stored in UTC.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// 投稿の種別（分類器によって後付けで決まる）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Discussion,
    Prayer,
    Soap,
    Community,
}

impl PostKind {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "discussion" => Some(Self::Discussion),
            "prayer" => Some(Self::Prayer),
            "soap" => Some(Self::Soap),
            "community" => Some(Self::Community),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discussion => "discussion",
            Self::Prayer => "prayer",
            Self::Soap => "soap",
            Self::Community => "community",
        }
    }

    /// 通報時に付与するコンテンツ種別タグ
    pub fn report_content_type(&self) -> &'static str {
        match self {
            Self::Discussion => "post",
            Self::Prayer => "prayer_request",
            Self::Soap => "soap_entry",
            Self::Community => "community_post",
        }
    }
}

pub const SCRIPTURE_REFERENCE_PLACEHOLDER: &str = "Scripture Reflection";

/// SOAP (Scripture / Observation / Application / Prayer) の構造化データ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoapData {
    pub scripture: String,
    pub scripture_reference: String,
    pub observation: String,
    pub application: String,
    pub prayer: String,
}

impl SoapData {
    /// Reads an already-structured `soapEntry`/`soapData` object. Missing
    /// fields become empty strings.
    pub fn from_structured(obj: &Map<String, Value>) -> Self {
        let get = |names: &[&str]| -> String {
            names
                .iter()
                .find_map(|name| obj.get(*name).and_then(|v| v.as_str()))
                .unwrap_or_default()
                .to_string()
        };

        let scripture_reference = get(&["scriptureReference", "scripture_reference", "reference"]);

        Self {
            scripture: get(&["scripture", "scriptureText", "scripture_text"]),
            scripture_reference: if scripture_reference.is_empty() {
                SCRIPTURE_REFERENCE_PLACEHOLDER.to_string()
            } else {
                scripture_reference
            },
            observation: get(&["observation"]),
            application: get(&["application"]),
            prayer: get(&["prayer"]),
        }
    }
}

/// 正規化済みの投稿
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub like_count: u32,
    pub comment_count: u32,
    pub kind: PostKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soap_data: Option<SoapData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

pub const POST_ID_FIELDS: &[&str] = &["id", "postId", "post_id"];
pub const CONTENT_FIELDS: &[&str] = &["content", "body", "text"];
pub const AUTHOR_ID_FIELDS: &[&str] = &["authorId", "author_id", "userId", "user_id"];
pub const CREATED_AT_FIELDS: &[&str] = &["createdAt", "created_at"];
pub const LIKE_COUNT_FIELDS: &[&str] = &["likeCount", "like_count", "likesCount", "likes_count"];
/// Already-structured SOAP sub-records on newer posts.
pub const SOAP_ENTRY_FIELDS: &[&str] = &["soapEntry", "soap_entry", "soapData", "soap_data"];
pub const COMMENT_COUNT_FIELDS: &[&str] = &[
    "commentCount",
    "comment_count",
    "commentsCount",
    "comments_count",
];

/// コメント（フラットな一覧の 1 要素）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub like_count: u32,
}

impl Comment {
    /// Returns `None` only when the record carries no usable id.
    pub fn from_raw(raw: &RawComment) -> Option<Self> {
        let id = raw.i64_field(&["id", "commentId", "comment_id"])?;

        // `author` is sometimes an embedded profile object.
        let author = raw
            .object_field(&["author", "user"])
            .and_then(|obj| {
                ["displayName", "display_name", "name", "username"]
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(|v| v.as_str()))
                    .map(str::to_string)
            })
            .or_else(|| raw.id_string_field(&["author", "authorName", "author_name"]))
            .or_else(|| raw.id_string_field(AUTHOR_ID_FIELDS));

        Some(Self {
            id,
            parent_id: raw.i64_field(&["parentId", "parent_id"]),
            content: raw.str_field(CONTENT_FIELDS).unwrap_or_default().to_string(),
            author,
            created_at: raw.timestamp_field(CREATED_AT_FIELDS),
            like_count: raw.count_field(LIKE_COUNT_FIELDS),
        })
    }
}

/// Threaded comment: a node plus its (one level of) replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }
}

/// ルートコメントの並び順
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    MostLiked,
}

impl SortOrder {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "most_liked" => Some(Self::MostLiked),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::MostLiked => "most_liked",
        }
    }
}
