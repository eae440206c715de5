//! 投稿レコードの種別判定
//!
//! 上流のレコードには一貫した判別子がないため、フィールドの有無による
//! ヒューリスティックを優先度順に評価する。最初にマッチしたルールが勝つ。
//! どのルールにもマッチしなければ `Discussion`。

use feed_core::{PostKind, RawPost, SOAP_ENTRY_FIELDS};

const TYPE_FIELDS: &[&str] = &["type", "postType", "post_type"];
const SUBTYPE_FIELDS: &[&str] = &["subtype", "subType", "sub_type"];
const PRAYER_FLAG_FIELDS: &[&str] = &["isPrayerRequest", "is_prayer_request"];
const PRAYER_SIGNAL_FIELDS: &[&str] = &["isAnonymous", "is_anonymous", "isUrgent", "is_urgent"];
const COMMUNITY_ID_FIELDS: &[&str] = &["communityId", "community_id"];

/// 判定ルール 1 件
pub struct Rule {
    pub name: &'static str,
    pub kind: PostKind,
    pub predicate: fn(&RawPost) -> bool,
}

static RULES: &[Rule] = &[
    Rule {
        name: "prayer_type_tag",
        kind: PostKind::Prayer,
        predicate: has_prayer_type_tag,
    },
    Rule {
        name: "prayer_flag",
        kind: PostKind::Prayer,
        predicate: has_prayer_flag,
    },
    Rule {
        name: "prayer_signal_field",
        kind: PostKind::Prayer,
        predicate: has_prayer_signal_field,
    },
    Rule {
        name: "prayer_untitled_category",
        kind: PostKind::Prayer,
        predicate: is_untitled_categorized,
    },
    Rule {
        name: "soap_type_tag",
        kind: PostKind::Soap,
        predicate: has_soap_type_tag,
    },
    Rule {
        name: "soap_nested_entry",
        kind: PostKind::Soap,
        predicate: has_nested_soap_entry,
    },
    Rule {
        name: "community_tag",
        kind: PostKind::Community,
        predicate: is_community_post,
    },
];

/// Priority-ordered rule table. Exposed for diagnostics and tests.
pub fn rules() -> &'static [Rule] {
    RULES
}

/// 投稿レコードを種別に分類する。必ずいずれかの種別を返す。
pub fn classify(post: &RawPost) -> PostKind {
    match RULES.iter().find(|rule| (rule.predicate)(post)) {
        Some(rule) => {
            tracing::debug!("Classified as {} by rule {}", rule.kind.as_str(), rule.name);
            rule.kind
        }
        None => PostKind::Discussion,
    }
}

fn tag_equals(post: &RawPost, fields: &[&str], expected: &[&str]) -> bool {
    post.str_field(fields)
        .map(|tag| expected.contains(&tag))
        .unwrap_or(false)
}

fn has_prayer_type_tag(post: &RawPost) -> bool {
    tag_equals(post, TYPE_FIELDS, &["prayer_request"])
}

fn has_prayer_flag(post: &RawPost) -> bool {
    post.bool_field(PRAYER_FLAG_FIELDS) == Some(true)
}

// Presence, not value: `isAnonymous: false` still marks a prayer request.
fn has_prayer_signal_field(post: &RawPost) -> bool {
    post.has_field(PRAYER_SIGNAL_FIELDS)
}

fn is_untitled_categorized(post: &RawPost) -> bool {
    post.has_field(&["category"]) && post.has_field(&["content"]) && !post.has_field(&["title"])
}

fn has_soap_type_tag(post: &RawPost) -> bool {
    const SOAP_TAGS: &[&str] = &["soap", "soap_reflection"];
    tag_equals(post, TYPE_FIELDS, SOAP_TAGS) || tag_equals(post, SUBTYPE_FIELDS, SOAP_TAGS)
}

fn has_nested_soap_entry(post: &RawPost) -> bool {
    post.object_field(SOAP_ENTRY_FIELDS).is_some()
}

fn is_community_post(post: &RawPost) -> bool {
    tag_equals(post, TYPE_FIELDS, &["community", "community_post"])
        || post.has_field(COMMUNITY_ID_FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawPost {
        RawPost::new(value)
    }

    fn rule(name: &str) -> &'static Rule {
        rules().iter().find(|r| r.name == name).unwrap()
    }

    /// 各ルールが単体で期待通りに反応するか検証
    #[test]
    fn test_each_rule_in_isolation() {
        struct Case {
            rule: &'static str,
            hit: serde_json::Value,
            miss: serde_json::Value,
        }

        let cases = vec![
            Case {
                rule: "prayer_type_tag",
                hit: json!({ "type": "prayer_request" }),
                miss: json!({ "type": "prayer" }),
            },
            Case {
                rule: "prayer_flag",
                hit: json!({ "is_prayer_request": true }),
                miss: json!({ "isPrayerRequest": false }),
            },
            Case {
                rule: "prayer_signal_field",
                hit: json!({ "isUrgent": false }),
                miss: json!({ "urgent": true }),
            },
            Case {
                rule: "prayer_untitled_category",
                hit: json!({ "category": "healing", "content": "please pray" }),
                miss: json!({ "category": "healing", "content": "x", "title": "t" }),
            },
            Case {
                rule: "soap_type_tag",
                hit: json!({ "subtype": "soap_reflection" }),
                miss: json!({ "type": "soapbox" }),
            },
            Case {
                rule: "soap_nested_entry",
                hit: json!({ "soap_data": { "scripture": "" } }),
                miss: json!({ "soapEntry": null }),
            },
            Case {
                rule: "community_tag",
                hit: json!({ "communityId": 12 }),
                miss: json!({ "type": "communal" }),
            },
        ];

        for case in cases {
            let r = rule(case.rule);
            assert!((r.predicate)(&raw(case.hit)), "{} should match", case.rule);
            assert!(!(r.predicate)(&raw(case.miss)), "{} should not match", case.rule);
        }
    }

    /// 観点: 祈りのリクエスト（タイトルなし・カテゴリあり）
    #[test]
    fn test_prayer_request_record() {
        let post = raw(json!({ "type": "prayer_request", "content": "...", "category": "healing" }));
        assert_eq!(classify(&post), PostKind::Prayer);
    }

    /// 判別子の候補キーが null でも、後続のキーの値で判定する
    #[test]
    fn test_null_tag_falls_through_to_alias() {
        let post = raw(json!({ "type": null, "postType": "prayer_request", "title": "t" }));
        assert_eq!(classify(&post), PostKind::Prayer);

        let post = raw(json!({ "subtype": 3, "sub_type": "soap" }));
        assert_eq!(classify(&post), PostKind::Soap);
    }

    #[test]
    fn test_soap_entry_record() {
        let post = raw(json!({ "soapEntry": { "scripture": "John 3:16" } }));
        assert_eq!(classify(&post), PostKind::Soap);
    }

    /// 祈りの判定は SOAP の判定より優先される
    #[test]
    fn test_prayer_precedes_soap() {
        let post = raw(json!({ "type": "soap", "isAnonymous": true, "content": "x" }));
        assert_eq!(classify(&post), PostKind::Prayer);

        let post = raw(json!({ "soapEntry": {}, "isUrgent": null }));
        assert_eq!(classify(&post), PostKind::Prayer);
    }

    #[test]
    fn test_soap_precedes_community() {
        let post = raw(json!({ "type": "soap", "communityId": 4 }));
        assert_eq!(classify(&post), PostKind::Soap);
    }

    /// 観点: 認識できない形は常に discussion（パニックしない）
    #[test]
    fn test_unrecognized_shapes_default_to_discussion() {
        let shapes = vec![
            json!({}),
            json!(null),
            json!([1, 2, 3]),
            json!("text"),
            json!({ "title": "Hello", "content": "world" }),
            json!({ "type": 5, "isPrayerRequest": "yes" }),
            json!({ "category": "general" }),
        ];

        for shape in shapes {
            assert_eq!(classify(&raw(shape.clone())), PostKind::Discussion, "{}", shape);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let post = raw(json!({ "type": "soap_reflection", "content": "x", "title": "t" }));
        let first = classify(&post);
        for _ in 0..10 {
            assert_eq!(classify(&post), first);
        }
        assert_eq!(first, PostKind::Soap);
    }
}
