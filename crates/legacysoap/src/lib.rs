//! 構造化スキーマ導入前の SOAP 投稿（HTML 混じりの自由記述）から
//! Scripture / Observation / Application / Prayer を復元する。
//!
//! 入力はユーザーが書いた任意のテキストなので、失敗はせず
//! 復元できなかったフィールドは空文字列になる。

pub mod markup;
pub mod media;
pub mod strategy;

use feed_core::{SoapData, SCRIPTURE_REFERENCE_PLACEHOLDER};
use strategy::{ExtractionStrategy, MarkedUp, PartialSoap, PlainLabels, ReferenceScan, Section};

pub use markup::strip_markup;
pub use media::extract_image_refs;

static STRATEGIES: [&dyn ExtractionStrategy; 3] = [&MarkedUp, &PlainLabels, &ReferenceScan];

/// Runs the strategy pipeline over legacy content. Always returns every
/// field; the reference falls back to "Scripture Reflection".
pub fn extract_legacy_soap(raw: &str) -> SoapData {
    let mut merged = PartialSoap::default();

    for strategy in STRATEGIES {
        if strategy.fallback_only() && merged.attempted {
            continue;
        }

        let partial = strategy.extract(raw);
        tracing::debug!(
            "[legacysoap] {} attempted={} fields={}",
            strategy.name(),
            partial.attempted,
            partial.populated_fields()
        );
        merged.merge_missing(partial);
    }

    into_soap_data(merged)
}

fn into_soap_data(partial: PartialSoap) -> SoapData {
    let section = |s: Section| partial.section(s).unwrap_or_default().to_string();

    SoapData {
        scripture: section(Section::Scripture),
        observation: section(Section::Observation),
        application: section(Section::Application),
        prayer: section(Section::Prayer),
        scripture_reference: partial
            .reference
            .clone()
            .unwrap_or_else(|| SCRIPTURE_REFERENCE_PLACEHOLDER.to_string()),
    }
}

/// Renders the plain `Label:` form of an entry, used when migrating legacy
/// posts to text. The reference goes on its own line ahead of the labels.
pub fn to_plain_text(data: &SoapData) -> String {
    let mut out = String::new();

    let reference = data.scripture_reference.trim();
    if !reference.is_empty() && reference != SCRIPTURE_REFERENCE_PLACEHOLDER {
        out.push_str(reference);
        out.push_str("\n\n");
    }

    let bodies = [
        (Section::Scripture, &data.scripture),
        (Section::Observation, &data.observation),
        (Section::Application, &data.application),
        (Section::Prayer, &data.prayer),
    ];
    for (section, body) in bodies {
        out.push_str(section.label());
        out.push_str(": ");
        out.push_str(body);
        out.push_str("\n\n");
    }

    out.trim_end().to_string()
}
