//! Extraction strategies for legacy SOAP text.
//!
//! Each strategy reports what it could recover as a [`PartialSoap`]. The
//! pipeline in `lib.rs` takes every field from the first strategy that
//! populates it.

use crate::markup::strip_markup;
use regex::Regex;
use std::sync::OnceLock;

static LABEL_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
static HEADING_MARKER_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
static PLAIN_LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();
static REFERENCE_LINE_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Scripture,
    Observation,
    Application,
    Prayer,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Scripture,
        Section::Observation,
        Section::Application,
        Section::Prayer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scripture => "Scripture",
            Self::Observation => "Observation",
            Self::Application => "Application",
            Self::Prayer => "Prayer",
        }
    }

    /// 旧フォーマットで各セクションの見出しに付いていた絵文字
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Self::Scripture => &["📖"],
            Self::Observation => &["🔍"],
            Self::Application => &["💡", "✍️", "✍"],
            Self::Prayer => &["🙏"],
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Scripture => 0,
            Self::Observation => 1,
            Self::Application => 2,
            Self::Prayer => 3,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.label().eq_ignore_ascii_case(label))
    }
}

/// ある戦略が復元できた部分的な結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialSoap {
    sections: [Option<String>; 4],
    pub reference: Option<String>,
    /// The strategy recognised its form in the input at all.
    pub attempted: bool,
}

impl PartialSoap {
    pub fn section(&self, section: Section) -> Option<&str> {
        self.sections[section.index()].as_deref()
    }

    /// Empty captures are not recorded; they must not block later strategies.
    pub fn set_section(&mut self, section: Section, text: String) {
        let slot = &mut self.sections[section.index()];
        if slot.is_none() && !text.is_empty() {
            *slot = Some(text);
        }
    }

    pub fn set_reference(&mut self, reference: &str) {
        let reference = reference.trim();
        if self.reference.is_none() && !reference.is_empty() {
            self.reference = Some(reference.to_string());
        }
    }

    /// 未設定のフィールドだけを `other` から埋める
    pub fn merge_missing(&mut self, other: PartialSoap) {
        for (slot, incoming) in self.sections.iter_mut().zip(other.sections) {
            if slot.is_none() {
                *slot = incoming;
            }
        }
        if self.reference.is_none() {
            self.reference = other.reference;
        }
        self.attempted |= other.attempted;
    }

    pub fn populated_fields(&self) -> usize {
        self.sections.iter().filter(|s| s.is_some()).count() + usize::from(self.reference.is_some())
    }
}

pub trait ExtractionStrategy: Sync {
    fn name(&self) -> &'static str;

    /// Fallback strategies only run when no earlier strategy recognised its
    /// form in the input.
    fn fallback_only(&self) -> bool {
        false
    }

    fn extract(&self, raw: &str) -> PartialSoap;
}

const REFERENCE_PATTERN: &str = r"(?:[1-3]\s?)?[A-Za-z]+\s\d+:\d+(?:-\d+)?";

/// `<1-3 optional><Letters> <digits>:<digits>[-<digits>]`
pub fn reference_regex() -> &'static Regex {
    REFERENCE_REGEX.get_or_init(|| Regex::new(REFERENCE_PATTERN).unwrap())
}

/// A line consisting of nothing but a reference.
fn reference_line_regex() -> &'static Regex {
    REFERENCE_LINE_REGEX.get_or_init(|| Regex::new(&format!(r"^{}$", REFERENCE_PATTERN)).unwrap())
}

fn label_regexes() -> &'static [Regex] {
    LABEL_REGEXES.get_or_init(|| {
        Section::ALL
            .iter()
            .map(|section| {
                // Bold marker around the label, colon inside or right after it.
                let pattern = format!(
                    r"(?i)(?:<(?:strong|b)\b[^>]*>|\*\*)\s*{}\s*(?::\s*(?:</(?:strong|b)\s*>|\*\*)|(?:</(?:strong|b)\s*>|\*\*)\s*:)",
                    section.label()
                );
                Regex::new(&pattern).unwrap()
            })
            .collect()
    })
}

/// Section emoji used as a heading: at the start of the text or of a line,
/// optionally behind opening tags. An emoji mid-sentence is body text.
fn heading_marker_regexes() -> &'static [Regex] {
    HEADING_MARKER_REGEXES.get_or_init(|| {
        Section::ALL
            .iter()
            .map(|section| {
                let markers: Vec<String> = section.markers().iter().map(|m| regex::escape(m)).collect();
                let pattern = format!(
                    r"(?i)(?:^|\n|<br\s*/?>|</(?:p|div|li)\s*>)[ \t]*(?:<[A-Za-z][^>]*>[ \t]*)*(?:{})",
                    markers.join("|")
                );
                Regex::new(&pattern).unwrap()
            })
            .collect()
    })
}

/// 太字マーカー付きの見出し（`<strong>Scripture</strong>:` など）から各セクションを取り出す
pub struct MarkedUp;

impl MarkedUp {
    /// The capture ends at the nearest of: another section's bold label, or
    /// the heading emoji of a section that comes later in entry order.
    fn section_end(raw: &str, start: usize, current: Section) -> usize {
        let labels = label_regexes();
        let headings = heading_marker_regexes();

        let next_label = Section::ALL
            .iter()
            .filter(|other| **other != current)
            .filter_map(|other| labels[other.index()].find_at(raw, start))
            .map(|m| m.start());

        let next_heading = Section::ALL
            .iter()
            .filter(|other| other.index() > current.index())
            .filter_map(|other| headings[other.index()].find_at(raw, start))
            .map(|m| m.start());

        next_label.chain(next_heading).min().unwrap_or(raw.len())
    }
}

impl ExtractionStrategy for MarkedUp {
    fn name(&self) -> &'static str {
        "marked_up"
    }

    fn extract(&self, raw: &str) -> PartialSoap {
        let mut partial = PartialSoap::default();
        let regexes = label_regexes();

        for section in Section::ALL {
            let Some(label) = regexes[section.index()].find(raw) else {
                continue;
            };
            partial.attempted = true;

            let end = Self::section_end(raw, label.end(), section);
            let text = strip_markup(&raw[label.end()..end]);

            if section == Section::Scripture {
                let (reference, body) = split_reference_line(&text);
                if let Some(reference) = reference {
                    partial.set_reference(reference);
                }
                partial.set_section(section, body.to_string());
            } else {
                partial.set_section(section, text);
            }
        }

        partial
    }
}

/// If a multi-line scripture capture opens with a line that is only a
/// reference, split it off. Otherwise the whole capture is the body.
fn split_reference_line(text: &str) -> (Option<&str>, &str) {
    let Some((first, rest)) = text.split_once('\n') else {
        return (None, text);
    };

    let first = first.trim();
    if reference_line_regex().is_match(first) {
        (Some(first), rest.trim())
    } else {
        (None, text)
    }
}

/// 行頭の `Label:` で区切られた装飾のないテキストを分割する（フォールバック）
pub struct PlainLabels;

impl ExtractionStrategy for PlainLabels {
    fn name(&self) -> &'static str {
        "plain_labels"
    }

    fn fallback_only(&self) -> bool {
        true
    }

    fn extract(&self, raw: &str) -> PartialSoap {
        let boundary = PLAIN_LABEL_REGEX.get_or_init(|| {
            Regex::new(r"(?im)^[ \t]*(scripture|observation|application|prayer)[ \t]*:").unwrap()
        });

        let mut partial = PartialSoap::default();
        let labels: Vec<(Section, usize, usize)> = boundary
            .captures_iter(raw)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let section = Section::from_label(caps.get(1)?.as_str())?;
                Some((section, whole.start(), whole.end()))
            })
            .collect();

        for (i, (section, _, body_start)) in labels.iter().enumerate() {
            partial.attempted = true;
            let body_end = labels.get(i + 1).map(|(_, start, _)| *start).unwrap_or(raw.len());
            partial.set_section(*section, strip_markup(&raw[*body_start..body_end]));
        }

        partial
    }
}

/// 本文中の最初の聖書箇所表記を拾う
pub struct ReferenceScan;

impl ExtractionStrategy for ReferenceScan {
    fn name(&self) -> &'static str {
        "reference_scan"
    }

    fn extract(&self, raw: &str) -> PartialSoap {
        let mut partial = PartialSoap::default();
        if let Some(m) = reference_regex().find(raw) {
            partial.attempted = true;
            partial.set_reference(m.as_str());
        }
        partial
    }
}
