//! Turns the backend's poem text into HTML fragments.
//!
//! The pipeline is pure and total: any text shape yields a result, at worst
//! with an empty explanation or a single unlabeled glossary block.

pub(crate) mod fields;
pub(crate) mod keywords;
pub(crate) mod render;
pub(crate) mod segmenter;
pub(crate) mod splitter;

use serde::Serialize;
use strum::{Display, EnumIter};

/// Poem text and the glossary section that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    pub poem: String,
    pub explanation: String,
}

/// One annotated glossary term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub title: String,
    pub fields: Vec<FieldBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldBlock {
    Labeled { label: FieldLabel, value: String },
    Citation { kind: CitationKind, text: String },
    Bullet(String),
    Plain(String),
}

/// Single-line labels recognised inside a glossary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum FieldLabel {
    #[strum(serialize = "Chữ Nôm")]
    ChuNom,
    #[strum(serialize = "Giải nghĩa")]
    GiaiNghia,
    #[strum(serialize = "Giải cấu tạo chữ")]
    CauTaoChu,
}

/// Script of a quoted excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum CitationKind {
    #[strum(serialize = "TV")]
    Tv,
    #[strum(serialize = "Nôm")]
    Nom,
}

impl CitationKind {
    pub fn label(self) -> String {
        format!("Trích dẫn ({self})")
    }
}

/// HTML handed to the presentation layer. `explanation_html` is `None` when
/// the response carried no glossary section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPoem {
    pub poem_html: String,
    pub explanation_html: Option<String>,
}

pub fn format_response(raw: &str) -> RenderedPoem {
    let parsed = splitter::split_content(raw, splitter::DEFAULT_MARKERS);
    let keywords = keywords::extract_focus_keywords(&parsed.explanation);
    render::render(&parsed, &keywords)
}
