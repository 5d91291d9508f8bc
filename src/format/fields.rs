//! Field scanner for a single glossary entry.
//!
//! Lines are classified one at a time and fed to a two-state machine: either
//! nothing is open, or a citation block is collecting continuation lines.

use regex::Regex;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

use super::{CitationKind, FieldBlock, FieldLabel, KeywordEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Field(FieldLabel),
    Citation(CitationKind),
}

static LABEL_PATTERNS: OnceLock<Vec<(Label, Regex)>> = OnceLock::new();
static NUMBER_PREFIX: OnceLock<Regex> = OnceLock::new();

/// Recognised labels in matching priority order, each with a
/// case-insensitive pattern for `<label>:`.
fn label_patterns() -> &'static [(Label, Regex)] {
    LABEL_PATTERNS.get_or_init(|| {
        let fields = FieldLabel::iter().map(|label| (Label::Field(label), label.to_string()));
        let citations = CitationKind::iter().map(|kind| (Label::Citation(kind), kind.label()));
        fields
            .chain(citations)
            .map(|(label, text)| {
                let pattern = format!("(?i){}", regex::escape(&format!("{text}:")));
                (label, Regex::new(&pattern).expect("Invalid label regex pattern"))
            })
            .collect()
    })
}

fn number_prefix() -> &'static Regex {
    NUMBER_PREFIX.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("Invalid number prefix regex pattern"))
}

#[derive(Debug, PartialEq, Eq)]
enum LineClass<'a> {
    Label(Label, String),
    Bullet(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> LineClass<'_> {
    for (label, pattern) in label_patterns() {
        if let Some(found) = pattern.find(line) {
            let value = line[found.end()..].trim().trim_start_matches('*').trim();
            return LineClass::Label(*label, value.to_owned());
        }
    }
    match line.strip_prefix('-') {
        Some(rest) => LineClass::Bullet(rest.trim()),
        None => LineClass::Text(line),
    }
}

#[derive(Debug)]
enum ScanState {
    Idle,
    InCitation {
        kind: CitationKind,
        lines: Vec<String>,
    },
}

impl ScanState {
    fn step(self, line: &str, fields: &mut Vec<FieldBlock>) -> ScanState {
        match (self, classify(line)) {
            (ScanState::InCitation { kind, mut lines }, LineClass::Text(text)) => {
                lines.push(text.to_owned());
                ScanState::InCitation { kind, lines }
            }
            (state, class) => {
                state.close(fields);
                match class {
                    LineClass::Label(Label::Field(label), value) => {
                        fields.push(FieldBlock::Labeled { label, value });
                        ScanState::Idle
                    }
                    LineClass::Label(Label::Citation(kind), value) => {
                        let lines = if value.is_empty() { Vec::new() } else { vec![value] };
                        ScanState::InCitation { kind, lines }
                    }
                    LineClass::Bullet(text) => {
                        fields.push(FieldBlock::Bullet(text.to_owned()));
                        ScanState::Idle
                    }
                    LineClass::Text(text) => {
                        fields.push(FieldBlock::Plain(text.to_owned()));
                        ScanState::Idle
                    }
                }
            }
        }
    }

    fn close(self, fields: &mut Vec<FieldBlock>) {
        if let ScanState::InCitation { kind, lines } = self {
            fields.push(FieldBlock::Citation {
                kind,
                text: lines.join("\n"),
            });
        }
    }
}

/// Parses one raw entry block; its first line is the title.
pub fn parse_entry(block: &str) -> KeywordEntry {
    let mut lines = block.split('\n').map(str::trim);
    let title = lines
        .next()
        .map(|first| number_prefix().replace(first, "").trim().to_owned())
        .unwrap_or_default();

    let mut fields = Vec::new();
    let state = lines.fold(ScanState::Idle, |state, line| state.step(line, &mut fields));
    state.close(&mut fields);

    KeywordEntry { title, fields }
}
