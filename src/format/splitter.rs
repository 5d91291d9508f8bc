use regex::Regex;
use std::sync::OnceLock;

use super::ParsedContent;

/// Headings that open the glossary section, most specific first.
pub const DEFAULT_MARKERS: &[&str] = &[
    "**CHÚ GIẢI**",
    "CHÚ GIẢI",
    "---",
    "**Chú giải**",
    "Chú giải",
];

static LEADING_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn leading_separator() -> &'static Regex {
    LEADING_SEPARATOR
        .get_or_init(|| Regex::new(r"^[-*]+\s*").expect("Invalid separator regex pattern"))
}

/// Splits `text` at the first marker, taking markers in list order.
///
/// A marker earlier in `markers` wins even when a later one occurs earlier in
/// the text. The marker itself and any `-`/`*` rule right after it are not
/// part of the explanation.
pub fn split_content(text: &str, markers: &[&str]) -> ParsedContent {
    let found = markers
        .iter()
        .find_map(|marker| text.find(marker).map(|index| (index, *marker)));

    let Some((index, marker)) = found else {
        return ParsedContent {
            poem: text.trim().to_owned(),
            explanation: String::new(),
        };
    };

    let poem = text[..index].trim().to_owned();
    let explanation = text[index + marker.len()..].trim();
    let explanation = leading_separator()
        .replace(explanation, "")
        .trim()
        .to_owned();

    ParsedContent { poem, explanation }
}
