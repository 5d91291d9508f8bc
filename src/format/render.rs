use tracing::debug;

use super::fields::parse_entry;
use super::keywords::emphasize;
use super::segmenter::{Segments, segment_entries};
use super::{FieldBlock, KeywordEntry, ParsedContent, RenderedPoem};

pub fn render(parsed: &ParsedContent, keywords: &[String]) -> RenderedPoem {
    let poem_html = emphasize(&parsed.poem, keywords);
    let explanation_html =
        (!parsed.explanation.is_empty()).then(|| render_explanation(&parsed.explanation));

    RenderedPoem {
        poem_html,
        explanation_html,
    }
}

/// Renders the glossary. Line breaks inside fields become `<br>` once the
/// whole fragment is assembled.
pub fn render_explanation(explanation: &str) -> String {
    match segment_entries(explanation) {
        Segments::Unlabeled(text) => {
            debug!("Explanation has no numbered entries, rendering as one block");
            detail(&escape_html(&text))
        }
        Segments::Entries { preamble, entries } => {
            debug!(entries = entries.len(), "Rendering glossary entries");
            let mut html = String::new();
            if let Some(preamble) = preamble {
                html.push_str(&detail(&escape_html(&preamble)));
            }
            for block in &entries {
                write_entry(&mut html, &parse_entry(block));
            }
            html.replace('\n', "<br>")
        }
    }
}

fn write_entry(html: &mut String, entry: &KeywordEntry) {
    html.push_str(&format!(
        r#"<div class="keyword-item"><h4>{}</h4>"#,
        escape_html(&entry.title)
    ));
    for field in &entry.fields {
        write_field(html, field);
    }
    html.push_str("</div>");
}

fn write_field(html: &mut String, field: &FieldBlock) {
    match field {
        FieldBlock::Labeled { label, value } => {
            html.push_str(&format!(
                r#"<div class="keyword-detail"><span class="explanation-label">{}:</span> {}</div>"#,
                label,
                escape_html(value)
            ));
        }
        FieldBlock::Citation { kind, text } => {
            html.push_str(&format!(
                r#"<div class="keyword-detail"><span class="explanation-label">{}:</span></div><div class="keyword-citation">{}</div>"#,
                kind.label(),
                escape_html(text)
            ));
        }
        FieldBlock::Bullet(text) | FieldBlock::Plain(text) => {
            html.push_str(&detail(&escape_html(text)));
        }
    }
}

fn detail(inner: &str) -> String {
    format!(r#"<div class="keyword-detail">{inner}</div>"#)
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
