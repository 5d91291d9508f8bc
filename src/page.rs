//! Standalone HTML page around the formatter's fragments.

use crate::format::RenderedPoem;
use crate::format::render::escape_html;

pub const DEFAULT_STYLESHEET: &str = r#"
body{font-family:Georgia,'Times New Roman',serif;background:#f7f1e3;color:#3b2a1a;max-width:760px;margin:40px auto;padding:0 20px}
h1{font-size:26px;color:#7a1f1f;text-align:center}
.poem{white-space:pre-line;font-size:20px;line-height:1.8;text-align:center;padding:24px;background:#fffaf0;border:1px solid #d9c7a3;border-radius:8px}
.poem strong{color:#7a1f1f}
h2{font-size:20px;color:#7a1f1f;margin-top:32px}
.keyword-item{padding:12px 16px;margin:12px 0;background:#fffaf0;border-left:4px solid #b08d57;border-radius:4px}
.keyword-item h4{margin:0 0 8px;font-size:18px}
.keyword-detail{margin:4px 0;white-space:pre-line}
.explanation-label{font-weight:bold}
.keyword-citation{margin:4px 0 8px 16px;padding-left:12px;border-left:2px solid #d9c7a3;font-style:italic}
.error-message{padding:12px 16px;background:#fde8e8;border:1px solid #e0a0a0;color:#8a1c1c;border-radius:6px}
"#;

/// Everything the page needs besides the fragments themselves.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub topic: &'a str,
    pub stylesheet: &'a str,
}

impl<'a> PageContext<'a> {
    pub fn new(topic: &'a str) -> Self {
        Self {
            topic,
            stylesheet: DEFAULT_STYLESHEET,
        }
    }

    pub fn title(&self) -> String {
        format!("Thơ về {}", self.topic)
    }

    /// The explanation section is left out when the poem came without one.
    pub fn render_poem_page(&self, rendered: &RenderedPoem) -> String {
        let explanation = rendered
            .explanation_html
            .as_deref()
            .map(|html| {
                format!(
                    r#"<section id="explanation-section"><h2>Chú giải</h2><div id="explanation-content">{html}</div></section>"#
                )
            })
            .unwrap_or_default();

        self.document(&format!(
            r#"<section id="output-section"><div id="output" class="poem">{}</div></section>{explanation}"#,
            rendered.poem_html
        ))
    }

    pub fn render_error_page(&self, message: &str) -> String {
        self.document(&format!(
            r#"<div id="error-message" class="error-message">{}</div>"#,
            escape_html(message)
        ))
    }

    fn document(&self, body: &str) -> String {
        let title = escape_html(&self.title());
        format!(
            r#"<!DOCTYPE html>
<html lang="vi">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>{stylesheet}</style>
</head>
<body>
<h1 class="output-title">{title}</h1>
{body}
</body>
</html>
"#,
            stylesheet = self.stylesheet,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poem_page_has_topic_title_and_both_sections() {
        let rendered = RenderedPoem {
            poem_html: "<strong>mây</strong> trôi".to_string(),
            explanation_html: Some(r#"<div class="keyword-item"><h4>mây</h4></div>"#.to_string()),
        };
        let page = PageContext::new("mùa thu").render_poem_page(&rendered);

        assert!(page.contains("<title>Thơ về mùa thu</title>"));
        assert!(page.contains(r#"<div id="output" class="poem"><strong>mây</strong> trôi</div>"#));
        assert!(page.contains(r#"<div id="explanation-content"><div class="keyword-item">"#));
    }

    #[test]
    fn explanation_section_is_omitted_without_glossary() {
        let rendered = RenderedPoem {
            poem_html: "Thu về".to_string(),
            explanation_html: None,
        };
        let page = PageContext::new("mùa thu").render_poem_page(&rendered);

        assert!(page.contains("Thu về"));
        assert!(!page.contains("explanation-section"));
    }

    #[test]
    fn topic_and_error_are_escaped() {
        let context = PageContext::new("<b>thu</b>");
        let page = context.render_error_page("lỗi <x>");

        assert!(page.contains("<title>Thơ về &lt;b&gt;thu&lt;/b&gt;</title>"));
        assert!(page.contains(r#"<div id="error-message" class="error-message">lỗi &lt;x&gt;</div>"#));
    }

    #[test]
    fn unlabeled_glossary_keeps_its_line_breaks() {
        let rendered = crate::format::format_response(
            "Mây trôi\nCHÚ GIẢI\nnghèu ngao\n- Chữ Nôm: 𠰉嗷\n- Giải nghĩa: ngông nghênh",
        );
        let page = PageContext::new("mùa thu").render_poem_page(&rendered);

        assert!(page.contains(
            "<div class=\"keyword-detail\">nghèu ngao\n- Chữ Nôm: 𠰉嗷\n- Giải nghĩa: ngông nghênh</div>"
        ));
        assert!(page.contains(".keyword-detail{margin:4px 0;white-space:pre-line}"));
    }

    #[test]
    fn custom_stylesheet_replaces_default() {
        let context = PageContext {
            topic: "mùa thu",
            stylesheet: "body{color:red}",
        };
        let page = context.render_error_page("x");
        assert!(page.contains("<style>body{color:red}</style>"));
        assert!(!page.contains(".keyword-item"));
    }
}
