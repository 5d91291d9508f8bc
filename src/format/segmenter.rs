use regex::Regex;
use std::sync::OnceLock;

static NUMBERED_ENTRY: OnceLock<Regex> = OnceLock::new();
static WORD_ENTRY: OnceLock<Regex> = OnceLock::new();

fn numbered_entry() -> &'static Regex {
    NUMBERED_ENTRY.get_or_init(|| Regex::new(r"^\d+\.\s+\S").expect("Invalid entry regex pattern"))
}

fn word_entry() -> &'static Regex {
    WORD_ENTRY.get_or_init(|| Regex::new(r"(?i)^Từ:\s+").expect("Invalid entry regex pattern"))
}

/// Explanation text cut into raw glossary entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segments {
    /// No entry heading was found; the whole explanation as one block.
    Unlabeled(String),
    Entries {
        /// Non-blank text that came before the first entry heading.
        preamble: Option<String>,
        entries: Vec<String>,
    },
}

pub fn starts_entry(line: &str) -> bool {
    numbered_entry().is_match(line) || word_entry().is_match(line)
}

/// Groups trimmed explanation lines under the entry heading that precedes
/// them. Blank lines inside an entry are kept.
pub fn segment_entries(explanation: &str) -> Segments {
    let mut preamble: Vec<&str> = Vec::new();
    let mut entries: Vec<Vec<&str>> = Vec::new();

    for line in explanation.split('\n').map(str::trim) {
        if starts_entry(line) {
            entries.push(vec![line]);
        } else if let Some(current) = entries.last_mut() {
            current.push(line);
        } else {
            preamble.push(line);
        }
    }

    if entries.is_empty() {
        return Segments::Unlabeled(explanation.to_owned());
    }

    let preamble = preamble.join("\n").trim().to_owned();
    Segments::Entries {
        preamble: (!preamble.is_empty()).then_some(preamble),
        entries: entries.into_iter().map(|lines| lines.join("\n")).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_lines_open_entries() {
        let segments = segment_entries("1. từ a\ndetail\n2. từ b\ndetail2");
        assert_eq!(
            segments,
            Segments::Entries {
                preamble: None,
                entries: vec!["1. từ a\ndetail".to_string(), "2. từ b\ndetail2".to_string()],
            }
        );
    }

    #[test]
    fn word_prefix_opens_entries_in_any_case() {
        let Segments::Entries { entries, .. } = segment_entries("Từ: nghèu ngao\nx\nTỪ: phảo phộm\ny")
        else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 2);
        assert!(entries[1].starts_with("TỪ: phảo phộm"));
    }

    #[test]
    fn blank_lines_stay_inside_entry() {
        let Segments::Entries { entries, .. } = segment_entries("1. từ\n  dòng một  \n\ndòng hai")
        else {
            panic!("expected entries");
        };
        assert_eq!(entries, vec!["1. từ\ndòng một\n\ndòng hai".to_string()]);
    }

    #[test]
    fn decimals_and_bare_numbers_do_not_open_entries() {
        assert!(!starts_entry("1.5 lạng"));
        assert!(!starts_entry("3. "));
        assert!(!starts_entry("Từ:"));
        assert!(starts_entry("12. câu"));
    }

    #[test]
    fn text_before_first_entry_becomes_preamble() {
        let segments = segment_entries("Các từ đã dùng:\n\n1. nghèu ngao\nnghĩa");
        assert_eq!(
            segments,
            Segments::Entries {
                preamble: Some("Các từ đã dùng:".to_string()),
                entries: vec!["1. nghèu ngao\nnghĩa".to_string()],
            }
        );
    }

    #[test]
    fn unnumbered_explanation_falls_back_to_one_block() {
        let explanation = "Bài thơ dùng từ nghèu ngao.\nKhông có đánh số.";
        assert_eq!(
            segment_entries(explanation),
            Segments::Unlabeled(explanation.to_string())
        );
    }
}
