use itertools::Itertools;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

static KEYWORD_CANDIDATE: OnceLock<Regex> = OnceLock::new();
static EXISTING_MARKUP: OnceLock<Regex> = OnceLock::new();

fn keyword_candidate() -> &'static Regex {
    KEYWORD_CANDIDATE.get_or_init(|| {
        Regex::new(r"^(?:\d+\.\s*)?([\p{L}\p{M}\s'-]+)").expect("Invalid keyword regex pattern")
    })
}

/// Matches markup that emphasis must not touch: whole `<strong>` spans
/// and any other tag.
fn existing_markup() -> &'static Regex {
    EXISTING_MARKUP.get_or_init(|| {
        Regex::new(r"(?is)<strong>.*?</strong>|</?[a-z][^<>]*>").expect("Invalid markup regex pattern")
    })
}

/// Collects the leading word run of every explanation line, deduplicated in
/// first-seen order.
pub fn extract_focus_keywords(explanation: &str) -> Vec<String> {
    explanation
        .split('\n')
        .filter_map(|line| keyword_candidate().captures(line))
        .filter_map(|captures| captures.get(1))
        .map(|candidate| candidate.as_str().trim().to_owned())
        .filter(|keyword| !keyword.is_empty())
        .unique()
        .collect()
}

/// Wraps whole-word, case-insensitive keyword occurrences in `<strong>`.
///
/// Keywords of a single character are ignored. Text already inside markup
/// is copied through, so the output can be fed back in unchanged.
pub fn emphasize(poem: &str, keywords: &[String]) -> String {
    let Some(matcher) = keyword_matcher(keywords) else {
        return poem.to_owned();
    };

    let mut html = String::with_capacity(poem.len());
    let mut last_end = 0;
    for markup in existing_markup().find_iter(poem) {
        html.push_str(&matcher.replace_all(&poem[last_end..markup.start()], "<strong>$0</strong>"));
        html.push_str(markup.as_str());
        last_end = markup.end();
    }
    html.push_str(&matcher.replace_all(&poem[last_end..], "<strong>$0</strong>"));
    html
}

fn keyword_matcher(keywords: &[String]) -> Option<Regex> {
    let alternatives = keywords
        .iter()
        .filter(|keyword| keyword.chars().count() > 1)
        .map(|keyword| regex::escape(keyword))
        .join("|");
    if alternatives.is_empty() {
        return None;
    }

    match Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")) {
        Ok(matcher) => Some(matcher),
        Err(err) => {
            warn!(error = %err, "Could not build keyword matcher, poem left unemphasized");
            None
        }
    }
}
