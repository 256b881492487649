//! Document-level statistics shown alongside the metadata.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Reading speed used for `reading_time`.
pub const WORDS_PER_MINUTE: usize = 200;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[[^\]]*\]\(\s*([^)\s]+)[^)]*\)").unwrap());

/// Counts computed from a document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetails {
    pub headings: usize,
    pub paragraphs: usize,
    pub word_count: usize,
    /// Non-whitespace characters.
    pub content: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub images: usize,
    /// Minutes, rounded up.
    pub reading_time: usize,
}

impl ArticleDetails {
    /// Scans a markdown body. Fenced code blocks are skipped.
    pub fn from_body(body: &str) -> Self {
        let mut details = Self::default();
        let mut in_fence = false;
        let mut in_paragraph = false;

        for line in body.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                in_paragraph = false;
                continue;
            }
            if in_fence {
                continue;
            }
            if trimmed.is_empty() {
                in_paragraph = false;
                continue;
            }

            if HEADING.is_match(trimmed) {
                details.headings += 1;
                in_paragraph = false;
            } else if !in_paragraph {
                details.paragraphs += 1;
                in_paragraph = true;
            }

            for caps in LINK.captures_iter(trimmed) {
                let target = caps.get(2).map_or("", |m| m.as_str());
                if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                    details.images += 1;
                } else if target.starts_with("http://") || target.starts_with("https://") {
                    details.external_links += 1;
                } else {
                    details.internal_links += 1;
                }
            }

            let text = trimmed.trim_start_matches('#');
            details.word_count += text
                .split_whitespace()
                .filter(|w| w.chars().any(char::is_alphanumeric))
                .count();
            details.content += text.chars().filter(|c| !c.is_whitespace()).count();
        }

        details.reading_time = details.word_count.div_ceil(WORDS_PER_MINUTE);
        details
    }
}
