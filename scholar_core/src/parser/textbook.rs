//! Textbook metadata extraction
//!
//! Independent of the resource strategies: finds a dedicated textbook
//! section (heading or inline label) and resolves title/author/source
//! from it. Unlabeled "Title, Author" lines go through a small set of
//! heuristics; labeled fields are extracted directly.

use crate::models::TextbookInfo;
use once_cell::sync::Lazy;
use regex::Regex;

/// Section patterns tried in order; the first match anywhere in the
/// report wins. Heading sections run until the next heading or the end
/// of the text, inline labels capture the rest of their line (or the
/// following line when the value wraps).
static SECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?is)#+ Textbook Information[:\n]+(.*?)(?:\n#|$)",
        r"(?is)#+ Course Textbook[:\n]+(.*?)(?:\n#|$)",
        r"(?is)#+ Official Textbook[:\n]+(.*?)(?:\n#|$)",
        r"(?i)\*\*Textbook:\*\*\s*([^\n]+)",
        r"(?i)\*\*Text:\*\*\s*([^\n]+)",
        r"(?i)\*\*Official Textbook:\*\*\s*([^\n]+)",
        r"(?i)(?:Textbook|Text):\s*([^\n]+)",
        r"(?i)(?:Textbook|Text):\s*\n\s*([^\n]+)",
        r"(?i)(?:\*\*Textbook:\*\*|\*\*Text:\*\*)\s*\n\s*([^\n]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Presence of explicit field labels switches off the comma heuristics
static LABELED_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:Title|Author|Source):").unwrap());

static BY_AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)by\s+([^.\n]+)").unwrap());
static EDITION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\d+(?:st|nd|rd|th)\s+ed\.?,?\s*$").unwrap());

static TITLE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\*\*)?(?:Title|Book)[:\s]+\*?\*?([^\n*]+)").unwrap());
static AUTHOR_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\*\*)?Author(?:s)?[:\s]+\*?\*?([^\n*]+)").unwrap());
static SOURCE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\*\*)?Source[:\s]+\*?\*?([^\n*]+)").unwrap());

/// Find and resolve textbook metadata in a report.
///
/// Returns `None` when no recognizable section exists or when neither a
/// title nor an author could be resolved from the matched section.
pub(crate) fn extract_textbook_info(content: &str) -> Option<TextbookInfo> {
    for pattern in SECTION_PATTERNS.iter() {
        let Some(caps) = pattern.captures(content) else {
            continue;
        };
        let section_text = caps[1].trim();

        // Unlabeled "Title, Author" style lines get the comma heuristics
        if section_text.contains(',') && !LABELED_FIELD.is_match(section_text) {
            return Some(split_comma_line(section_text));
        }

        let title = TITLE_FIELD
            .captures(section_text)
            .map(|c| c[1].trim().to_string());
        let author = AUTHOR_FIELD
            .captures(section_text)
            .map(|c| c[1].trim().to_string());
        let source = SOURCE_FIELD
            .captures(section_text)
            .map(|c| c[1].trim().to_string());

        if title.is_some() || author.is_some() {
            return Some(TextbookInfo {
                title,
                author,
                source,
            });
        }
    }

    None
}

/// Split an unlabeled comma-separated textbook line into title and
/// author.
///
/// A "by <name>" suffix is the strongest signal: everything before it is
/// the title, with a trailing edition phrase ("14th ed.,") stripped.
/// Otherwise the line is split at the first comma, and the side holding
/// a colon or more than 30 characters is read as the title; short first
/// tokens are read as an author name list.
fn split_comma_line(section_text: &str) -> TextbookInfo {
    if let Some(caps) = BY_AUTHOR.captures(section_text) {
        let author = caps[1].trim().to_string();
        let title_part = section_text[..caps.get(0).unwrap().start()].trim();
        let title = EDITION_SUFFIX.replace(title_part, "");
        let title = title
            .trim()
            .trim_end_matches(',')
            .trim_end_matches('.')
            .to_string();

        return TextbookInfo {
            title: Some(title),
            author: Some(author),
            source: None,
        };
    }

    let parts: Vec<&str> = section_text.split(',').collect();
    let first = parts[0].trim();
    let rest = parts[1..]
        .iter()
        .map(|part| part.trim())
        .collect::<Vec<_>>()
        .join(", ");
    let rest = rest.trim_end_matches('.').to_string();

    if first.contains(':') || first.chars().count() > 30 {
        TextbookInfo {
            title: Some(first.to_string()),
            author: Some(rest),
            source: None,
        }
    } else {
        TextbookInfo {
            title: Some(rest),
            author: Some(first.to_string()),
            source: None,
        }
    }
}
