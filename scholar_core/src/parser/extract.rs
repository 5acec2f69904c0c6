//! Field extraction helpers shared by all parsing strategies
//!
//! Each helper tries a small list of patterns in a fixed order and the
//! first match wins. They operate on whatever text span the calling
//! strategy hands them: a bounded resource block or a context window
//! around a link.

use crate::models::title_case;
use once_cell::sync::Lazy;
use regex::Regex;

/// Failure phrases emitted by the upstream pipeline when a fetch breaks.
/// A resource carrying any of these in its url, title or description is
/// narration about a failure, not a resource.
const ERROR_INDICATORS: &[&str] = &[
    "error:",
    "could not fetch",
    "failed to",
    "http error",
    "timed out",
];

static INLINE_LINK_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]\((https?://[^)]+)\)").unwrap());
static LABELED_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Link|URL|Website):(?:\*\*)?\s*(https?://[^\s]+)").unwrap());
static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s)\],>]+").unwrap());

static LABELED_SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Source|Provider|From):(?:\*\*)?\s*([^\n\-*]+)").unwrap());
static PARENTHESIZED_PROVIDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(([^)]*(?:MIT|Stanford|OpenStax|Khan|Coursera|edX|LibreTexts)[^)]*)\)")
        .unwrap()
});
static BARE_PROVIDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:MIT|Stanford|OpenStax|Khan Academy|Coursera|edX|LibreTexts)[^\n\-]*")
        .unwrap()
});

static LABELED_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:What it covers|Description|Best for):(?:\*\*)?\s*([^\n]+)").unwrap()
});
static BULLET_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-•]\s*([^\n]{30,200})").unwrap());

static CONTEXT_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\*\*|##)\s*([^*#\n]+?)(?:\*\*|##|\n|$)").unwrap());
static CONTEXT_LINK_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

static CONTEXT_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Type|Format):\s*([^\n)\-]+)").unwrap());

static DOMAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://(?:www\.)?([^/]+)").unwrap());
static COMMON_TLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(com|org|edu|net|io)$").unwrap());

/// Extract a URL from a text block.
///
/// Tries the inline markdown link form first, then a labeled
/// "Link:"/"URL:"/"Website:" prefix, then any bare URL.
pub(crate) fn extract_url(text: &str) -> Option<String> {
    if let Some(caps) = INLINE_LINK_URL.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    if let Some(caps) = LABELED_URL.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    BARE_URL
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

/// Extract a source/provider name from a text block.
///
/// Tries a labeled "Source:"/"Provider:"/"From:" prefix, then a
/// parenthetical mentioning a known provider, then a bare provider
/// mention.
pub(crate) fn extract_source(text: &str) -> Option<String> {
    if let Some(caps) = LABELED_SOURCE.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    if let Some(caps) = PARENTHESIZED_PROVIDER.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    BARE_PROVIDER
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

/// Extract a description from a text block.
///
/// Tries a labeled "What it covers:"/"Description:"/"Best for:" prefix,
/// then any bulleted line of substantial length.
pub(crate) fn extract_description(text: &str) -> Option<String> {
    if let Some(caps) = LABELED_DESCRIPTION.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    BULLET_DESCRIPTION
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// Extract a title for a bare URL from its surrounding context.
///
/// Looks at the text before the URL for a bold or heading span, then for
/// markdown link text.
pub(crate) fn extract_title_from_context(context: &str, url: &str) -> Option<String> {
    let before_url = &context[..context.find(url)?];

    if let Some(caps) = CONTEXT_TITLE.captures(before_url) {
        return Some(caps[1].trim().to_string());
    }

    CONTEXT_LINK_TEXT
        .captures(before_url)
        .map(|caps| caps[1].trim().to_string())
}

/// Extract an explicit "Type:"/"Format:" label from surrounding context
pub(crate) fn extract_type_from_context(context: &str) -> Option<String> {
    CONTEXT_TYPE
        .captures(context)
        .map(|caps| caps[1].trim().to_string())
}

/// All raw URL occurrences in a text block, in document order
pub(crate) fn find_urls(text: &str) -> Vec<&str> {
    BARE_URL.find_iter(text).map(|m| m.as_str()).collect()
}

/// Extract a cleaned domain name from a URL for use as a source.
///
/// Strips a leading "www." and a common trailing TLD, then title-cases
/// the remainder ("https://ocw.mit.edu/x" becomes "Ocw.Mit").
pub(crate) fn extract_domain(url: &str) -> String {
    match DOMAIN.captures(url) {
        Some(caps) => {
            let domain = COMMON_TLD.replace(&caps[1], "");
            title_case(&domain)
        }
        None => "Unknown".to_string(),
    }
}

/// Check whether any resource field carries a failure phrase
pub(crate) fn contains_error(url: &str, title: &str, description: Option<&str>) -> bool {
    let fields = [url, title, description.unwrap_or("")];

    fields.iter().any(|field| {
        let field_lower = field.to_lowercase();
        ERROR_INDICATORS
            .iter()
            .any(|indicator| field_lower.contains(indicator))
    })
}

/// Slice a byte window out of `text`, clamping both ends to valid UTF-8
/// character boundaries.
pub(crate) fn context_window(text: &str, start: usize, end: usize) -> &str {
    let mut start = start.min(text.len());
    let mut end = end.min(text.len());

    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end += 1;
    }

    &text[start..end]
}
