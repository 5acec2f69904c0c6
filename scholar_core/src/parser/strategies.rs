//! Resource extraction strategies
//!
//! Three independent passes over the report text, ordered from the most
//! structured format to the loosest. The combinator in the parent module
//! runs them in order and keeps the first non-empty result.

use crate::models::{Resource, ResourceType};
use crate::parser::extract::{
    contains_error, context_window, extract_description, extract_domain, extract_source,
    extract_title_from_context, extract_type_from_context, extract_url, find_urls,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Bold ordinal marker opening a numbered resource block, with an
/// optional parenthesized type annotation:
/// `**1. Title** (Type: Open Textbook)` or `**Resource 2: Title**`.
static NUMBERED_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(?:\d+\.?|Resource \d+:?)\s+([^*]+?)\*\*(?:\s+\((?:Type:\s*)?([^)]+)\))?")
        .unwrap()
});

/// Marker shape used to bound a block at the next numbered resource
static NEXT_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(?:\d+\.?|Resource \d+)").unwrap());

/// Inline markdown link: `[text](url)`
static INLINE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Link texts that are navigation, not resources
const NAV_LABELS: &[&str] = &["back to top", "top", "home"];

/// Parse the numbered resource format, the pipeline's primary output
/// shape. Each block runs from its ordinal marker to the next one (or the
/// end of the text); url, source and description are extracted from
/// within that span.
pub(crate) fn parse_numbered_resources(content: &str) -> Vec<Resource> {
    let mut resources = Vec::new();

    for caps in NUMBERED_MARKER.captures_iter(content) {
        let title = caps[1].trim().to_string();
        let type_label = caps.get(2).map(|m| m.as_str().trim());

        // Bound the block at the next ordinal marker
        let block_start = caps.get(0).unwrap().end();
        let block_end = NEXT_MARKER
            .find(&content[block_start..])
            .map(|m| block_start + m.start())
            .unwrap_or(content.len());
        let block = &content[block_start..block_end];

        let Some(url) = extract_url(block) else {
            continue;
        };
        let source = extract_source(block);
        let description = extract_description(block);

        if contains_error(&url, &title, description.as_deref()) {
            continue;
        }

        resources.push(Resource {
            resource_type: type_label
                .map(ResourceType::from_label)
                .unwrap_or(ResourceType::Resource),
            title,
            source: source.unwrap_or_else(|| "Unknown".to_string()),
            url,
            description,
        });
    }

    resources
}

/// Parse resources from inline markdown links, skipping navigational
/// links. Source, description and type are inferred from a context window
/// around each link.
pub(crate) fn parse_link_sections(content: &str) -> Vec<Resource> {
    let mut resources = Vec::new();

    for caps in INLINE_LINK.captures_iter(content) {
        let title = caps[1].trim().to_string();
        let url = caps[2].trim().to_string();

        if url.starts_with('#') || NAV_LABELS.contains(&title.to_lowercase().as_str()) {
            continue;
        }

        let whole = caps.get(0).unwrap();
        let context = context_window(
            content,
            whole.start().saturating_sub(200),
            whole.end() + 200,
        );

        let source = extract_source(context);
        let description = extract_description(context);
        let resource_type = extract_type_from_context(context)
            .map(|label| ResourceType::from_label(&label))
            .unwrap_or_else(|| ResourceType::infer_from_url(&url));

        if contains_error(&url, &title, description.as_deref()) {
            continue;
        }

        resources.push(Resource {
            resource_type,
            title,
            source: source.unwrap_or_else(|| "Unknown".to_string()),
            url,
            description,
        });
    }

    resources
}

/// Last resort: every raw URL in the text becomes a basic resource.
/// URLs are deduplicated with their first-occurrence order preserved.
pub(crate) fn parse_all_links(content: &str) -> Vec<Resource> {
    let mut seen = HashSet::new();
    let mut resources = Vec::new();

    for url in find_urls(content) {
        if !seen.insert(url) {
            continue;
        }

        // Context around the first occurrence
        let url_pos = content.find(url).unwrap_or(0);
        let context = context_window(
            content,
            url_pos.saturating_sub(100),
            url_pos + url.len() + 100,
        );

        let title = extract_title_from_context(context, url);
        let source = extract_source(context).unwrap_or_else(|| extract_domain(url));

        if contains_error(url, title.as_deref().unwrap_or(""), None) {
            continue;
        }

        resources.push(Resource {
            resource_type: ResourceType::infer_from_url(url),
            title: title.unwrap_or_else(|| url.to_string()),
            source,
            url: url.to_string(),
            description: None,
        });
    }

    resources
}
