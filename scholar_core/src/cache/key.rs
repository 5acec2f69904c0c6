//! Cache key derivation
//!
//! Maps a request plus the current config fingerprint to one
//! deterministic key. Labeled components are assembled in a fixed order,
//! absent fields are skipped, and list-valued fields are normalized
//! (trimmed, empties dropped, sorted) so that reordering or incidental
//! whitespace cannot change the key.

use crate::cache::CacheType;
use crate::models::DiscoveryRequest;
use sha2::{Digest, Sha256};

/// Fixed delimiter between labeled components
const COMPONENT_DELIMITER: &str = "|";

/// Build the deterministic cache key for a request.
///
/// The returned key is the full SHA-256 hex digest of the joined
/// components; equal normalized inputs and fingerprint yield a
/// byte-identical key across processes and machines.
pub fn build_key(request: &DiscoveryRequest, fingerprint: &str) -> String {
    let mut key_parts: Vec<String> = Vec::new();

    // Primary identifiers
    if let Some(course_url) = DiscoveryRequest::present(&request.course_url) {
        key_parts.push(format!("course:{course_url}"));
    }
    if let Some(book_url) = DiscoveryRequest::present(&request.book_url) {
        key_parts.push(format!("book_url:{book_url}"));
    }
    if let (Some(title), Some(author)) = (
        DiscoveryRequest::present(&request.book_title),
        DiscoveryRequest::present(&request.book_author),
    ) {
        key_parts.push(format!("book:{title}|{author}"));
    }
    if let Some(isbn) = DiscoveryRequest::present(&request.isbn) {
        key_parts.push(format!("isbn:{isbn}"));
    }

    // Optional modifiers that affect results
    if let Some(topics_list) = DiscoveryRequest::present(&request.topics_list) {
        let topics = normalize_list(topics_list.split(','));
        if !topics.is_empty() {
            key_parts.push(format!("topics:{}", topics.join(",")));
        }
    }
    if let Some(resource_types) = &request.desired_resource_types {
        let resource_types = normalize_list(resource_types.iter().map(String::as_str));
        if !resource_types.is_empty() {
            key_parts.push(format!("resources:{}", resource_types.join(",")));
        }
    }

    // Config fingerprint invalidates on behavior changes
    key_parts.push(format!("config:{fingerprint}"));

    let key_string = key_parts.join(COMPONENT_DELIMITER);
    format!("{:x}", Sha256::digest(key_string.as_bytes()))
}

/// Prefix a derived key with the cache type label so the two result
/// granularities cannot collide in storage.
pub fn storage_key(cache_type: CacheType, key: &str) -> String {
    format!("{}:{key}", cache_type.label())
}

/// Trim entries, drop empties, sort
fn normalize_list<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut normalized: Vec<&str> = entries.map(str::trim).filter(|e| !e.is_empty()).collect();
    normalized.sort_unstable();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_request(url: &str) -> DiscoveryRequest {
        DiscoveryRequest {
            course_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_key_is_full_hex_digest() {
        let key = build_key(&course_request("https://ocw.mit.edu/courses/math"), "abc123");

        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_is_deterministic() {
        let request = course_request("https://example.com");

        assert_eq!(build_key(&request, "f1"), build_key(&request, "f1"));
    }

    #[test]
    fn test_fingerprint_change_changes_key() {
        let request = course_request("https://example.com");

        assert_ne!(build_key(&request, "hash1"), build_key(&request, "hash2"));
    }

    #[test]
    fn test_topic_order_does_not_matter() {
        let mut a = course_request("https://example.com");
        a.topics_list = Some("algorithms, data structures, sorting".to_string());

        let mut b = course_request("https://example.com");
        b.topics_list = Some("sorting, algorithms, data structures".to_string());

        assert_eq!(build_key(&a, "f"), build_key(&b, "f"));
    }

    #[test]
    fn test_topic_whitespace_does_not_matter() {
        let mut a = course_request("https://example.com");
        a.topics_list = Some("algorithms,sorting".to_string());

        let mut b = course_request("https://example.com");
        b.topics_list = Some("  algorithms ,  sorting  ".to_string());

        assert_eq!(build_key(&a, "f"), build_key(&b, "f"));
    }

    #[test]
    fn test_resource_type_order_does_not_matter() {
        let mut a = course_request("https://example.com");
        a.desired_resource_types = Some(vec!["textbooks".to_string(), "videos".to_string()]);

        let mut b = course_request("https://example.com");
        b.desired_resource_types = Some(vec!["videos".to_string(), "textbooks".to_string()]);

        assert_eq!(build_key(&a, "f"), build_key(&b, "f"));
    }

    #[test]
    fn test_blank_lists_match_absent_lists() {
        let mut with_blanks = course_request("https://example.com");
        with_blanks.topics_list = Some(" , ,".to_string());
        with_blanks.desired_resource_types = Some(vec!["  ".to_string()]);

        let without = course_request("https://example.com");

        assert_eq!(build_key(&with_blanks, "f"), build_key(&without, "f"));
    }

    #[test]
    fn test_book_component_requires_title_and_author() {
        let mut title_only = DiscoveryRequest {
            book_title: Some("Introduction to Algorithms".to_string()),
            ..Default::default()
        };

        let empty = DiscoveryRequest::default();
        assert_eq!(build_key(&title_only, "f"), build_key(&empty, "f"));

        title_only.book_author = Some("Cormen".to_string());
        assert_ne!(build_key(&title_only, "f"), build_key(&empty, "f"));
    }

    #[test]
    fn test_isbn_only_request_keys() {
        let request = DiscoveryRequest {
            isbn: Some("978-0262046305".to_string()),
            ..Default::default()
        };

        let key = build_key(&request, "f");
        assert_eq!(key.len(), 64);
        assert_ne!(key, build_key(&DiscoveryRequest::default(), "f"));
    }

    #[test]
    fn test_empty_request_still_keys() {
        // Only the config component remains
        let key = build_key(&DiscoveryRequest::default(), "f");
        assert_eq!(key.len(), 64);
    }

    #[test]
    fn test_storage_key_separates_granularities() {
        let key = build_key(&course_request("https://example.com"), "f");

        let analysis = storage_key(CacheType::Analysis, &key);
        let full = storage_key(CacheType::Full, &key);

        assert!(analysis.starts_with("analysis:"));
        assert!(full.starts_with("full:"));
        assert_ne!(analysis, full);
    }
}
