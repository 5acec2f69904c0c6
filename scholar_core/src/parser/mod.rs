//! Markdown report parsing
//!
//! Turns the agent pipeline's free-text markdown report into structured
//! resource records plus optional textbook metadata. The pipeline's
//! output format varies widely between runs, so extraction is layered:
//! an ordered list of independent strategies is tried and the first one
//! producing any resources wins.
//!
//! Expected primary format:
//!
//! ```text
//! **1. Resource Title** (Type: Open Textbook)
//! - **Link:** https://example.com/resource
//! - **What it covers:** Description here
//! ```
//!
//! Parsing never fails: malformed or empty input yields an empty
//! resource list and no textbook info.

mod extract;
mod strategies;
mod textbook;

use crate::filter::filter_excluded_domains;
use crate::models::{ParsedReport, Resource};
use strategies::{parse_all_links, parse_link_sections, parse_numbered_resources};

/// Extraction strategies in priority order: numbered blocks, then inline
/// link sections, then bare URLs as a last resort.
const STRATEGIES: &[fn(&str) -> Vec<Resource>] = &[
    parse_numbered_resources,
    parse_link_sections,
    parse_all_links,
];

/// Parse a markdown report into resources and textbook metadata.
///
/// `excluded_sites` is an optional comma-separated domain list; matching
/// resources are dropped after extraction. Textbook info is extracted
/// independently of which resource strategy succeeded.
pub fn parse_report(markdown: &str, excluded_sites: Option<&str>) -> ParsedReport {
    let mut resources = first_non_empty(markdown, STRATEGIES);

    if let Some(excluded) = excluded_sites.filter(|sites| !sites.trim().is_empty()) {
        resources = filter_excluded_domains(resources, excluded);
    }

    ParsedReport {
        resources,
        textbook_info: textbook::extract_textbook_info(markdown),
    }
}

/// Run strategies in order, keeping the first non-empty result
fn first_non_empty(markdown: &str, strategies: &[fn(&str) -> Vec<Resource>]) -> Vec<Resource> {
    for strategy in strategies {
        let resources = strategy(markdown);
        if !resources.is_empty() {
            return resources;
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceType;

    #[test]
    fn test_numbered_format_with_types() {
        let markdown = "**1. A** (Type: Open Textbook)\n- **Link:** https://x.com/a\n\
                        **2. B** (Type: Video Lecture)\n- **Link:** https://y.com/b";
        let report = parse_report(markdown, None);

        assert_eq!(report.resources.len(), 2);
        assert_eq!(report.resources[0].resource_type, ResourceType::Textbook);
        assert_eq!(report.resources[0].url, "https://x.com/a");
        assert_eq!(report.resources[1].resource_type, ResourceType::Video);
        assert_eq!(report.resources[1].url, "https://y.com/b");
    }

    #[test]
    fn test_error_narration_is_excluded() {
        let markdown = "\
**1. Valid Resource**
- **Link:** https://example.com/valid
- **What it covers:** Good content

**2. Error Resource**
- **Link:** https://broken.com/page
- **What it covers:** ERROR: Could not fetch https://broken.com/page
";
        let report = parse_report(markdown, None);

        assert_eq!(report.resources.len(), 1);
        assert_eq!(report.resources[0].url, "https://example.com/valid");
    }

    #[test]
    fn test_falls_back_to_link_sections() {
        let markdown = "\
### Recommended Textbooks

[Introduction to Algorithms](https://mitpress.mit.edu/books/introduction-algorithms)
- A thorough treatment of the standard algorithm design techniques

[Algorithms by Sedgewick](https://algs4.cs.princeton.edu/home/)
- A practical companion with Java implementations throughout
";
        let report = parse_report(markdown, None);

        assert_eq!(report.resources.len(), 2);
        assert_eq!(report.resources[0].title, "Introduction to Algorithms");
    }

    #[test]
    fn test_falls_back_to_bare_links() {
        let markdown = "Check out https://example.com/a and https://example.com/b\n";
        let report = parse_report(markdown, None);

        assert_eq!(report.resources.len(), 2);
    }

    #[test]
    fn test_excluded_sites_are_filtered() {
        let markdown = "\
**1. MIT Resource**
- **Link:** https://ocw.mit.edu/courses/

**2. Khan Academy**
- **Link:** https://www.khanacademy.org/math

**3. OpenStax**
- **Link:** https://openstax.org/books
";
        let report = parse_report(markdown, Some("mit.edu, khanacademy.org"));

        assert_eq!(report.resources.len(), 1);
        assert!(report.resources[0].url.contains("openstax.org"));
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let report = parse_report("", None);

        assert!(report.resources.is_empty());
        assert!(report.textbook_info.is_none());
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        let malformed = "\
        **1. Incomplete resource
        - Missing closing
        **2. Another** incomplete
        Random text without structure
        ";
        let report = parse_report(malformed, None);

        // Nothing useful to extract, but the parse completes
        assert!(report.textbook_info.is_none());
        let _ = report.resources;
    }

    #[test]
    fn test_textbook_info_alongside_resources() {
        let markdown = "\
**Textbook:** Calculus, 9th ed., by Stewart

**1. Some Resource**
- **Link:** https://example.com
- **What it covers:** Worked examples for every chapter
";
        let report = parse_report(markdown, None);

        let textbook = report.textbook_info.unwrap();
        assert_eq!(textbook.title.as_deref(), Some("Calculus"));
        assert_eq!(textbook.author.as_deref(), Some("Stewart"));
        assert_eq!(report.resources.len(), 1);
    }

    #[test]
    fn test_unicode_titles_survive() {
        let markdown = "\
**1. 数学教材** (Type: Textbook)
- **Link:** https://example.com/chinese
- **What it covers:** Mathématiques avancées pour les étudiants

**2. Física Resource** (Type: Notes)
- **Link:** https://example.com/spanish
- **What it covers:** Tópicos de física con ejercicios resueltos
";
        let report = parse_report(markdown, None);

        assert_eq!(report.resources.len(), 2);
        assert!(report.resources[0].title.contains("数学"));
        assert_eq!(report.resources[1].resource_type, ResourceType::Notes);
    }

    #[test]
    fn test_urls_with_query_and_fragment() {
        let markdown = "\
**1. Resource with Query**
- **Link:** https://example.com/page?param=value&other=123

**2. Resource with Fragment**
- **Link:** https://example.com/page#section-2
";
        let report = parse_report(markdown, None);

        assert_eq!(report.resources.len(), 2);
        assert!(report.resources[0].url.contains("param=value"));
        assert!(report.resources[1].url.contains("#section-2"));
    }

    #[test]
    fn test_many_resources() {
        let mut markdown = String::new();
        for i in 1..=100 {
            markdown.push_str(&format!(
                "**{i}. Resource {i}**\n- **Link:** https://example{i}.com\n- **What it covers:** Topic {i}\n\n"
            ));
        }

        let report = parse_report(&markdown, None);
        assert_eq!(report.resources.len(), 100);
    }
}
