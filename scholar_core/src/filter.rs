//! Excluded-domain post-filtering
//!
//! Removes resources whose URL matches any caller-excluded domain. The
//! match is a plain substring check against the whole lowercased URL, not
//! a domain-boundary match: excluding "mit" also drops "ocw.mit.edu".
//! That looseness is intentional and relied upon by callers excluding
//! bare institution names.

use crate::models::Resource;

/// Drop resources whose URL contains any excluded domain.
///
/// `excluded_sites` is a comma-separated domain list; entries are trimmed
/// and lowercased, empty entries are ignored. An empty or whitespace-only
/// list leaves the input untouched. The order of surviving resources is
/// preserved.
pub fn filter_excluded_domains(resources: Vec<Resource>, excluded_sites: &str) -> Vec<Resource> {
    let excluded_domains: Vec<String> = excluded_sites
        .split(',')
        .map(|domain| domain.trim().to_lowercase())
        .filter(|domain| !domain.is_empty())
        .collect();

    if excluded_domains.is_empty() {
        return resources;
    }

    resources
        .into_iter()
        .filter(|resource| {
            let url = resource.url.to_lowercase();
            !excluded_domains.iter().any(|domain| url.contains(domain))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceType;

    fn resource(url: &str) -> Resource {
        Resource {
            resource_type: ResourceType::Website,
            title: url.to_string(),
            source: "Unknown".to_string(),
            url: url.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_filter_single_domain() {
        let resources = vec![
            resource("https://mit.edu/course"),
            resource("https://stanford.edu/course"),
        ];

        let filtered = filter_excluded_domains(resources, "mit.edu");

        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].url.contains("stanford.edu"));
    }

    #[test]
    fn test_filter_multiple_domains() {
        let resources = vec![
            resource("https://mit.edu/course"),
            resource("https://stanford.edu/course"),
            resource("https://berkeley.edu/course"),
        ];

        let filtered = filter_excluded_domains(resources, "mit.edu, stanford.edu");

        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].url.contains("berkeley.edu"));
    }

    #[test]
    fn test_filter_trims_entries() {
        let resources = vec![
            resource("https://mit.edu/course"),
            resource("https://stanford.edu/course"),
        ];

        let filtered = filter_excluded_domains(resources, "  mit.edu  ,  stanford.edu  ");

        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let resources = vec![
            resource("https://MIT.EDU/course"),
            resource("https://stanford.edu/course"),
        ];

        let filtered = filter_excluded_domains(resources, "mit.edu");

        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_filter_matches_substrings() {
        // Excluding "mit" also drops subdomains containing it
        let resources = vec![
            resource("https://ocw.mit.edu/course"),
            resource("https://stanford.edu/course"),
        ];

        let filtered = filter_excluded_domains(resources, "mit");

        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].url.contains("stanford.edu"));
    }

    #[test]
    fn test_empty_excluded_list_is_noop() {
        let resources = vec![
            resource("https://example1.com"),
            resource("https://example2.com"),
        ];

        let filtered = filter_excluded_domains(resources.clone(), "");
        assert_eq!(filtered, resources);

        let filtered = filter_excluded_domains(resources.clone(), "   ");
        assert_eq!(filtered, resources);

        let filtered = filter_excluded_domains(resources.clone(), " , ,");
        assert_eq!(filtered, resources);
    }

    #[test]
    fn test_filter_preserves_order() {
        let resources = vec![
            resource("https://a.example/1"),
            resource("https://khanacademy.org/math"),
            resource("https://b.example/2"),
            resource("https://c.example/3"),
        ];

        let filtered = filter_excluded_domains(resources, "khanacademy.org");

        let urls: Vec<&str> = filtered.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.example/1",
                "https://b.example/2",
                "https://c.example/3"
            ]
        );
    }
}
