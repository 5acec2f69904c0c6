//! Data model definitions
//!
//! This module contains the structures exchanged between the broker, the
//! result cache and the report parser: the submission snapshot, parsed
//! resources and the analysis summary stored at the `analysis` cache
//! granularity.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Category of an educational resource.
///
/// The closed set mirrors what the discovery pipeline is asked to find.
/// Labels outside the synonym table are carried verbatim (title-cased) in
/// `Other` so no information from the report is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Textbook,
    Video,
    Course,
    Notes,
    Tutorial,
    Pdf,
    Website,
    /// Generic fallback used when a numbered block has no type annotation
    Resource,
    /// Unrecognized label, title-cased verbatim
    Other(String),
}

/// Synonym table mapping free-text type labels to categories.
///
/// Matched case-insensitively by substring, in order; more specific
/// synonyms come before the generic ones they contain.
const TYPE_SYNONYMS: &[(&str, ResourceType)] = &[
    ("open textbook", ResourceType::Textbook),
    ("textbook", ResourceType::Textbook),
    ("video lecture", ResourceType::Video),
    ("lecture series", ResourceType::Video),
    ("video", ResourceType::Video),
    ("youtube", ResourceType::Video),
    ("course notes", ResourceType::Course),
    ("lecture notes", ResourceType::Notes),
    ("notes", ResourceType::Notes),
    ("tutorial", ResourceType::Tutorial),
    ("interactive tutorial", ResourceType::Tutorial),
    ("course", ResourceType::Course),
    ("pdf", ResourceType::Pdf),
    ("website", ResourceType::Website),
    ("web page", ResourceType::Website),
];

impl ResourceType {
    /// Normalize a free-text type label to a category.
    ///
    /// Falls back to title-casing the label verbatim when no synonym
    /// matches.
    pub fn from_label(label: &str) -> Self {
        let label_lower = label.to_lowercase();

        for (synonym, category) in TYPE_SYNONYMS {
            if label_lower.contains(synonym) {
                return category.clone();
            }
        }

        ResourceType::Other(title_case(label))
    }

    /// Infer a category from the shape of a URL.
    ///
    /// Used when a resource carries no explicit type annotation. The
    /// precedence is fixed: video host, then pdf, then textbook, then
    /// course, then notes/tutorial, then the website fallback.
    pub fn infer_from_url(url: &str) -> Self {
        let url_lower = url.to_lowercase();

        if url_lower.contains("youtube.com") || url_lower.contains("youtu.be") {
            ResourceType::Video
        } else if url_lower.contains("pdf") {
            ResourceType::Pdf
        } else if ["openstax", "textbook", "book"]
            .iter()
            .any(|x| url_lower.contains(x))
        {
            ResourceType::Textbook
        } else if ["course", "lecture", "ocw", "coursera", "edx"]
            .iter()
            .any(|x| url_lower.contains(x))
        {
            ResourceType::Course
        } else if ["notes", "tutorial", "guide"]
            .iter()
            .any(|x| url_lower.contains(x))
        {
            ResourceType::Tutorial
        } else {
            ResourceType::Website
        }
    }

    /// Stable display label for the category
    pub fn label(&self) -> &str {
        match self {
            ResourceType::Textbook => "Textbook",
            ResourceType::Video => "Video",
            ResourceType::Course => "Course",
            ResourceType::Notes => "Notes",
            ResourceType::Tutorial => "Tutorial",
            ResourceType::Pdf => "PDF",
            ResourceType::Website => "Website",
            ResourceType::Resource => "Resource",
            ResourceType::Other(label) => label,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ResourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl Visitor<'_> for LabelVisitor {
            type Value = ResourceType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a resource type label")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ResourceType, E> {
                Ok(match value {
                    "Textbook" => ResourceType::Textbook,
                    "Video" => ResourceType::Video,
                    "Course" => ResourceType::Course,
                    "Notes" => ResourceType::Notes,
                    "Tutorial" => ResourceType::Tutorial,
                    "PDF" => ResourceType::Pdf,
                    "Website" => ResourceType::Website,
                    "Resource" => ResourceType::Resource,
                    other => ResourceType::Other(other.to_string()),
                })
            }
        }

        deserializer.deserialize_str(LabelVisitor)
    }
}

/// A single educational resource extracted from a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub title: String,
    /// Provider name, "Unknown" when no source could be resolved
    pub source: String,
    pub url: String,
    pub description: Option<String>,
}

/// Textbook metadata extracted from a dedicated report section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextbookInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub source: Option<String>,
}

/// Structured output of a report parse pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub resources: Vec<Resource>,
    pub textbook_info: Option<TextbookInfo>,
}

/// Submission snapshot for a discovery run.
///
/// All string fields are optional; empty and whitespace-only values are
/// treated as absent everywhere (cache identity, pipeline inputs). The
/// snapshot is stored verbatim inside cache entries for auditing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryRequest {
    pub university_name: Option<String>,
    pub course_name: Option<String>,
    pub course_url: Option<String>,
    /// Comma-separated topic list
    pub topics_list: Option<String>,
    pub book_title: Option<String>,
    pub book_author: Option<String>,
    pub isbn: Option<String>,
    pub book_url: Option<String>,
    pub desired_resource_types: Option<Vec<String>>,
    /// Comma-separated domains to drop from results
    pub excluded_sites: Option<String>,
    /// Comma-separated domains to prioritize in search
    pub targeted_sites: Option<String>,
    #[serde(default)]
    pub bypass_cache: bool,
}

impl DiscoveryRequest {
    /// Treat empty and whitespace-only strings as absent
    pub(crate) fn present(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Payload stored at the `analysis` cache granularity.
///
/// Course/book understanding is stable across pipeline runs, so only the
/// textbook identification and a bounded slice of the raw report are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub textbook_title: String,
    pub textbook_author: String,
    pub textbook_source: String,
    /// Leading slice of the raw report, capped at 2000 characters
    pub raw_analysis: String,
}

impl AnalysisSummary {
    /// Build the analysis payload from resolved textbook info and the raw
    /// report text.
    pub fn new(textbook: &TextbookInfo, raw_report: &str) -> Self {
        Self {
            textbook_title: textbook.title.clone().unwrap_or_default(),
            textbook_author: textbook.author.clone().unwrap_or_default(),
            textbook_source: textbook.source.clone().unwrap_or_default(),
            raw_analysis: raw_report.chars().take(2000).collect(),
        }
    }
}

/// Capitalize the first letter of every alphabetic run.
///
/// Matches the title-casing applied to unmapped type labels and to domain
/// names used as a source fallback ("ocw.mit" becomes "Ocw.Mit").
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}
