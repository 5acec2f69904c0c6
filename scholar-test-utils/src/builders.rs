//! Test data builders for creating report scenarios

use std::fmt::Write;

/// Builder assembling markdown reports in the shapes the pipeline emits
///
/// Sections are rendered in the order they are added, so tests control
/// exactly which parsing strategy fires.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    sections: Vec<String>,
    next_ordinal: usize,
}

impl ReportBuilder {
    /// Create an empty report builder
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            next_ordinal: 1,
        }
    }

    /// Add a bold textbook label line: `**Textbook:** <line>`
    pub fn with_textbook_line(mut self, line: &str) -> Self {
        self.sections.push(format!("**Textbook:** {line}\n"));
        self
    }

    /// Add a numbered resource block with a type annotation
    pub fn with_numbered_resource(mut self, title: &str, type_label: &str, url: &str) -> Self {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let mut block = String::new();
        writeln!(block, "**{ordinal}. {title}** (Type: {type_label})").unwrap();
        writeln!(block, "- **Link:** {url}").unwrap();
        self.sections.push(block);
        self
    }

    /// Add a numbered resource block with a description line
    pub fn with_described_resource(
        mut self,
        title: &str,
        type_label: &str,
        url: &str,
        description: &str,
    ) -> Self {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let mut block = String::new();
        writeln!(block, "**{ordinal}. {title}** (Type: {type_label})").unwrap();
        writeln!(block, "- **Link:** {url}").unwrap();
        writeln!(block, "- **What it covers:** {description}").unwrap();
        self.sections.push(block);
        self
    }

    /// Add an inline markdown link line
    pub fn with_inline_link(mut self, text: &str, url: &str) -> Self {
        self.sections.push(format!("[{text}]({url})\n"));
        self
    }

    /// Add a free-text paragraph
    pub fn with_paragraph(mut self, text: &str) -> Self {
        self.sections.push(format!("{text}\n"));
        self
    }

    /// Render the report
    pub fn build(self) -> String {
        self.sections.join("\n")
    }
}
