//! Canonical heading taxonomy — the closed vocabulary of résumé section names.
//!
//! The table is data: each canonical label owns an ordered list of surface
//! forms. Matching scans labels in declaration order and the first label with
//! a matching synonym wins, even when a later label would be more specific.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Canonical label → accepted synonyms, in match priority order.
pub const STANDARD_HEADINGS: &[(&str, &[&str])] = &[
    (
        "Objective",
        &["Objective", "Career Objective", "Professional Objective"],
    ),
    (
        "Summary",
        &["Summary", "Professional Summary", "Profile", "About Me"],
    ),
    (
        "Education",
        &["Education", "Academic Background", "Qualifications"],
    ),
    (
        "Experience",
        &[
            "Experience",
            "Work Experience",
            "Professional Experience",
            "Career History",
        ],
    ),
    ("Skills", &["Skills", "Technical Skills", "Core Competencies"]),
    ("Projects", &["Projects", "Key Projects", "Project Work"]),
    ("Certifications", &["Certifications", "Courses", "Licenses"]),
];

static STANDARD: Lazy<HeadingTaxonomy> = Lazy::new(|| {
    HeadingTaxonomy::new(STANDARD_HEADINGS).expect("standard heading taxonomy is valid")
});

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Heading '{0}' has no synonyms")]
    NoSynonyms(String),

    #[error("Heading '{label}' produced an invalid pattern: {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug)]
struct HeadingEntry {
    label: String,
    synonyms: Vec<String>,
    pattern: Regex,
}

/// A compiled taxonomy. A line matches a label when, trimmed, it contains one
/// of the label's synonyms case-insensitively.
#[derive(Debug)]
pub struct HeadingTaxonomy {
    entries: Vec<HeadingEntry>,
}

impl HeadingTaxonomy {
    pub fn new(table: &[(&str, &[&str])]) -> Result<Self, TaxonomyError> {
        let entries = table
            .iter()
            .map(|(label, synonyms)| compile_entry(label, synonyms))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// The built-in résumé taxonomy, compiled once.
    pub fn standard() -> &'static HeadingTaxonomy {
        &STANDARD
    }

    /// Returns the canonical label for a heading line, if any.
    pub fn match_heading(&self, line: &str) -> Option<&str> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.pattern.is_match(line))
            .map(|e| e.label.as_str())
    }

    /// Labels with their synonyms, in match priority order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.label.as_str(), e.synonyms.as_slice()))
    }
}

fn compile_entry(label: &str, synonyms: &[&str]) -> Result<HeadingEntry, TaxonomyError> {
    let synonyms: Vec<String> = synonyms
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if synonyms.is_empty() {
        return Err(TaxonomyError::NoSynonyms(label.to_string()));
    }

    let alternation = synonyms
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");
    let pattern =
        Regex::new(&format!("(?i)(?:{alternation})")).map_err(|source| TaxonomyError::Pattern {
            label: label.to_string(),
            source,
        })?;

    Ok(HeadingEntry {
        label: label.to_string(),
        synonyms,
        pattern,
    })
}
