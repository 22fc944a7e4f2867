//! Section Segmenter — partitions extracted résumé text into canonical sections.

use crate::models::resume::{SectionMap, DEFAULT_SECTION};
use crate::resume::taxonomy::HeadingTaxonomy;

/// Splits text into sections using the standard heading taxonomy.
pub fn split_sections(text: &str) -> SectionMap {
    split_sections_with(text, HeadingTaxonomy::standard())
}

/// Splits text into sections keyed by canonical label.
///
/// A heading line is consumed (never stored as content) and switches the
/// active section. Lines before the first heading land in `General`. A label
/// seen twice resumes its earlier bucket. Sections whose trimmed content is
/// empty are dropped.
pub fn split_sections_with(text: &str, taxonomy: &HeadingTaxonomy) -> SectionMap {
    let mut buckets: Vec<(&str, Vec<&str>)> = vec![(DEFAULT_SECTION, Vec::new())];
    let mut current = 0;

    for line in text.lines() {
        match taxonomy.match_heading(line) {
            Some(label) => {
                current = match buckets.iter().position(|(h, _)| *h == label) {
                    Some(index) => index,
                    None => {
                        buckets.push((label, Vec::new()));
                        buckets.len() - 1
                    }
                };
            }
            None => buckets[current].1.push(line.trim()),
        }
    }

    let mut sections = SectionMap::new();
    for (heading, lines) in buckets {
        sections.insert(heading, lines.join("\n"));
    }

    tracing::debug!(headings = ?sections.headings(), "Segmented résumé text");
    sections
}
