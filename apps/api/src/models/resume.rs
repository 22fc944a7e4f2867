//! Data model shared by the segmenter, the suggestion extractor and the HTTP layer.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Label for text that precedes the first recognized heading.
pub const DEFAULT_SECTION: &str = "General";

/// Canonical heading → section text, in order of first appearance.
///
/// Serializes as a JSON object. Entries never hold blank content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a section, dropping it when its trimmed content is empty.
    /// Inserting a heading that is already present replaces its content.
    pub fn insert(&mut self, heading: impl Into<String>, content: impl Into<String>) {
        let heading = heading.into();
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, existing)) => *existing = content,
            None => self.entries.push((heading, content)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, heading: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(h, _)| h == heading)
            .map(|(_, c)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, c)| (h.as_str(), c.as_str()))
    }

    pub fn headings(&self) -> Vec<&str> {
        self.entries.iter().map(|(h, _)| h.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ordered(&self.entries, serializer)
    }
}

/// The five fixed evaluation criteria, each worth up to 20 points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    KeywordOptimization,
    ContentStructure,
    AchievementQuantification,
    ActionVerbUsage,
    RelevanceImpact,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::KeywordOptimization,
        Criterion::ContentStructure,
        Criterion::AchievementQuantification,
        Criterion::ActionVerbUsage,
        Criterion::RelevanceImpact,
    ];

    pub const MAX_POINTS: u32 = 20;

    /// Label used both in the prompt and in the model's reply.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::KeywordOptimization => "Keyword Optimization",
            Criterion::ContentStructure => "Content Structure",
            Criterion::AchievementQuantification => "Achievement Quantification",
            Criterion::ActionVerbUsage => "Action Verb Usage",
            Criterion::RelevanceImpact => "Relevance & Impact",
        }
    }
}

/// Per-criterion scores, 0–20 each. Missing criteria stay at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "Keyword Optimization")]
    pub keyword_optimization: u32,
    #[serde(rename = "Content Structure")]
    pub content_structure: u32,
    #[serde(rename = "Achievement Quantification")]
    pub achievement_quantification: u32,
    #[serde(rename = "Action Verb Usage")]
    pub action_verb_usage: u32,
    #[serde(rename = "Relevance & Impact")]
    pub relevance_impact: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::KeywordOptimization => self.keyword_optimization,
            Criterion::ContentStructure => self.content_structure,
            Criterion::AchievementQuantification => self.achievement_quantification,
            Criterion::ActionVerbUsage => self.action_verb_usage,
            Criterion::RelevanceImpact => self.relevance_impact,
        }
    }

    pub fn set(&mut self, criterion: Criterion, points: u32) {
        let points = points.min(Criterion::MAX_POINTS);
        match criterion {
            Criterion::KeywordOptimization => self.keyword_optimization = points,
            Criterion::ContentStructure => self.content_structure = points,
            Criterion::AchievementQuantification => self.achievement_quantification = points,
            Criterion::ActionVerbUsage => self.action_verb_usage = points,
            Criterion::RelevanceImpact => self.relevance_impact = points,
        }
    }

    pub fn total(&self) -> u32 {
        Criterion::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// ATS feedback for one résumé section. Always well-formed, even when the
/// model's reply could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub original_heading: String,
    pub suggested_heading: String,
    /// 0 – 100
    pub ats_score: u32,
    pub score_breakdown: ScoreBreakdown,
    pub recommendations: Vec<String>,
    pub section_preview: String,
}

/// Body of `POST /api/resume/analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    #[serde(serialize_with = "serialize_ordered")]
    pub suggestions: Vec<(String, SuggestionResult)>,
}

/// Writes `(key, value)` pairs as a JSON object, keeping their order.
fn serialize_ordered<S, V>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_map_drops_blank_content() {
        let mut map = SectionMap::new();
        map.insert("General", "   \n  ");
        map.insert("Skills", "Rust");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("General"), None);
        assert_eq!(map.get("Skills"), Some("Rust"));
    }

    #[test]
    fn test_section_map_serializes_as_object_in_order() {
        let mut map = SectionMap::new();
        map.insert("Summary", "Built systems.");
        map.insert("Education", "BS CS 2020");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"Summary":"Built systems.","Education":"BS CS 2020"}"#
        );
    }

    #[test]
    fn test_breakdown_clamps_and_totals() {
        let mut breakdown = ScoreBreakdown::default();
        breakdown.set(Criterion::KeywordOptimization, 35);
        breakdown.set(Criterion::ActionVerbUsage, 12);
        assert_eq!(breakdown.keyword_optimization, 20);
        assert_eq!(breakdown.total(), 32);
    }

    #[test]
    fn test_breakdown_uses_criterion_labels_in_json() {
        let breakdown = ScoreBreakdown {
            relevance_impact: 9,
            ..Default::default()
        };
        let value = serde_json::to_value(breakdown).unwrap();
        assert_eq!(value["Relevance & Impact"], 9);
        assert_eq!(value["Keyword Optimization"], 0);
    }

    #[test]
    fn test_criterion_labels_are_distinct() {
        let mut labels: Vec<_> = Criterion::ALL.iter().map(|c| c.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 5);
    }
}
