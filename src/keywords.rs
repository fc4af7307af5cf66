//! Keyword dictionaries for dimension scoring.
//!
//! The dictionaries are data: the built-in table is embedded from
//! `keywords.json`, and a replacement table with the same shape can be loaded
//! from disk. Each dimension's keywords compile into a single case-insensitive
//! alternation of escaped literals, so a keyword matches anywhere inside the
//! review text, including inside longer words.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::dimensions::Dimension;
use crate::error::AnalysisError;

const BUILTIN_KEYWORDS: &str = include_str!("keywords.json");

static BUILTIN_TABLE: Lazy<KeywordTable> = Lazy::new(|| {
    KeywordTable::from_json(BUILTIN_KEYWORDS).expect("embedded keywords.json must be a valid keyword table")
});

#[derive(Debug, Clone)]
pub struct DimensionKeywords {
    pub dimension: Dimension,
    pub keywords: Vec<String>,
    matcher: Regex,
}

impl DimensionKeywords {
    fn new(dimension: Dimension, keywords: Vec<String>) -> Result<Self, AnalysisError> {
        let literals: Vec<String> = keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(k))
            .collect();
        if literals.is_empty() {
            return Err(AnalysisError::InvalidKeywords(format!(
                "dimension '{}' has no keywords",
                dimension.id()
            )));
        }

        let matcher = RegexBuilder::new(&literals.join("|"))
            .case_insensitive(true)
            .build()
            .map_err(|e| AnalysisError::InvalidKeywords(format!("dimension '{}': {}", dimension.id(), e)))?;

        Ok(Self {
            dimension,
            keywords,
            matcher,
        })
    }

    /// True when `text` contains at least one keyword, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// One keyword set per dimension, in declared dimension order.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<DimensionKeywords>,
}

impl KeywordTable {
    /// The embedded dictionaries, shared read-only by every run.
    pub fn builtin() -> &'static KeywordTable {
        &BUILTIN_TABLE
    }

    /// Parses a JSON object mapping dimension ids to keyword arrays.
    /// Every dimension must be present; unknown ids are rejected.
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|e| AnalysisError::InvalidKeywords(e.to_string()))?;

        if let Some(unknown) = raw.keys().find(|id| Dimension::from_id(id).is_none()) {
            return Err(AnalysisError::InvalidKeywords(format!("unknown dimension '{}'", unknown)));
        }

        let mut by_dimension: HashMap<Dimension, Vec<String>> = raw
            .into_iter()
            .filter_map(|(id, keywords)| Dimension::from_id(&id).map(|d| (d, keywords)))
            .collect();

        let entries = Dimension::ALL
            .iter()
            .map(|&dimension| {
                let keywords = by_dimension.remove(&dimension).ok_or_else(|| {
                    AnalysisError::InvalidKeywords(format!("dimension '{}' is missing", dimension.id()))
                })?;
                DimensionKeywords::new(dimension, keywords)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::InvalidKeywords(format!("{}: {}", path.display(), e)))?;
        let table = Self::from_json(&json)?;
        tracing::info!("🔑 Loaded keyword table from {}", path.display());
        Ok(table)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DimensionKeywords> {
        self.entries.iter()
    }

    pub fn get(&self, dimension: Dimension) -> Option<&DimensionKeywords> {
        self.entries.iter().find(|entry| entry.dimension == dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_covers_all_dimensions() {
        let table = KeywordTable::builtin();
        let dims: Vec<Dimension> = table.iter().map(|e| e.dimension).collect();
        assert_eq!(dims, Dimension::ALL.to_vec());
        assert!(table.iter().all(|e| !e.keywords.is_empty()));
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let table = KeywordTable::builtin();
        let gameplay = table.get(Dimension::CoreGameplay).unwrap();
        assert!(gameplay.matches("GREAT GAMEPLAY"));
        // "fun" inside "refund" still counts
        assert!(gameplay.matches("I asked for a refund"));
        assert!(gameplay.matches("玩法很有趣"));
        assert!(!gameplay.matches("boring"));

        let audio = table.get(Dimension::Audio).unwrap();
        assert!(audio.matches("The OST slaps"));
        assert!(!audio.matches("nothing relevant here"));
    }

    #[test]
    fn test_leading_space_keyword_is_literal() {
        let table = KeywordTable::builtin();
        let narrative = table.get(Dimension::Narrative).unwrap();
        assert!(narrative.keywords.iter().any(|k| k == " pacing"));
    }

    #[test]
    fn test_custom_table() {
        let json = r#"{
            "core_gameplay": ["loop"],
            "narrative": ["story"],
            "art_style": ["pixel"],
            "audio": ["music"],
            "user_experience": ["crash"],
            "innovation": ["new"]
        }"#;
        let table = KeywordTable::from_json(json).unwrap();
        assert!(table.get(Dimension::ArtStyle).unwrap().matches("Pixel art"));
        assert!(!table.get(Dimension::ArtStyle).unwrap().matches("drawn"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let json = r#"{
            "core_gameplay": ["a.b"],
            "narrative": ["(story)"],
            "art_style": ["x"],
            "audio": ["y"],
            "user_experience": ["z"],
            "innovation": ["w"]
        }"#;
        let table = KeywordTable::from_json(json).unwrap();
        let gameplay = table.get(Dimension::CoreGameplay).unwrap();
        assert!(gameplay.matches("a.b"));
        assert!(!gameplay.matches("axb"));
        assert!(table.get(Dimension::Narrative).unwrap().matches("the (story) mode"));
    }

    #[test]
    fn test_invalid_tables_rejected() {
        let missing = r#"{"core_gameplay": ["fun"]}"#;
        assert!(matches!(KeywordTable::from_json(missing), Err(AnalysisError::InvalidKeywords(_))));

        let unknown = r#"{
            "core_gameplay": ["fun"], "narrative": ["a"], "art_style": ["b"],
            "audio": ["c"], "user_experience": ["d"], "innovation": ["e"], "price": ["cheap"]
        }"#;
        assert!(KeywordTable::from_json(unknown).is_err());

        let empty = r#"{
            "core_gameplay": [], "narrative": ["a"], "art_style": ["b"],
            "audio": ["c"], "user_experience": ["d"], "innovation": ["e"]
        }"#;
        assert!(KeywordTable::from_json(empty).is_err());
    }
}
