//! Keyword-driven dimension scoring.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dataset::RecordSet;
use crate::error::AnalysisError;
use crate::keywords::KeywordTable;

/// The six qualitative aspects a product is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CoreGameplay,
    Narrative,
    ArtStyle,
    Audio,
    UserExperience,
    Innovation,
}

impl Dimension {
    /// Declared order; also the radar chart axis order.
    pub const ALL: [Dimension; 6] = [
        Dimension::CoreGameplay,
        Dimension::Narrative,
        Dimension::ArtStyle,
        Dimension::Audio,
        Dimension::UserExperience,
        Dimension::Innovation,
    ];

    /// Stable identifier used in keyword files and JSON.
    pub fn id(&self) -> &'static str {
        match self {
            Dimension::CoreGameplay => "core_gameplay",
            Dimension::Narrative => "narrative",
            Dimension::ArtStyle => "art_style",
            Dimension::Audio => "audio",
            Dimension::UserExperience => "user_experience",
            Dimension::Innovation => "innovation",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::CoreGameplay => "core gameplay",
            Dimension::Narrative => "narrative",
            Dimension::ArtStyle => "art style",
            Dimension::Audio => "audio",
            Dimension::UserExperience => "user experience",
            Dimension::Innovation => "innovation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DimensionScore {
    pub dimension: Dimension,
    /// Mean normalized score of matching reviews, or of all reviews when
    /// nothing matched
    #[schema(example = 8.4)]
    pub mean_score: f64,
    /// Number of reviews mentioning at least one keyword
    pub match_count: usize,
}

/// Scores every dimension of `keywords` against `records`.
///
/// A dimension without any matching review takes the mean of the whole set
/// with `match_count == 0`. Results follow the table's dimension order.
pub fn score_dimensions(records: &RecordSet, keywords: &KeywordTable) -> Result<Vec<DimensionScore>, AnalysisError> {
    let overall = mean(records.iter().map(|r| r.normalized_score())).ok_or(AnalysisError::EmptyDataset)?;

    let scores = keywords
        .iter()
        .map(|entry| {
            let matched: Vec<f64> = records
                .iter()
                .filter(|r| entry.matches(r.text()))
                .map(|r| r.normalized_score())
                .collect();

            let score = match mean(matched.iter().copied()) {
                Some(mean_score) => DimensionScore {
                    dimension: entry.dimension,
                    mean_score,
                    match_count: matched.len(),
                },
                None => DimensionScore {
                    dimension: entry.dimension,
                    mean_score: overall,
                    match_count: 0,
                },
            };
            tracing::debug!(
                "{}: {:.2} over {} matching reviews",
                entry.dimension.id(),
                score.mean_score,
                score.match_count
            );
            score
        })
        .collect();

    Ok(scores)
}

/// Arithmetic mean, `None` for an empty sequence.
pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingScale;

    fn table() -> KeywordTable {
        KeywordTable::from_json(
            r#"{
                "core_gameplay": ["gameplay", "fun"],
                "narrative": ["story"],
                "art_style": ["art"],
                "audio": ["music"],
                "user_experience": ["crash"],
                "innovation": ["unique"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_mean_over_matching_reviews() {
        let set = RecordSet::from_pairs(
            [("Fun gameplay", 5.0), ("great story", 4.0), ("story was fun", 2.0), ("meh", 1.0)],
            RatingScale::default(),
        );
        let scores = score_dimensions(&set, &table()).unwrap();

        let gameplay = scores[0];
        assert_eq!(gameplay.dimension, Dimension::CoreGameplay);
        assert_eq!(gameplay.match_count, 2);
        assert_eq!(gameplay.mean_score, 7.0);

        let narrative = scores[1];
        assert_eq!(narrative.match_count, 2);
        assert_eq!(narrative.mean_score, 6.0);
    }

    #[test]
    fn test_unmatched_dimension_falls_back_to_global_mean() {
        let set = RecordSet::from_pairs([("Fun gameplay", 5.0), ("meh", 2.0)], RatingScale::default());
        let scores = score_dimensions(&set, &table()).unwrap();

        let audio = scores.iter().find(|s| s.dimension == Dimension::Audio).unwrap();
        assert_eq!(audio.match_count, 0);
        assert_eq!(audio.mean_score, 7.0);
    }

    #[test]
    fn test_substring_inside_word_matches() {
        let set = RecordSet::from_pairs([("the artwork", 4.0), ("heartfelt", 3.0)], RatingScale::default());
        let scores = score_dimensions(&set, &table()).unwrap();
        let art = scores.iter().find(|s| s.dimension == Dimension::ArtStyle).unwrap();
        assert_eq!(art.match_count, 2);
    }

    #[test]
    fn test_order_follows_declared_dimensions() {
        let set = RecordSet::from_pairs([("x", 3.0)], RatingScale::default());
        let scores = score_dimensions(&set, KeywordTable::builtin()).unwrap();
        let dims: Vec<Dimension> = scores.iter().map(|s| s.dimension).collect();
        assert_eq!(dims, Dimension::ALL.to_vec());
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let set = RecordSet::new(Vec::new(), RatingScale::default());
        assert!(matches!(score_dimensions(&set, &table()), Err(AnalysisError::EmptyDataset)));
    }

    #[test]
    fn test_dimension_ids_round_trip() {
        for dim in Dimension::ALL {
            assert_eq!(Dimension::from_id(dim.id()), Some(dim));
        }
        assert_eq!(Dimension::from_id("price"), None);
    }
}
