//! The analysis pipeline.
//!
//! [`analyze`] runs the classifier, the dimension scorer and the summary over
//! one record set and returns either a complete [`AnalysisResult`] or an
//! error; nothing partial escapes.

use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::dataset::RecordSet;
use crate::dimensions::{score_dimensions, Dimension, DimensionScore};
use crate::error::AnalysisError;
use crate::keywords::KeywordTable;
use crate::sentiment::SentimentDistribution;
use crate::stats::{summarize, Summary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub sentiment_distribution: SentimentDistribution,
    /// One entry per dimension, in declared dimension order
    pub dimension_scores: Vec<DimensionScore>,
    pub summary: Summary,
}

impl AnalysisResult {
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.dimension_scores.iter().find(|s| s.dimension == dimension)
    }
}

pub fn analyze(records: &RecordSet, keywords: &KeywordTable) -> Result<AnalysisResult, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let sentiment_distribution = SentimentDistribution::from_records(records);
    let dimension_scores = score_dimensions(records, keywords)?;
    let summary = summarize(records)?;

    info!(
        "📊 Analysis complete: {} reviews, mean {:.1}/10, {:.1}% positive",
        summary.total_reviews, summary.mean_score, summary.positive_ratio
    );

    Ok(AnalysisResult {
        sentiment_distribution,
        dimension_scores,
        summary,
    })
}
