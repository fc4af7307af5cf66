//! Summary figures over a whole record set.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dataset::RecordSet;
use crate::dimensions::mean;
use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    pub total_reviews: usize,
    /// Mean normalized score (0-10)
    #[schema(example = 8.3)]
    pub mean_score: f64,
    /// Percentage (0-100) of reviews whose original rating reaches the
    /// positive threshold of the scale
    #[schema(example = 73.5)]
    pub positive_ratio: f64,
}

pub fn summarize(records: &RecordSet) -> Result<Summary, AnalysisError> {
    let mean_score = mean(records.iter().map(|r| r.normalized_score())).ok_or(AnalysisError::EmptyDataset)?;

    let scale = records.scale();
    let positive = records.iter().filter(|r| scale.is_positive(r.rating())).count();

    Ok(Summary {
        total_reviews: records.len(),
        mean_score,
        positive_ratio: positive as f64 / records.len() as f64 * 100.0,
    })
}

/// Rounds to one decimal for display.
pub fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
