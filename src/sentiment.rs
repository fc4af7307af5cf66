//! Rating-based sentiment bands.
//!
//! Each review falls into exactly one of five ordered bands, decided by its
//! normalized (0-10) score alone.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dataset::RecordSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentimentBand {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentBand {
    /// Declared order, most positive first.
    pub const ALL: [SentimentBand; 5] = [
        SentimentBand::VeryPositive,
        SentimentBand::Positive,
        SentimentBand::Neutral,
        SentimentBand::Negative,
        SentimentBand::VeryNegative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBand::VeryPositive => "very positive",
            SentimentBand::Positive => "positive",
            SentimentBand::Neutral => "neutral",
            SentimentBand::Negative => "negative",
            SentimentBand::VeryNegative => "very negative",
        }
    }

    fn index(&self) -> usize {
        match self {
            SentimentBand::VeryPositive => 0,
            SentimentBand::Positive => 1,
            SentimentBand::Neutral => 2,
            SentimentBand::Negative => 3,
            SentimentBand::VeryNegative => 4,
        }
    }
}

/// Maps a normalized score onto its band. Lower bounds are inclusive.
pub fn classify(score: f64) -> SentimentBand {
    if score >= 9.0 {
        SentimentBand::VeryPositive
    } else if score >= 7.0 {
        SentimentBand::Positive
    } else if score >= 5.0 {
        SentimentBand::Neutral
    } else if score >= 3.0 {
        SentimentBand::Negative
    } else {
        SentimentBand::VeryNegative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BandCount {
    pub band: SentimentBand,
    pub count: usize,
}

/// Review counts for all five bands, zero counts included, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SentimentDistribution(Vec<BandCount>);

impl SentimentDistribution {
    pub fn from_records(records: &RecordSet) -> Self {
        let mut counts = [0usize; 5];
        for record in records {
            counts[classify(record.normalized_score()).index()] += 1;
        }
        Self(
            SentimentBand::ALL
                .iter()
                .map(|&band| BandCount {
                    band,
                    count: counts[band.index()],
                })
                .collect(),
        )
    }

    pub fn count(&self, band: SentimentBand) -> usize {
        self.0
            .iter()
            .find(|entry| entry.band == band)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|entry| entry.count).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BandCount> {
        self.0.iter()
    }

    /// Share of `band` in percent of all classified reviews.
    pub fn percentage(&self, band: SentimentBand) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(band) as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingScale;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify(10.0), SentimentBand::VeryPositive);
        assert_eq!(classify(9.0), SentimentBand::VeryPositive);
        assert_eq!(classify(8.999), SentimentBand::Positive);
        assert_eq!(classify(7.0), SentimentBand::Positive);
        assert_eq!(classify(6.999), SentimentBand::Neutral);
        assert_eq!(classify(5.0), SentimentBand::Neutral);
        assert_eq!(classify(4.999), SentimentBand::Negative);
        assert_eq!(classify(3.0), SentimentBand::Negative);
        assert_eq!(classify(2.999), SentimentBand::VeryNegative);
        assert_eq!(classify(0.0), SentimentBand::VeryNegative);
    }

    #[test]
    fn test_bands_partition_score_range() {
        // every score in [0, 10] lands in exactly one band and the band
        // sequence never moves back up as the score decreases
        let mut previous = SentimentBand::VeryPositive;
        for step in (0..=1000).rev() {
            let band = classify(step as f64 / 100.0);
            assert!(band >= previous);
            assert_eq!(band, classify(step as f64 / 100.0));
            previous = band;
        }
        assert_eq!(previous, SentimentBand::VeryNegative);
    }

    #[test]
    fn test_distribution_keeps_empty_bands() {
        let set = RecordSet::from_pairs([("great gameplay", 5.0), ("boring", 1.0)], RatingScale::default());
        let dist = SentimentDistribution::from_records(&set);

        let bands: Vec<SentimentBand> = dist.iter().map(|entry| entry.band).collect();
        assert_eq!(bands, SentimentBand::ALL.to_vec());
        assert_eq!(dist.count(SentimentBand::VeryPositive), 1);
        assert_eq!(dist.count(SentimentBand::VeryNegative), 1);
        assert_eq!(dist.count(SentimentBand::Neutral), 0);
        assert_eq!(dist.total(), 2);
        assert_eq!(dist.percentage(SentimentBand::VeryPositive), 50.0);
    }

    #[test]
    fn test_distribution_serializes_in_order() {
        let set = RecordSet::from_pairs([("ok", 3.0)], RatingScale::default());
        let json = serde_json::to_value(SentimentDistribution::from_records(&set)).unwrap();
        let labels: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["band"].as_str().unwrap())
            .collect();
        assert_eq!(labels, ["very_positive", "positive", "neutral", "negative", "very_negative"]);
        assert_eq!(json[2]["count"], 1);
    }
}
