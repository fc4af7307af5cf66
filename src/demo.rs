//! Seeded synthetic reviews for demo mode.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::RatingScale;
use crate::dataset::{RecordSet, ReviewRecord};

pub const DEFAULT_SYNTHETIC_REVIEWS: usize = 200;
pub const SYNTHETIC_SEED: u64 = 42;

const RATINGS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
const RATING_WEIGHTS: [f64; 5] = [0.05, 0.05, 0.17, 0.16, 0.57];

const POSITIVE_TEMPLATES: [&str; 5] = [
    "玩法很有趣",
    "画面精美",
    "剧情优秀",
    "An incredibly unique concept!",
    "A beautiful little story.",
];

const NEGATIVE_TEMPLATES: [&str; 5] = [
    "有点重复",
    "优化不好",
    "bug较多",
    "Boring gameplay",
    "The controls are a bit clunky",
];

/// Generates `count` reviews from a fixed seed; identical calls yield
/// identical record sets. Ratings are drawn on a 1..=5 scale.
pub fn synthetic_records(count: usize, scale: RatingScale) -> RecordSet {
    let mut rng = StdRng::seed_from_u64(SYNTHETIC_SEED);
    let dist = WeightedIndex::new(RATING_WEIGHTS).expect("rating weights must be positive and finite");

    let records = (0..count)
        .map(|_| {
            let rating = RATINGS[dist.sample(&mut rng)];
            let templates = if rating >= 4.0 {
                &POSITIVE_TEMPLATES
            } else {
                &NEGATIVE_TEMPLATES
            };
            let text = templates.choose(&mut rng).copied().unwrap_or_default();
            ReviewRecord::new(text, rating, &scale)
        })
        .collect();

    RecordSet::new(records, scale)
}
