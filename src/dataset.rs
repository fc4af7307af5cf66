//! Dataset loading.
//!
//! Turns raw tabular input (CSV or JSON rows) into a [`RecordSet`]. Rows
//! without text, without a rating, or with a rating that does not parse as a
//! finite number are dropped and counted; only structural problems (missing
//! columns, unreadable source) are errors.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::{DataMode, RatingScale};
use crate::demo;
use crate::error::LoadError;

pub const TEXT_COLUMN: &str = "review_text";
pub const RATING_COLUMN: &str = "rating";

/// A single review that passed loading. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    text: String,
    rating: f64,
    normalized_score: f64,
}

impl ReviewRecord {
    pub fn new(text: impl Into<String>, rating: f64, scale: &RatingScale) -> Self {
        Self {
            text: text.into(),
            rating,
            normalized_score: scale.normalize(rating),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rating on the source scale
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Rating rescaled onto 0..=10
    pub fn normalized_score(&self) -> f64 {
        self.normalized_score
    }
}

/// Ordered reviews of one analysis run, together with the scale they were
/// normalized with.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<ReviewRecord>,
    scale: RatingScale,
}

impl RecordSet {
    pub fn new(records: Vec<ReviewRecord>, scale: RatingScale) -> Self {
        Self { records, scale }
    }

    /// Builds a set from `(text, rating)` pairs on the given scale.
    pub fn from_pairs<I, S>(pairs: I, scale: RatingScale) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let records = pairs
            .into_iter()
            .map(|(text, rating)| ReviewRecord::new(text, rating, &scale))
            .collect();
        Self { records, scale }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReviewRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn scale(&self) -> &RatingScale {
        &self.scale
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a ReviewRecord;
    type IntoIter = std::slice::Iter<'a, ReviewRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Rating cell as it arrives: JSON may carry numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    Number(f64),
    Text(String),
}

impl RawRating {
    /// Numeric coercion; anything that is not a finite number fails.
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            RawRating::Number(n) => *n,
            RawRating::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Unvalidated input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RawReview {
    #[schema(example = "great gameplay")]
    pub review_text: Option<String>,
    #[schema(value_type = Option<f64>, example = 5)]
    pub rating: Option<RawRating>,
}

impl RawReview {
    pub fn new(text: impl Into<String>, rating: f64) -> Self {
        Self {
            review_text: Some(text.into()),
            rating: Some(RawRating::Number(rating)),
        }
    }

    fn into_record(self, scale: &RatingScale) -> Option<ReviewRecord> {
        let text = self.review_text.filter(|t| !t.is_empty())?;
        let rating = self.rating?.coerce()?;
        Some(ReviewRecord::new(text, rating, scale))
    }
}

/// Where a record set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Upload(String),
    Inline,
    Synthetic,
}

/// Outcome of a load: the surviving records plus the row accounting.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub records: RecordSet,
    pub total_rows: usize,
    pub dropped_rows: usize,
    pub source: DataSource,
}

impl LoadReport {
    pub fn loaded_rows(&self) -> usize {
        self.records.len()
    }

    fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    fn log(&self) {
        info!("📥 Loaded {} reviews from {:?}", self.records.len(), self.source);
        if self.dropped_rows > 0 {
            warn!(
                "Dropped {} of {} rows without text or numeric rating",
                self.dropped_rows, self.total_rows
            );
        }
    }
}

/// Shared normalization path for every input format.
pub fn records_from_raw<I>(rows: I, scale: RatingScale) -> LoadReport
where
    I: IntoIterator<Item = RawReview>,
{
    let mut total_rows = 0;
    let records: Vec<ReviewRecord> = rows
        .into_iter()
        .inspect(|_| total_rows += 1)
        .filter_map(|row| row.into_record(&scale))
        .collect();
    let dropped_rows = total_rows - records.len();

    LoadReport {
        records: RecordSet::new(records, scale),
        total_rows,
        dropped_rows,
        source: DataSource::Inline,
    }
}

/// Reads CSV with a header row containing `review_text` and `rating`.
///
/// Additional columns are ignored. Rows that fail to decode count as dropped;
/// an I/O failure of the underlying reader aborts the load.
pub fn load_csv_reader<R: Read>(reader: R, scale: RatingScale) -> Result<LoadReport, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let position = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let text_idx = position(TEXT_COLUMN)?;
    let rating_idx = position(RATING_COLUMN)?;

    let mut rows = Vec::new();
    let mut undecodable = 0;
    for result in csv_reader.records() {
        match result {
            Ok(record) => rows.push(RawReview {
                review_text: record.get(text_idx).map(str::to_string),
                rating: record
                    .get(rating_idx)
                    .map(|r| RawRating::Text(r.to_string())),
            }),
            Err(e) if e.is_io_error() => return Err(LoadError::Csv(e)),
            Err(e) => {
                tracing::debug!("Skipping undecodable row: {}", e);
                undecodable += 1;
            }
        }
    }

    let mut report = records_from_raw(rows, scale);
    report.total_rows += undecodable;
    report.dropped_rows += undecodable;
    Ok(report)
}

/// Loads a CSV file. A missing, unreadable or undecodable file is an error
/// in strict mode and falls back to the synthetic set in demo mode. A file
/// lacking a required column is an error in both modes.
pub fn load_path(path: &Path, scale: RatingScale, mode: DataMode) -> Result<LoadReport, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) if mode.is_demo() => {
            warn!(
                "'{}' could not be opened ({}). Using synthetic data for demonstration.",
                path.display(),
                source
            );
            return Ok(synthetic_report(scale));
        }
        Err(source) => {
            return Err(LoadError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let report = match load_csv_reader(file, scale) {
        Ok(report) => report.with_source(DataSource::File(path.to_path_buf())),
        // a file that cannot be decoded is unreadable; a missing column is not
        Err(LoadError::Csv(e)) if mode.is_demo() => {
            warn!("'{}' is unreadable ({}). Using synthetic data for demonstration.", path.display(), e);
            return Ok(synthetic_report(scale));
        }
        Err(e) => return Err(e),
    };
    report.log();
    Ok(report)
}

/// Like [`load_path`], but the path itself is optional.
pub fn load_source(path: Option<&Path>, scale: RatingScale, mode: DataMode) -> Result<LoadReport, LoadError> {
    match path {
        Some(path) => load_path(path, scale, mode),
        None if mode.is_demo() => {
            warn!("No review source given. Using synthetic data for demonstration.");
            Ok(synthetic_report(scale))
        }
        None => Err(LoadError::NoSource),
    }
}

/// Loads an uploaded CSV body.
pub fn load_upload(name: &str, bytes: &[u8], scale: RatingScale) -> Result<LoadReport, LoadError> {
    let report = load_csv_reader(bytes, scale)?.with_source(DataSource::Upload(name.to_string()));
    report.log();
    Ok(report)
}

fn synthetic_report(scale: RatingScale) -> LoadReport {
    let records = demo::synthetic_records(demo::DEFAULT_SYNTHETIC_REVIEWS, scale);
    let total_rows = records.len();
    let report = LoadReport {
        records,
        total_rows,
        dropped_rows: 0,
        source: DataSource::Synthetic,
    };
    report.log();
    report
}
