//! Error types for loading, analysis and report assembly.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning raw input into a record set.
///
/// Malformed rows are not errors; they are dropped and counted by the loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("review source '{path}' could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no review source given and demo mode is disabled")]
    NoSource,

    #[error("required column '{0}' is missing from the header row")]
    MissingColumn(&'static str),

    #[error("review data could not be parsed: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures of the analysis engine itself.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot analyze an empty record set: at least one review with text and a numeric rating is required")]
    EmptyDataset,

    #[error("invalid keyword table: {0}")]
    InvalidKeywords(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report output could not be written: {0}")]
    Io(#[from] std::io::Error),
}
