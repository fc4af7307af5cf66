//! Player review analysis.
//!
//! Loads a batch of reviews (free text plus a numeric rating), assigns each
//! one a sentiment band, scores the product on six dimensions through keyword
//! matching and summarizes the batch. The [`report`] module turns the result
//! into charts and a Markdown document; [`api`] exposes the pipeline over HTTP.

pub mod analysis;
pub mod api;
pub mod config;
pub mod dataset;
pub mod demo;
pub mod dimensions;
pub mod error;
pub mod keywords;
pub mod report;
pub mod sentiment;
pub mod stats;

pub use analysis::{analyze, AnalysisResult};
pub use config::{AppConfig, DataMode, RatingScale};
pub use dataset::{LoadReport, RecordSet, ReviewRecord};
pub use dimensions::{Dimension, DimensionScore};
pub use error::{AnalysisError, LoadError, ReportError};
pub use keywords::KeywordTable;
pub use sentiment::{SentimentBand, SentimentDistribution};
pub use stats::Summary;
