//! Runtime configuration.
//!
//! Values come from the environment (after `dotenv`), each with a default
//! suited to a local upload service. Unparsable values fall back to the
//! default with a warning instead of aborting startup.

use std::path::PathBuf;
use std::str::FromStr;

use crate::report::Locale;

/// Rating scale of the incoming dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    /// Highest rating of the source scale (5 for star ratings)
    pub max_rating: f64,
    /// Original ratings at or above this value count as positive
    pub positive_threshold: f64,
}

impl RatingScale {
    pub fn new(max_rating: f64, positive_threshold: f64) -> Self {
        Self {
            max_rating,
            positive_threshold,
        }
    }

    /// Linear rescale of an original rating onto 0..=10.
    pub fn normalize(&self, rating: f64) -> f64 {
        rating * (10.0 / self.max_rating)
    }

    pub fn is_positive(&self, rating: f64) -> bool {
        rating >= self.positive_threshold
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::new(5.0, 4.0)
    }
}

/// Whether the loader may substitute synthetic data for a missing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// Missing or unreadable input is an error
    #[default]
    Strict,
    /// Missing or unreadable input falls back to the seeded synthetic set
    Demo,
}

impl DataMode {
    pub fn from_flag(demo: bool) -> Self {
        if demo {
            DataMode::Demo
        } else {
            DataMode::Strict
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, DataMode::Demo)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub output_dir: PathBuf,
    pub data_mode: DataMode,
    pub product_name: String,
    pub locale: Locale,
    pub font_family: String,
    pub scale: RatingScale,
    pub keywords_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            output_dir: PathBuf::from("output"),
            data_mode: DataMode::Strict,
            product_name: "Uploaded Game".to_string(),
            locale: Locale::En,
            font_family: "sans-serif".to_string(),
            scale: RatingScale::default(),
            keywords_path: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests do not have
    /// to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let demo = lookup("DEMO_MODE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let locale = match lookup("REPORT_LOCALE") {
            Some(raw) => raw.parse::<Locale>().unwrap_or_else(|_| {
                tracing::warn!("Unknown REPORT_LOCALE '{}', using {:?}", raw, defaults.locale);
                defaults.locale
            }),
            None => defaults.locale,
        };

        let max_rating = parse_or("RATING_SCALE_MAX", lookup("RATING_SCALE_MAX"), defaults.scale.max_rating);
        let positive_threshold = parse_or(
            "POSITIVE_THRESHOLD",
            lookup("POSITIVE_THRESHOLD"),
            defaults.scale.positive_threshold,
        );
        let scale = if max_rating > 0.0 {
            RatingScale::new(max_rating, positive_threshold)
        } else {
            tracing::warn!("RATING_SCALE_MAX must be positive, using {}", defaults.scale.max_rating);
            RatingScale::new(defaults.scale.max_rating, positive_threshold)
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            output_dir: lookup("OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            data_mode: DataMode::from_flag(demo),
            product_name: lookup("PRODUCT_NAME").unwrap_or(defaults.product_name),
            locale,
            font_family: lookup("REPORT_FONT").unwrap_or(defaults.font_family),
            scale,
            keywords_path: lookup("KEYWORDS_PATH").map(PathBuf::from),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", lookup("MAX_UPLOAD_BYTES"), defaults.max_upload_bytes),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value '{}' for {}, using {:?}", value, key, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.data_mode, DataMode::Strict);
        assert_eq!(config.scale, RatingScale::default());
        assert!(config.keywords_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("DEMO_MODE", "true"),
            ("RATING_SCALE_MAX", "10"),
            ("POSITIVE_THRESHOLD", "7"),
            ("REPORT_LOCALE", "zh"),
            ("OUTPUT_DIR", "/tmp/reports"),
        ]);
        assert!(config.data_mode.is_demo());
        assert_eq!(config.scale.max_rating, 10.0);
        assert_eq!(config.scale.positive_threshold, 7.0);
        assert_eq!(config.locale, Locale::Zh);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("RATING_SCALE_MAX", "five"),
            ("MAX_UPLOAD_BYTES", "-3"),
            ("REPORT_LOCALE", "klingon"),
        ]);
        assert_eq!(config.scale.max_rating, 5.0);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_five_star_scale_doubles() {
        let scale = RatingScale::default();
        assert_eq!(scale.normalize(5.0), 10.0);
        assert_eq!(scale.normalize(1.0), 2.0);
        assert!(scale.is_positive(4.0));
        assert!(!scale.is_positive(3.5));
    }
}
