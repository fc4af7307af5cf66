//! Report assembly: charts plus a Markdown document built from an
//! [`AnalysisResult`].
//!
//! Everything presentation-related (product name, font, language, output
//! location) is passed in through [`ReportConfig`]; the assembler holds no
//! other state and never touches process-wide settings.

pub mod charts;
pub mod document;

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::analysis::AnalysisResult;
use crate::config::RatingScale;
use crate::dimensions::Dimension;
use crate::error::ReportError;
use crate::sentiment::SentimentBand;
use crate::stats::one_decimal;

pub const REPORT_FILE: &str = "analysis_report.md";
pub const CHARTS_DIR: &str = "charts";
pub const RADAR_CHART_FILE: &str = "radar_chart.svg";
pub const SENTIMENT_PIE_FILE: &str = "sentiment_pie.svg";

/// Language of labels and report sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "zh" | "zh-cn" | "chinese" => Ok(Locale::Zh),
            other => Err(format!("unsupported locale '{}' (expected 'en' or 'zh')", other)),
        }
    }
}

impl Locale {
    pub fn band_label(&self, band: SentimentBand) -> &'static str {
        match self {
            Locale::En => band.label(),
            Locale::Zh => match band {
                SentimentBand::VeryPositive => "极度好评",
                SentimentBand::Positive => "好评",
                SentimentBand::Neutral => "中性",
                SentimentBand::Negative => "差评",
                SentimentBand::VeryNegative => "极度差评",
            },
        }
    }

    pub fn dimension_label(&self, dimension: Dimension) -> &'static str {
        match self {
            Locale::En => dimension.label(),
            Locale::Zh => match dimension {
                Dimension::CoreGameplay => "核心玩法",
                Dimension::Narrative => "叙事逻辑",
                Dimension::ArtStyle => "美术风格",
                Dimension::Audio => "音效配乐",
                Dimension::UserExperience => "用户体验",
                Dimension::Innovation => "创新性",
            },
        }
    }

    pub fn radar_title(&self, product: &str) -> String {
        match self {
            Locale::En => format!("{} - Six-Dimension Assessment", product),
            Locale::Zh => format!("{} - 六维评估", product),
        }
    }

    pub fn sentiment_title(&self, product: &str) -> String {
        match self {
            Locale::En => format!("{} - Sentiment Distribution", product),
            Locale::Zh => format!("{} - 情感分布", product),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub product_name: String,
    /// Font family written into chart text elements
    pub font_family: String,
    pub locale: Locale,
    /// Scale of the analyzed ratings, quoted in the positive-rate sentence
    pub scale: RatingScale,
    /// Directory receiving the report and the `charts/` subdirectory
    pub output_dir: PathBuf,
}

impl ReportConfig {
    pub fn new(product_name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            product_name: product_name.into(),
            font_family: "sans-serif".to_string(),
            locale: Locale::En,
            scale: RatingScale::default(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_scale(mut self, scale: RatingScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_font(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }
}

/// Files produced by one assembly. A chart that failed to render is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifacts {
    pub report_path: PathBuf,
    pub radar_chart: Option<PathBuf>,
    pub sentiment_pie: Option<PathBuf>,
}

pub struct ReportAssembler {
    config: ReportConfig,
}

impl ReportAssembler {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Renders both charts, then the document. Chart failures degrade to a
    /// "not found" sentence; only I/O failures on the document are errors.
    pub fn assemble(&self, result: &AnalysisResult) -> Result<ReportArtifacts, ReportError> {
        let charts_dir = self.config.output_dir.join(CHARTS_DIR);
        std::fs::create_dir_all(&charts_dir)?;

        let locale = self.config.locale;
        let font = self.config.font_family.as_str();

        let radar_path = charts_dir.join(RADAR_CHART_FILE);
        let radar_chart = charts::render_radar(
            &radar_path,
            &locale.radar_title(&self.config.product_name),
            font,
            &dimension_series(result, locale),
        )
        .map(|_| radar_path)
        .map_err(|e| warn!("⚠️ Radar chart failed: {}", e))
        .ok();

        let pie_path = charts_dir.join(SENTIMENT_PIE_FILE);
        let sentiment_pie = charts::render_sentiment_pie(
            &pie_path,
            &locale.sentiment_title(&self.config.product_name),
            font,
            &sentiment_series(result, locale),
        )
        .map(|_| pie_path)
        .map_err(|e| warn!("⚠️ Sentiment chart failed: {}", e))
        .ok();

        let markdown = document::render(&self.config, result, radar_chart.is_some(), sentiment_pie.is_some());
        let report_path = self.config.output_dir.join(REPORT_FILE);
        std::fs::write(&report_path, markdown)?;

        info!("📝 Report saved to {}", report_path.display());
        Ok(ReportArtifacts {
            report_path,
            radar_chart,
            sentiment_pie,
        })
    }
}

/// Label/count pairs for the proportional chart, all five bands in order.
pub fn sentiment_series(result: &AnalysisResult, locale: Locale) -> Vec<(String, usize)> {
    result
        .sentiment_distribution
        .iter()
        .map(|entry| (locale.band_label(entry.band).to_string(), entry.count))
        .collect()
}

/// Label/score pairs for the radar chart in dimension order, one decimal,
/// bounded to 0..=10.
pub fn dimension_series(result: &AnalysisResult, locale: Locale) -> Vec<(String, f64)> {
    result
        .dimension_scores
        .iter()
        .map(|score| {
            (
                locale.dimension_label(score.dimension).to_string(),
                one_decimal(score.mean_score).clamp(0.0, 10.0),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::config::RatingScale;
    use crate::dataset::RecordSet;
    use crate::keywords::KeywordTable;

    fn scenario() -> AnalysisResult {
        let set = RecordSet::from_pairs([("great gameplay", 5.0), ("boring", 1.0)], RatingScale::default());
        analyze(&set, KeywordTable::builtin()).unwrap()
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::Zh));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_series_follow_declared_order() {
        let result = scenario();
        let sentiment = sentiment_series(&result, Locale::Zh);
        assert_eq!(sentiment[0], ("极度好评".to_string(), 1));
        assert_eq!(sentiment[4], ("极度差评".to_string(), 1));
        assert_eq!(sentiment.len(), 5);

        let dims = dimension_series(&result, Locale::En);
        let labels: Vec<&str> = dims.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            ["core gameplay", "narrative", "art style", "audio", "user experience", "innovation"]
        );
        assert_eq!(dims[0].1, 10.0);
        assert!(dims.iter().all(|(_, v)| (0.0..=10.0).contains(v)));
    }

    #[test]
    fn test_assemble_writes_report_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::new("Love Letters", dir.path()).with_locale(Locale::En);
        let artifacts = ReportAssembler::new(config).assemble(&scenario()).unwrap();

        assert_eq!(artifacts.report_path, dir.path().join(REPORT_FILE));
        let report = std::fs::read_to_string(&artifacts.report_path).unwrap();
        assert!(report.starts_with("# Love Letters - Player Review Analysis Report"));
        assert!(report.contains("Total reviews: 2"));

        let radar = artifacts.radar_chart.expect("radar chart rendered");
        let svg = std::fs::read_to_string(radar).unwrap();
        assert!(svg.contains("<svg"));
        assert!(artifacts.sentiment_pie.is_some());
    }

    #[test]
    fn test_unwritable_output_dir_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();

        let config = ReportConfig::new("Love Letters", &blocker);
        let err = ReportAssembler::new(config).assemble(&scenario()).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
