use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use review_analyzer::dataset;
use review_analyzer::report::{Locale, ReportAssembler, ReportConfig};
use review_analyzer::{analyze, AppConfig, DataMode, KeywordTable};

/// Analyze a CSV of player reviews and write charts plus a Markdown report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV file with `review_text` and `rating` columns
    input: Option<PathBuf>,

    /// Fall back to seeded synthetic reviews when the input is missing
    #[arg(long)]
    demo: bool,

    /// Product name used in titles
    #[arg(long, default_value = "Love Letters")]
    product: String,

    /// Output directory for the report and charts
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Report language (en, zh)
    #[arg(long)]
    locale: Option<Locale>,

    /// Font family for chart text
    #[arg(long)]
    font: Option<String>,

    /// Custom keyword table (JSON)
    #[arg(long)]
    keywords: Option<PathBuf>,

    /// Print the analysis result as JSON and skip the report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let env = AppConfig::from_env();
    let mode = if args.demo { DataMode::Demo } else { env.data_mode };

    let loaded = dataset::load_source(args.input.as_deref(), env.scale, mode).context("loading reviews")?;

    let custom_keywords = args
        .keywords
        .as_deref()
        .or(env.keywords_path.as_deref())
        .map(KeywordTable::from_path)
        .transpose()?;
    let keywords = custom_keywords.as_ref().unwrap_or_else(|| KeywordTable::builtin());

    let result = analyze(&loaded.records, keywords)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let config = ReportConfig::new(args.product, &args.out)
        .with_locale(args.locale.unwrap_or(env.locale))
        .with_font(args.font.unwrap_or(env.font_family))
        .with_scale(env.scale);
    let locale = config.locale;
    let artifacts = ReportAssembler::new(config).assemble(&result)?;

    println!("Reviews analyzed: {} ({} dropped)", loaded.loaded_rows(), loaded.dropped_rows);
    println!("Overall score:    {:.1}/10", result.summary.mean_score);
    println!("Positive rate:    {:.1}%", result.summary.positive_ratio);
    for score in &result.dimension_scores {
        println!(
            "  {:<16} {:>4.1}/10  ({} mentions)",
            locale.dimension_label(score.dimension),
            score.mean_score,
            score.match_count
        );
    }
    println!("Report: {}", artifacts.report_path.display());
    if let Some(path) = &artifacts.radar_chart {
        println!("Radar chart: {}", path.display());
    }
    if let Some(path) = &artifacts.sentiment_pie {
        println!("Sentiment chart: {}", path.display());
    }

    Ok(())
}
