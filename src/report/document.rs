//! Markdown report document.

use std::fmt::Write;

use chrono::Utc;

use super::{Locale, ReportConfig, CHARTS_DIR, RADAR_CHART_FILE, SENTIMENT_PIE_FILE};
use crate::analysis::AnalysisResult;

struct Sentences {
    title: &'static str,
    generated: &'static str,
    summary: &'static str,
    total: &'static str,
    overall: &'static str,
    positive: &'static str,
    dimensions: &'static str,
    sentiment: &'static str,
    radar_missing: &'static str,
    pie_missing: &'static str,
}

fn sentences(locale: Locale) -> Sentences {
    match locale {
        Locale::En => Sentences {
            title: "Player Review Analysis Report",
            generated: "Generated",
            summary: "Executive Summary",
            total: "Total reviews",
            overall: "Overall score (10-point scale)",
            positive: "Positive rate (rating ≥",
            dimensions: "Six-Dimension Assessment",
            sentiment: "Sentiment Distribution",
            radar_missing: "Radar chart not found.",
            pie_missing: "Sentiment chart not found.",
        },
        Locale::Zh => Sentences {
            title: "玩家评论分析报告",
            generated: "生成时间",
            summary: "执行摘要",
            total: "总评论数",
            overall: "综合评分 (10分制)",
            positive: "好评率 (评分 ≥",
            dimensions: "六维评估",
            sentiment: "情感分布",
            radar_missing: "雷达图文件未找到。",
            pie_missing: "饼图文件未找到。",
        },
    }
}

fn mention_line(locale: Locale, label: &str, score: f64, mentions: usize) -> String {
    match locale {
        Locale::En => format!("{}: {:.1}/10 ({} mentions)", label, score, mentions),
        Locale::Zh => format!("{}: {:.1}/10 (提及 {} 次)", label, score, mentions),
    }
}

fn band_line(locale: Locale, label: &str, count: usize, pct: f64) -> String {
    match locale {
        Locale::En => format!("{}: {} reviews ({:.1}%)", label, count, pct),
        Locale::Zh => format!("{}: {}条 ({:.1}%)", label, count, pct),
    }
}

/// Builds the report text. Chart images are referenced relative to the
/// report's own directory.
pub fn render(config: &ReportConfig, result: &AnalysisResult, has_radar: bool, has_pie: bool) -> String {
    let locale = config.locale;
    let s = sentences(locale);
    let summary = &result.summary;
    let threshold = config.scale.positive_threshold;

    let mut out = String::new();
    let _ = writeln!(out, "# {} - {}\n", config.product_name, s.title);
    let _ = writeln!(out, "_{}: {}_\n", s.generated, Utc::now().format("%Y-%m-%d %H:%M UTC"));

    let _ = writeln!(out, "## {}\n", s.summary);
    let _ = writeln!(out, "- {}: {}", s.total, summary.total_reviews);
    let _ = writeln!(out, "- {}: {:.1}/10", s.overall, summary.mean_score);
    let _ = writeln!(out, "- {} {}): {:.1}%\n", s.positive, threshold, summary.positive_ratio);

    let _ = writeln!(out, "## {}\n", s.dimensions);
    if has_radar {
        let _ = writeln!(
            out,
            "![{}]({}/{})\n",
            locale.radar_title(&config.product_name),
            CHARTS_DIR,
            RADAR_CHART_FILE
        );
    } else {
        let _ = writeln!(out, "{}\n", s.radar_missing);
    }
    for score in &result.dimension_scores {
        let label = locale.dimension_label(score.dimension);
        let _ = writeln!(out, "  - {}", mention_line(locale, label, score.mean_score, score.match_count));
    }
    out.push('\n');

    let _ = writeln!(out, "## {}\n", s.sentiment);
    if has_pie {
        let _ = writeln!(
            out,
            "![{}]({}/{})\n",
            locale.sentiment_title(&config.product_name),
            CHARTS_DIR,
            SENTIMENT_PIE_FILE
        );
    } else {
        let _ = writeln!(out, "{}\n", s.pie_missing);
    }
    let dist = &result.sentiment_distribution;
    for entry in dist.iter() {
        let label = locale.band_label(entry.band);
        let _ = writeln!(out, "  - {}", band_line(locale, label, entry.count, dist.percentage(entry.band)));
    }

    out
}
