//! SVG charts drawn with plotters in pixel coordinates.

use std::f64::consts::PI;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub type ChartResult = Result<(), Box<dyn std::error::Error>>;

/// Slice colors, most positive band first.
pub const SENTIMENT_PALETTE: [RGBColor; 5] = [
    RGBColor(0x10, 0xb9, 0x81),
    RGBColor(0x6e, 0xe7, 0xb7),
    RGBColor(0xfb, 0xbf, 0x24),
    RGBColor(0xf8, 0x71, 0x71),
    RGBColor(0xdc, 0x26, 0x26),
];

const RADAR_COLOR: RGBColor = RGBColor(0x3b, 0x82, 0xf6);
const GRID_COLOR: RGBColor = RGBColor(0xcb, 0xd5, 0xe1);
const RADAR_MAX: f64 = 10.0;
const RADAR_RINGS: usize = 5;

fn centered(font: &str, size: u32) -> TextStyle<'_> {
    TextStyle::from((font, size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

/// Proportional chart of `(label, count)` pairs. Zero-count entries keep
/// their palette color but draw no slice.
pub fn render_sentiment_pie(path: &Path, title: &str, font: &str, slices: &[(String, usize)]) -> ChartResult {
    let root = SVGBackend::new(path, (800, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    root.draw(&Text::new(title.to_string(), (400, 36), centered(font, 28)))?;

    let total: usize = slices.iter().map(|(_, count)| count).sum();
    let center = (400, 340);
    let radius = 220.0;
    let mut start = -PI / 2.0;

    for ((label, count), color) in slices.iter().zip(SENTIMENT_PALETTE.iter().cycle()) {
        if *count == 0 || total == 0 {
            continue;
        }
        let share = *count as f64 / total as f64;
        let sweep = share * 2.0 * PI;
        let steps = ((share * 180.0).ceil() as usize).max(2);

        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        points.extend((0..=steps).map(|i| polar(center, radius, start + sweep * i as f64 / steps as f64)));
        root.draw(&Polygon::new(points, color.filled()))?;

        let middle = start + sweep / 2.0;
        root.draw(&Text::new(
            format!("{:.1}%", share * 100.0),
            polar(center, radius * 0.62, middle),
            centered(font, 18),
        ))?;
        root.draw(&Text::new(label.clone(), polar(center, radius + 34.0, middle), centered(font, 18)))?;

        start += sweep;
    }

    root.present()?;
    Ok(())
}

/// Radar chart of `(label, score)` axes on a fixed 0-10 radial range.
/// Scores outside the range are clamped onto it.
pub fn render_radar(path: &Path, title: &str, font: &str, axes: &[(String, f64)]) -> ChartResult {
    let root = SVGBackend::new(path, (800, 840)).into_drawing_area();
    root.fill(&WHITE)?;
    root.draw(&Text::new(title.to_string(), (400, 36), centered(font, 28)))?;

    let n = axes.len();
    if n == 0 {
        root.present()?;
        return Ok(());
    }

    let center = (400, 450);
    let radius = 290.0;
    let angle = |i: usize| -PI / 2.0 + 2.0 * PI * i as f64 / n as f64;

    for ring in 1..=RADAR_RINGS {
        let r = radius * ring as f64 / RADAR_RINGS as f64;
        let mut ring_points: Vec<(i32, i32)> = (0..n).map(|i| polar(center, r, angle(i))).collect();
        ring_points.push(ring_points[0]);
        root.draw(&PathElement::new(ring_points, GRID_COLOR.stroke_width(1)))?;

        let tick = RADAR_MAX * ring as f64 / RADAR_RINGS as f64;
        let (x, y) = polar(center, r, angle(0));
        root.draw(&Text::new(format!("{}", tick), (x + 14, y), centered(font, 14)))?;
    }

    for i in 0..n {
        root.draw(&PathElement::new(
            vec![center, polar(center, radius, angle(i))],
            GRID_COLOR.stroke_width(1),
        ))?;
    }

    let values: Vec<(i32, i32)> = axes
        .iter()
        .enumerate()
        .map(|(i, (_, score))| {
            let r = radius * score.clamp(0.0, RADAR_MAX) / RADAR_MAX;
            polar(center, r, angle(i))
        })
        .collect();

    root.draw(&Polygon::new(values.clone(), RADAR_COLOR.mix(0.25).filled()))?;
    let mut outline = values.clone();
    outline.push(values[0]);
    root.draw(&PathElement::new(outline, RADAR_COLOR.stroke_width(2)))?;
    for point in &values {
        root.draw(&Circle::new(*point, 4, RADAR_COLOR.filled()))?;
    }

    for (i, (label, score)) in axes.iter().enumerate() {
        root.draw(&Text::new(
            format!("{} ({:.1})", label, score),
            polar(center, radius + 40.0, angle(i)),
            centered(font, 18),
        ))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_skips_empty_slices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.svg");
        let slices = vec![
            ("very positive".to_string(), 3),
            ("positive".to_string(), 0),
            ("neutral".to_string(), 1),
            ("negative".to_string(), 0),
            ("very negative".to_string(), 0),
        ];
        render_sentiment_pie(&path, "Demo - Sentiment Distribution", "sans-serif", &slices).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("25.0%"));
        assert!(!svg.contains(">positive<"));
    }

    #[test]
    fn test_radar_labels_every_axis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radar.svg");
        let axes: Vec<(String, f64)> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .enumerate()
            .map(|(i, l)| (l.to_string(), i as f64 * 2.5))
            .collect();
        render_radar(&path, "Demo - Six-Dimension Assessment", "sans-serif", &axes).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("f (12.5)"));
        assert!(svg.contains("a (0.0)"));
    }
}
