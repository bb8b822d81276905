//! Chart rendering for the daily upload series.
//!
//! The SVG output is generated directly: a polyline over a dated x-axis
//! with a stats footer, saved when an output path is given. Without one,
//! a text chart is printed to the terminal instead.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::series::SeriesStats;

const WIDTH: u32 = 960;
const HEIGHT: u32 = 480;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;

/// Render the series as a standalone SVG line chart.
pub fn render_svg(series: &[(NaiveDate, i64)], title: &str, stats: &SeriesStats) -> String {
    let plot_w = WIDTH as f64 - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT as f64 - MARGIN_TOP - MARGIN_BOTTOM;
    let max_count = stats.max_per_day.max(1) as f64;

    let x_at = |i: usize| {
        if series.len() <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (series.len() - 1) as f64
        }
    };
    let y_at = |count: i64| MARGIN_TOP + plot_h * (1.0 - count as f64 / max_count);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="28" font-family="sans-serif" font-size="18" font-weight="bold" text-anchor="middle">{}</text>"#,
        WIDTH / 2,
        escape(title)
    );

    // Horizontal gridlines with y-axis labels.
    for step in 0..=4 {
        let value = (max_count * step as f64 / 4.0).round() as i64;
        let y = y_at(value);
        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#ddd" stroke-width="1"/>"##,
            WIDTH as f64 - MARGIN_RIGHT
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            value
        );
    }

    // X-axis labels, thinned so they stay readable on long windows.
    let stride = (series.len() / 10).max(1);
    for (i, (day, _)) in series.iter().enumerate() {
        if i % stride != 0 && i != series.len() - 1 {
            continue;
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="middle">{}</text>"#,
            x_at(i),
            HEIGHT as f64 - MARGIN_BOTTOM + 20.0,
            day.format("%m-%d")
        );
    }

    if !series.is_empty() {
        let points: Vec<String> = series
            .iter()
            .enumerate()
            .map(|(i, (_, count))| format!("{:.1},{:.1}", x_at(i), y_at(*count)))
            .collect();
        let _ = writeln!(
            svg,
            r##"<polyline points="{}" fill="none" stroke="#1f77b4" stroke-width="2"/>"##,
            points.join(" ")
        );
        for (i, (_, count)) in series.iter().enumerate() {
            let _ = writeln!(
                svg,
                r##"<circle cx="{:.1}" cy="{:.1}" r="3" fill="#1f77b4"/>"##,
                x_at(i),
                y_at(*count)
            );
        }
    }

    let _ = writeln!(
        svg,
        r#"<text x="{MARGIN_LEFT}" y="{:.1}" font-family="sans-serif" font-size="12" font-style="italic">Total: {} | Avg/day: {:.1} | Max/day: {}</text>"#,
        HEIGHT as f64 - 14.0,
        stats.total,
        stats.avg_per_day,
        stats.max_per_day
    );
    let _ = writeln!(svg, "</svg>");

    svg
}

/// Render the series as a text chart for terminal display.
pub fn render_terminal(series: &[(NaiveDate, i64)], stats: &SeriesStats) -> String {
    const BAR_WIDTH: i64 = 40;

    let max_count = stats.max_per_day.max(1);
    let mut out = String::new();

    for (day, count) in series {
        let bar_len = (count * BAR_WIDTH / max_count) as usize;
        let _ = writeln!(
            out,
            "{} | {:<width$} {}",
            day.format("%Y-%m-%d"),
            "#".repeat(bar_len),
            count,
            width = BAR_WIDTH as usize
        );
    }

    let _ = writeln!(
        out,
        "\nTotal: {} | Avg/day: {:.1} | Max/day: {}",
        stats.total, stats.avg_per_day, stats.max_per_day
    );

    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
