//! Daily upload count chart over the detections table.
//!
//! Reads database configuration from the environment (or `.env`), queries
//! upload counts grouped by calendar date, and renders a line chart:
//! an SVG file when `--output` is given, a terminal chart otherwise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveTime, TimeZone, Utc};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use veriscan_cli::chart::{render_svg, render_terminal};
use veriscan_cli::series::{compute_stats, fill_missing_dates};
use veriscan_core::Config;
use veriscan_db::DetectionRepository;

#[derive(Parser, Debug)]
#[command(name = "upload_stats")]
#[command(about = "Generate a daily image upload chart from recorded detections")]
struct Args {
    /// Number of days to include in the chart
    #[arg(long, short, default_value_t = 30)]
    days: u64,

    /// Output file path (e.g. uploads_graph.svg); prints to the terminal
    /// when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Additional text for the chart title
    #[arg(long, short)]
    title: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!(
        "Generating upload statistics for the last {} days...",
        args.days
    );

    let config = Config::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    println!("Connected to database successfully!");

    let repository = DetectionRepository::new(pool);

    let end_date = Utc::now().date_naive();
    let start_date = end_date
        .checked_sub_days(chrono::Days::new(args.days.saturating_sub(1)))
        .unwrap_or(end_date);
    let since = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));

    let counts = repository.daily_counts(since).await?;
    println!("Found data for {} days with uploads.", counts.len());

    let series = fill_missing_dates(&counts, args.days, end_date);
    let stats = compute_stats(&series);

    let title = match args.title.as_deref() {
        Some(suffix) if !suffix.is_empty() => format!("Daily Image Uploads - {}", suffix),
        _ => "Daily Image Uploads".to_string(),
    };

    match &args.output {
        Some(path) => {
            let svg = render_svg(&series, &title, &stats);
            std::fs::write(path, svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Graph saved to: {}", path.display());
        }
        None => {
            println!("\n{}\n", title);
            print!("{}", render_terminal(&series, &stats));
        }
    }

    println!("\nSummary:");
    println!("  Total images uploaded: {}", stats.total);
    println!(
        "  Days with uploads: {}/{}",
        stats.days_with_uploads, args.days
    );
    println!("  Average per day: {:.1}", stats.avg_per_day);

    Ok(())
}
