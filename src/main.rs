use anyhow::Result;
use bandi_aggregator::{filters, BandiAggregator, FetchConfig, Notice};
use clap::Parser;
use tracing::{info, warn};

/// Aggregate procurement and grant notices ("bandi") from the
/// Trentino-Alto Adige open-data sources.
#[derive(Debug, Parser)]
#[command(name = "bandi-aggregator")]
struct Cli {
    /// Deadline inclusion window, in days.
    #[arg(long, default_value_t = 30)]
    window_days: i64,

    /// Pages to request from the Alto Adige listing.
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Maximum entries taken from the PAT feed.
    #[arg(long, default_value_t = 50)]
    feed_limit: usize,

    /// Per-source timeout in seconds.
    #[arg(long, default_value_t = 45)]
    timeout_secs: u64,

    /// Keep only notices carrying one of these tags (repeatable).
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Keep only notices whose title contains this text.
    #[arg(long, default_value = "")]
    query: String,

    /// Print the result as a JSON array instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = FetchConfig {
        window_days: cli.window_days,
        listing_pages: cli.pages,
        feed_limit: cli.feed_limit,
        source_timeout_seconds: cli.timeout_secs,
        ..FetchConfig::default()
    };

    let aggregator = BandiAggregator::new(config);
    let report = aggregator.load_bandi_with_report().await;
    for warning in &report.warnings {
        warn!("{}: {}", warning.source, warning.message);
    }

    let notices = filters::filter_by_tags(&report.notices, &cli.tags);
    let notices = filters::filter_by_query(&notices, &cli.query);
    info!("{} notices after filters", notices.len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&notices)?);
    } else {
        print_table(&notices);
    }

    Ok(())
}

fn print_table(notices: &[Notice]) {
    for notice in notices {
        println!(
            "{:<12} {:<60} {:<40} {}",
            notice.deadline,
            truncate(&notice.title, 60),
            truncate(&notice.entity, 40),
            notice.tags.join(", ")
        );
    }
    println!("{} bandi", notices.len());
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 3).collect();
        format!("{}...", cut)
    }
}
