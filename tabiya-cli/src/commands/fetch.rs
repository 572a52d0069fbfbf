use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, ValueEnum};
use tracing::{info, warn};

use tabiya_core::config::FetchConfig;
use tabiya_core::fetch::chesscom::ChessComClient;
use tabiya_core::fetch::lichess::LichessClient;
use tabiya_core::fetch::{PlatformClient, fetch_games};
use tabiya_core::{Color, GameFilter};
use tabiya_graph::codec;
use tabiya_graph::graph::PositionGraph;

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Platform {
    Chesscom,
    Lichess,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Platform to fetch from
    #[arg(value_enum)]
    pub platform: Platform,

    /// Account name on the platform
    pub username: String,

    /// Start of the period, YYYY-MM-DD
    pub start: String,

    /// End of the period, YYYY-MM-DD (exclusive)
    pub end: String,

    /// How deep you want the position graph to be, in plies
    #[arg(short = 'm', long = "moves", default_value_t = 5)]
    pub moves: usize,

    /// Output file for the persisted graph
    #[arg(short, long, default_value = "openings.bin")]
    pub output: PathBuf,

    /// Worker pool size (default from config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Only keep games where you played this color
    #[arg(long)]
    pub color: Option<Color>,

    /// Optional TOML config file (platform URLs, worker count)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn run(args: FetchArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => FetchConfig::load(path)?,
        None => FetchConfig::default(),
    };

    let filter = GameFilter {
        start: parse_date(&args.start)?,
        end: parse_date(&args.end)?,
        color: args.color,
        move_cap: args.moves,
    };

    // Construct the graph up front so a bad move cap fails before any
    // network traffic.
    let mut graph = PositionGraph::new(args.moves)?;

    let client: Arc<dyn PlatformClient> = match args.platform {
        Platform::Chesscom => Arc::new(ChessComClient::new(config.chesscom_url.clone())),
        Platform::Lichess => Arc::new(LichessClient::new(config.lichess_url.clone())),
    };
    let workers = args.workers.unwrap_or(config.workers);

    let outcome = fetch_games(client, &args.username, &filter, workers).await;
    let (games, fetch_err) = outcome.error();
    if let Some(err) = fetch_err {
        if games.is_empty() {
            return Err(anyhow::Error::new(err).context("fetching failed"));
        }
        warn!(%err, "some months failed; continuing with partial results");
    }

    let mut ingested = 0usize;
    for game in &games {
        match graph.add_game(game) {
            Ok(()) => ingested += 1,
            Err(e) => warn!(error = %e, "skipping game the rules engine rejected"),
        }
    }
    info!(ingested, fetched = games.len(), "graph built");

    codec::dump(&graph, &args.output)
        .with_context(|| format!("cannot write graph to {}", args.output.display()))?;
    println!(
        "Saved a position graph of {} game(s) to {}",
        ingested,
        args.output.display()
    );
    Ok(())
}

fn parse_date(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date {s:?}: {e}"))?;
    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}
