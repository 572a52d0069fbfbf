//! Tabiya core library — fetches a user's played games from online chess
//! platforms and aggregates them for position-graph ingestion.
//!
//! The main entry point is [`fetch::fetch_games`], which partitions a date
//! range into per-month jobs, runs them through a bounded worker pool
//! against a [`fetch::PlatformClient`], and returns every game that could
//! be fetched together with a structured collection of per-month failures.

pub mod config;
pub mod error;
pub mod fetch;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use tabiya_graph::GameRecord;

/// The color the user played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            other => Err(format!("expected \"white\" or \"black\", got {other:?}")),
        }
    }
}

/// What to fetch: the half-open time period `[start, end)`, an optional
/// color restriction, and the per-game move cap handed down to the clients.
#[derive(Debug, Clone)]
pub struct GameFilter {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub color: Option<Color>,
    /// Keep at most this many plies per game; 0 keeps them all.
    pub move_cap: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_case_insensitively() {
        assert_eq!("white".parse::<Color>().unwrap(), Color::White);
        assert_eq!("Black".parse::<Color>().unwrap(), Color::Black);
        assert!("green".parse::<Color>().is_err());
    }
}
