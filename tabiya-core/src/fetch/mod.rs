//! Game fetching: platform clients and the month-partitioned orchestrator.

pub mod chesscom;
pub mod lichess;
mod orchestrator;
mod pgn;

pub use orchestrator::{FetchOutcome, fetch_games};
pub use pgn::moves_from_pgn;

use crate::error::FetchError;
use crate::{GameFilter, GameRecord};

/// A platform that can serve one calendar month of a user's games as
/// normalized records. Implementations must distinguish a missing user
/// from a generic request failure from a transient network failure — the
/// orchestrator only aggregates, it never interprets.
#[async_trait::async_trait]
pub trait PlatformClient: Send + Sync {
    async fn fetch_month(
        &self,
        username: &str,
        year: i32,
        month: u32,
        filter: &GameFilter,
    ) -> Result<Vec<GameRecord>, FetchError>;
}
