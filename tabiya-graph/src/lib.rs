//! Position graph engine — merges played games into a transposition-aware
//! opening tree.
//!
//! The main entry point is [`graph::PositionGraph`], built once with a depth
//! hint and mutated only through [`graph::PositionGraph::add_game`]. Stored
//! variations are enumerated lazily with [`graph::PositionGraph::variations`]
//! and rendered with [`render::render`]. [`codec`] persists a graph to disk
//! and loads it back.

pub mod board;
pub mod codec;
pub mod graph;
pub mod render;
pub mod variations;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error type for the position graph engine.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// Graph construction requires a depth hint of at least two plies.
    #[error("expected depth > 1, got {0}")]
    InvalidDepth(usize),

    /// A move the rules engine rejected. Nodes and edges created for earlier
    /// moves of the same game stay committed.
    #[error("illegal move {san:?} at ply {ply}: {reason}")]
    IllegalMove {
        /// The move string as received.
        san: String,
        /// 1-based ply index within the game's move list.
        ply: usize,
        /// Rejection reason from the rules engine.
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// A position identifier with the halfmove clock and fullmove number
/// stripped, so transpositions reaching the same position collapse to one
/// node. Equality is exact string equality of the stripped form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalKey(pub String);

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized played game: which color the user had, when the game ended,
/// and its moves in standard algebraic notation. Produced by the platform
/// clients, consumed by [`graph::PositionGraph::add_game`].
///
/// The move list must already be truncated to the graph's depth hint — the
/// engine does not truncate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// True when the user played White.
    pub white: bool,
    /// End time of the game.
    pub end_time: DateTime<Utc>,
    /// Moves in SAN, one entry per ply.
    pub moves: Vec<String>,
}
