// Thin wrapper over the shakmaty rules engine.
//
// The graph only needs two things from the rules collaborator: apply a SAN
// move string to a position (rejecting illegal ones), and derive the
// canonical key of the resulting position. The canonical key is the EPD
// form — FEN with the halfmove clock and fullmove number stripped — so that
// transposed move orders reaching the same position share one key.

use shakmaty::fen::Epd;
use shakmaty::san::SanPlus;
use shakmaty::{Chess, EnPassantMode, Position};

use crate::{CanonicalKey, GraphError};

/// A simulated board, starting from the standard position.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pos: Chess,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one SAN move and return the canonical key of the resulting
    /// position. The board state is unchanged when the move is rejected.
    ///
    /// `ply` is the 1-based index of the move within the game, used only
    /// for error reporting.
    pub fn apply(&mut self, san: &str, ply: usize) -> crate::Result<CanonicalKey> {
        let parsed = SanPlus::from_ascii(san.as_bytes()).map_err(|e| GraphError::IllegalMove {
            san: san.to_string(),
            ply,
            reason: e.to_string(),
        })?;
        let mv = parsed
            .san
            .to_move(&self.pos)
            .map_err(|e| GraphError::IllegalMove {
                san: san.to_string(),
                ply,
                reason: e.to_string(),
            })?;
        // to_move only yields legal moves, so play_unchecked is safe here.
        self.pos.play_unchecked(&mv);
        Ok(canonical_key(&self.pos))
    }
}

/// Canonical key of a position: its EPD string.
pub fn canonical_key(pos: &Chess) -> CanonicalKey {
    CanonicalKey(Epd::from_position(pos.clone(), EnPassantMode::Legal).to_string())
}

/// Canonical key of the standard starting position.
pub fn starting_key() -> CanonicalKey {
    canonical_key(&Chess::default())
}
