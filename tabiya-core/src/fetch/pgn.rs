// SAN move extraction from PGN movetext.

use pgn_reader::{BufferedReader, SanPlus, Skip, Visitor};

use crate::error::FetchError;

/// Collects mainline SAN strings, ignoring variations, comments, and NAGs.
struct MoveCollector {
    moves: Vec<String>,
    cap: usize,
}

impl Visitor for MoveCollector {
    type Result = Vec<String>;

    fn begin_game(&mut self) {
        self.moves.clear();
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.cap == 0 || self.moves.len() < self.cap {
            self.moves.push(san_plus.to_string());
        }
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {
        std::mem::take(&mut self.moves)
    }
}

/// Parse the first `cap` moves of a PGN game. `cap == 0` keeps every move.
pub fn moves_from_pgn(pgn: &str, cap: usize) -> Result<Vec<String>, FetchError> {
    let mut reader = BufferedReader::new_cursor(pgn.as_bytes());
    let mut collector = MoveCollector {
        moves: Vec::new(),
        cap,
    };
    match reader.read_game(&mut collector) {
        Ok(Some(moves)) => Ok(moves),
        Ok(None) => Err(FetchError::Decode("empty PGN".into())),
        Err(e) => Err(FetchError::Decode(format!("unreadable PGN: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PGN: &str = "\
[Event \"Live Chess\"]
[Site \"Chess.com\"]
[Result \"1-0\"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 1-0
";

    #[test]
    fn extracts_all_moves_with_no_cap() {
        let moves = moves_from_pgn(PGN, 0).unwrap();
        assert_eq!(moves, ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6"]);
    }

    #[test]
    fn cap_truncates_the_mainline() {
        let moves = moves_from_pgn(PGN, 5).unwrap();
        assert_eq!(moves, ["e4", "e5", "Nf3", "Nc6", "Bb5"]);
    }

    #[test]
    fn variations_and_comments_are_skipped() {
        let pgn = "1. e4 {king's pawn} e5 (1... c5 2. Nf3) 2. Nf3 $1 Nc6 *\n";
        let moves = moves_from_pgn(pgn, 0).unwrap();
        assert_eq!(moves, ["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn bare_movetext_without_headers_parses() {
        let moves = moves_from_pgn("1. d4 d5 2. c4 *\n", 0).unwrap();
        assert_eq!(moves, ["d4", "d5", "c4"]);
    }

    #[test]
    fn empty_input_is_a_decode_error() {
        let err = moves_from_pgn("", 0).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
