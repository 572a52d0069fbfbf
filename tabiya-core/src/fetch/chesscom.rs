// chess.com client: monthly game archives via the public REST API.

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{PlatformClient, pgn};
use crate::error::FetchError;
use crate::{Color, GameFilter, GameRecord};

/// Client for the chess.com published-data API.
#[derive(Debug)]
pub struct ChessComClient {
    base_url: String,
    client: reqwest::Client,
}

impl ChessComClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl PlatformClient for ChessComClient {
    #[instrument(skip(self, filter), fields(platform = "chesscom"))]
    async fn fetch_month(
        &self,
        username: &str,
        year: i32,
        month: u32,
        filter: &GameFilter,
    ) -> Result<Vec<GameRecord>, FetchError> {
        let url = format!(
            "{}/player/{}/games/{year}/{month:02}",
            self.base_url,
            username.to_lowercase()
        );
        debug!(url = %url, "requesting monthly archive");
        let resp = self
            .client
            .get(&url)
            .header("User-Agent", "tabiya/0.1")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::UserNotFound(username.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Request {
                status: status.as_u16(),
                body,
            });
        }

        let archive: MonthArchive = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        convert_archive(archive, username, filter)
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MonthArchive {
    games: Vec<ArchivedGame>,
}

#[derive(Debug, Deserialize)]
struct ArchivedGame {
    #[serde(default)]
    pgn: Option<String>,
    end_time: i64,
    rules: String,
    white: PlayerRef,
    black: PlayerRef,
}

#[derive(Debug, Deserialize)]
struct PlayerRef {
    username: String,
}

/// Normalize one month's archive: standard chess only, the color filter
/// applied, moves truncated to the cap.
fn convert_archive(
    archive: MonthArchive,
    username: &str,
    filter: &GameFilter,
) -> Result<Vec<GameRecord>, FetchError> {
    let mut records = Vec::with_capacity(archive.games.len());
    for game in archive.games {
        // Variants (960, bughouse, ...) share the archive with standard games.
        if game.rules != "chess" {
            continue;
        }
        let Some(game_pgn) = game.pgn else { continue };
        let white = if game.white.username.eq_ignore_ascii_case(username) {
            true
        } else if game.black.username.eq_ignore_ascii_case(username) {
            false
        } else {
            tracing::warn!(white = %game.white.username, black = %game.black.username, "skipping game without the requested user");
            continue;
        };
        if let Some(color) = filter.color {
            if (color == Color::White) != white {
                continue;
            }
        }
        let end_time = Utc
            .timestamp_opt(game.end_time, 0)
            .single()
            .ok_or_else(|| FetchError::Decode(format!("bad end_time {}", game.end_time)))?;
        let moves = pgn::moves_from_pgn(&game_pgn, filter.move_cap)?;
        records.push(GameRecord {
            white,
            end_time,
            moves,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    const ARCHIVE: &str = r#"{
        "games": [
            {
                "url": "https://www.chess.com/game/live/1",
                "pgn": "[Event \"Live Chess\"]\n\n1. e4 e5 2. Nf3 Nc6 1-0\n",
                "time_control": "600",
                "end_time": 1634236200,
                "rules": "chess",
                "white": {"username": "Somebody", "rating": 1200, "result": "win"},
                "black": {"username": "Opponent", "rating": 1180, "result": "resigned"}
            },
            {
                "url": "https://www.chess.com/game/live/2",
                "pgn": "1. d4 d5 2. c4 e6 0-1\n",
                "time_control": "600",
                "end_time": 1634237000,
                "rules": "chess",
                "white": {"username": "Opponent", "rating": 1180, "result": "win"},
                "black": {"username": "somebody", "rating": 1200, "result": "resigned"}
            },
            {
                "url": "https://www.chess.com/game/live/3",
                "pgn": "1. e4 e5 1-0\n",
                "time_control": "600",
                "end_time": 1634238000,
                "rules": "chess960",
                "white": {"username": "somebody", "rating": 1200, "result": "win"},
                "black": {"username": "Opponent", "rating": 1180, "result": "resigned"}
            }
        ]
    }"#;

    fn parsed() -> MonthArchive {
        serde_json::from_str(ARCHIVE).unwrap()
    }

    fn filter(color: Option<Color>, move_cap: usize) -> GameFilter {
        GameFilter {
            start: DateTime::UNIX_EPOCH,
            end: Utc::now(),
            color,
            move_cap,
        }
    }

    #[test]
    fn archive_json_deserializes() {
        let archive = parsed();
        assert_eq!(archive.games.len(), 3);
        assert_eq!(archive.games[0].white.username, "Somebody");
        assert_eq!(archive.games[2].rules, "chess960");
    }

    #[test]
    fn variants_are_filtered_out() {
        let records = convert_archive(parsed(), "somebody", &filter(None, 0)).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn username_match_is_case_insensitive() {
        let records = convert_archive(parsed(), "SOMEBODY", &filter(None, 0)).unwrap();
        assert!(records[0].white);
        assert!(!records[1].white);
    }

    #[test]
    fn color_filter_drops_the_other_side() {
        let records = convert_archive(parsed(), "somebody", &filter(Some(Color::Black), 0)).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].white);
        assert_eq!(records[0].moves, ["d4", "d5", "c4", "e6"]);
    }

    #[test]
    fn move_cap_truncates() {
        let records = convert_archive(parsed(), "somebody", &filter(None, 3)).unwrap();
        assert_eq!(records[0].moves, ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn end_time_converts_from_unix_seconds() {
        let records = convert_archive(parsed(), "somebody", &filter(None, 0)).unwrap();
        assert_eq!(
            records[0].end_time,
            Utc.timestamp_opt(1_634_236_200, 0).unwrap()
        );
    }
}
