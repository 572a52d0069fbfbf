// Lichess client: the games export API, consumed as ndjson.
//
// The export endpoint takes epoch-millisecond `since`/`until` bounds, so a
// month job clamps the month window to the filter period and asks for
// moves inline (`moves=true`) — no PGN parsing needed, `moves` comes back
// as one space-separated SAN string per game.

use chrono::{Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::PlatformClient;
use crate::error::FetchError;
use crate::{Color, GameFilter, GameRecord};

/// Client for the Lichess export API.
#[derive(Debug)]
pub struct LichessClient {
    base_url: String,
    client: reqwest::Client,
}

impl LichessClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl PlatformClient for LichessClient {
    #[instrument(skip(self, filter), fields(platform = "lichess"))]
    async fn fetch_month(
        &self,
        username: &str,
        year: i32,
        month: u32,
        filter: &GameFilter,
    ) -> Result<Vec<GameRecord>, FetchError> {
        let (since, until) = month_window(year, month, filter)
            .ok_or_else(|| FetchError::Decode(format!("bad month {year}.{month:02}")))?;
        let mut url = format!(
            "{}/api/games/user/{}?since={since}&until={until}&moves=true",
            self.base_url,
            username.to_lowercase()
        );
        if let Some(color) = filter.color {
            url.push_str(match color {
                Color::White => "&color=white",
                Color::Black => "&color=black",
            });
        }
        debug!(url = %url, "requesting game export");
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/x-ndjson")
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

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        parse_ndjson(&body, username, filter.move_cap)
    }
}

/// The month's `[since, until)` window in epoch milliseconds, clamped to
/// the filter period.
fn month_window(year: i32, month: u32, filter: &GameFilter) -> Option<(i64, i64)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let start = Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN));
    let end = Utc.from_utc_datetime(
        &first
            .checked_add_months(Months::new(1))?
            .and_time(NaiveTime::MIN),
    );
    Some((
        start.max(filter.start).timestamp_millis(),
        end.min(filter.end).timestamp_millis(),
    ))
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ExportedGame {
    players: Players,
    #[serde(rename = "lastMoveAt")]
    last_move_at: i64,
    #[serde(default)]
    moves: String,
}

#[derive(Debug, Deserialize)]
struct Players {
    white: Side,
    black: Side,
}

#[derive(Debug, Default, Deserialize)]
struct Side {
    #[serde(default)]
    user: Option<NamedUser>,
}

#[derive(Debug, Deserialize)]
struct NamedUser {
    name: String,
}

impl Side {
    fn is(&self, username: &str) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.name.eq_ignore_ascii_case(username))
    }
}

/// One JSON game per line. Games whose players don't include the user
/// (anonymous opponents on both sides, renamed accounts) are skipped with
/// a warning rather than failing the month.
fn parse_ndjson(body: &str, username: &str, move_cap: usize) -> Result<Vec<GameRecord>, FetchError> {
    let mut records = Vec::new();
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let game: ExportedGame =
            serde_json::from_str(line).map_err(|e| FetchError::Decode(e.to_string()))?;
        let white = if game.players.white.is(username) {
            true
        } else if game.players.black.is(username) {
            false
        } else {
            warn!("skipping game without the requested user");
            continue;
        };
        let end_time = Utc
            .timestamp_millis_opt(game.last_move_at)
            .single()
            .ok_or_else(|| FetchError::Decode(format!("bad lastMoveAt {}", game.last_move_at)))?;
        let cap = if move_cap == 0 { usize::MAX } else { move_cap };
        let moves = game
            .moves
            .split_whitespace()
            .take(cap)
            .map(ToString::to_string)
            .collect();
        records.push(GameRecord {
            white,
            end_time,
            moves,
        });
    }
    Ok(records)
}
