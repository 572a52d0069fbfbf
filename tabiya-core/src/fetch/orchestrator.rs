// Month-partitioned fetching through a bounded worker pool.
//
// The requested period is split into one job per calendar month. A fixed
// pool of workers pulls jobs from a bounded channel whose capacity equals
// the pool size, so the producer blocks once that many months are in
// flight — memory stays O(workers) for arbitrarily long ranges. Results
// and failures fan in over a second channel; nothing is retried, nothing
// is cancelled, and the call returns only after every job has finished.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

use super::PlatformClient;
use crate::GameFilter;
use crate::GameRecord;
use crate::error::{AggregateFetchError, MonthFailure};

/// Everything one fetch produced: the games of every month that succeeded
/// and a structured record of every month that did not. Callers must be
/// prepared for both to be non-empty at once.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Merged games in job-completion order — NOT chronological. Sort by
    /// `end_time` when order matters.
    pub games: Vec<GameRecord>,
    /// Failed months, sorted by (year, month).
    pub failures: Vec<MonthFailure>,
}

impl FetchOutcome {
    /// The combined error, if any month failed.
    pub fn error(self) -> (Vec<GameRecord>, Option<AggregateFetchError>) {
        let err = if self.failures.is_empty() {
            None
        } else {
            Some(AggregateFetchError {
                failures: self.failures,
            })
        };
        (self.games, err)
    }
}

/// Fetch every game the user played in `[filter.start, filter.end)`.
///
/// One bad month does not abort the others; see [`FetchOutcome`].
#[instrument(skip(client, filter), fields(start = %filter.start, end = %filter.end))]
pub async fn fetch_games(
    client: Arc<dyn PlatformClient>,
    username: &str,
    filter: &GameFilter,
    workers: usize,
) -> FetchOutcome {
    let months = months_in_range(filter.start, filter.end);
    let workers = workers.clamp(1, months.len().max(1));
    info!(months = months.len(), workers, "fetch starting");

    let (job_tx, job_rx) = mpsc::channel::<(i32, u32)>(workers);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let (out_tx, mut out_rx) = mpsc::channel::<Result<Vec<GameRecord>, MonthFailure>>(workers);

    let mut pool = Vec::with_capacity(workers);
    for _ in 0..workers {
        let client = Arc::clone(&client);
        let job_rx = Arc::clone(&job_rx);
        let out_tx = out_tx.clone();
        let username = username.to_owned();
        let filter = filter.clone();
        pool.push(tokio::spawn(async move {
            loop {
                // Hold the queue lock only while receiving, not while fetching.
                let job = { job_rx.lock().await.recv().await };
                let Some((year, month)) = job else { break };
                debug!(year, month, "fetching month");
                let outcome = match client.fetch_month(&username, year, month, &filter).await {
                    Ok(games) => Ok(games),
                    Err(source) => Err(MonthFailure {
                        year,
                        month,
                        source,
                    }),
                };
                if out_tx.send(outcome).await.is_err() {
                    break;
                }
            }
        }));
    }
    drop(out_tx);

    // The bounded job channel gives the producer backpressure, so it runs
    // concurrently with the aggregation below.
    let producer = tokio::spawn(async move {
        for job in months {
            if job_tx.send(job).await.is_err() {
                break;
            }
        }
    });

    let mut games = Vec::new();
    let mut failures = Vec::new();
    while let Some(outcome) = out_rx.recv().await {
        match outcome {
            Ok(batch) => games.extend(batch),
            Err(failure) => {
                warn!(year = failure.year, month = failure.month, error = %failure.source, "month failed");
                failures.push(failure);
            }
        }
    }
    let _ = producer.await;
    for worker in pool {
        let _ = worker.await;
    }

    failures.sort_by_key(|f| (f.year, f.month));
    info!(
        games = games.len(),
        failed_months = failures.len(),
        "fetch finished"
    );
    FetchOutcome { games, failures }
}

/// Every calendar month touched by `[start, end)`: inclusive of the month
/// containing `start`, exclusive boundary at `end`.
fn months_in_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let Some(first) = NaiveDate::from_ymd_opt(start.year(), start.month(), 1) else {
        return months;
    };
    let mut cursor = first;
    while Utc.from_utc_datetime(&cursor.and_time(NaiveTime::MIN)) < end {
        months.push((cursor.year(), cursor.month()));
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    months
}
