//! Fetching and configuration error types.
//!
//! Per-month failures are never retried and never abort sibling jobs; they
//! are collected into an [`AggregateFetchError`] that preserves each
//! failure's month, kind, and cause, so callers can filter or re-raise
//! selectively instead of grepping a concatenated string.

/// A single fetch request's failure, distinguishable by kind so the CLI
/// layer can react differently to a missing user vs. a flaky network.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The platform does not know this user.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// The platform answered with a non-success status.
    #[error("request failed (HTTP {status}): {body}")]
    Request {
        status: u16,
        body: String,
    },

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The platform's payload could not be decoded into game records.
    #[error("invalid game data: {0}")]
    Decode(String),
}

/// One calendar month's fetch failure.
#[derive(thiserror::Error, Debug)]
#[error("{year}.{month:02}: {source}")]
pub struct MonthFailure {
    pub year: i32,
    pub month: u32,
    #[source]
    pub source: FetchError,
}

/// Wraps every per-month failure of one fetch. Returned alongside whatever
/// games did fetch successfully — partial success is the expected shape.
#[derive(Debug)]
pub struct AggregateFetchError {
    pub failures: Vec<MonthFailure>,
}

impl std::fmt::Display for AggregateFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} month(s) failed to fetch: ", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFetchError {}

/// Errors in configuration loading and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("config file not found: {0}")]
    NotFound(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration values are present but semantically invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}
