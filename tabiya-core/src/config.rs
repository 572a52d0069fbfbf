use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Public API root of the chess.com monthly archives.
pub const CHESSCOM_API_URL: &str = "https://api.chess.com/pub";
/// Root of the Lichess export API.
pub const LICHESS_API_URL: &str = "https://lichess.org";

/// Fetch configuration, overridable from a TOML file. Passed explicitly
/// into the commands that need it — there is no package-wide mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL of the chess.com public API.
    #[serde(default = "default_chesscom_url")]
    pub chesscom_url: String,
    /// Base URL of the Lichess API.
    #[serde(default = "default_lichess_url")]
    pub lichess_url: String,
    /// Size of the fetch worker pool.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_chesscom_url() -> String {
    CHESSCOM_API_URL.to_string()
}

fn default_lichess_url() -> String {
    LICHESS_API_URL.to_string()
}

fn default_workers() -> usize {
    4
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            chesscom_url: default_chesscom_url(),
            lichess_url: default_lichess_url(),
            workers: default_workers(),
        }
    }
}

impl FetchConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.chesscom_url.is_empty() || self.lichess_url.is_empty() {
            return Err(ConfigError::Invalid("platform URLs must not be empty".into()));
        }
        Ok(())
    }
}
