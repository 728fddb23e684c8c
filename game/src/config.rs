//! Game configuration
//!
//! Every field has a default, so a config file only needs the values it
//! overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub fetch: FetchConfig,
    pub round: RoundConfig,
    pub timing: TimingConfig,
    /// Link appended to share messages
    pub share_url: Option<String>,
}

/// Remote source and filtering thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    pub language: String,
    /// Language a known-for work must have for a person to qualify
    pub known_for_language: String,
    pub request_timeout_secs: u64,
    /// Popular-people pages sampled per pool build
    pub pages_to_fetch: usize,
    /// Highest popular page number considered
    pub max_pages: u32,
    /// Upper bound on candidates whose details are fetched
    pub pool_size: usize,
    pub min_valid_actors: usize,
    pub min_popularity: f64,
    pub min_known_for: usize,
    pub min_movie_popularity: f64,
    pub min_movie_votes: u64,
    pub movies_per_actor: usize,
    pub min_movies: usize,
    /// In-flight detail requests
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            language: "en-US".to_string(),
            known_for_language: "en".to_string(),
            request_timeout_secs: 10,
            pages_to_fetch: 10,
            max_pages: 20,
            pool_size: 100,
            min_valid_actors: 10,
            min_popularity: 15.0,
            min_known_for: 3,
            min_movie_popularity: 10.0,
            min_movie_votes: 100,
            movies_per_actor: 5,
            min_movies: 2,
            concurrency: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Largest allowed age difference between the two actors of a round
    pub max_age_gap: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self { max_age_gap: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub reveal_ms: u64,
    pub game_over_delay_ms: u64,
    pub tutorial_ms: u64,
    pub copied_flash_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_ms: 2000,
            game_over_delay_ms: 1500,
            tutorial_ms: 10_000,
            copied_flash_ms: 2000,
        }
    }
}

impl TimingConfig {
    pub fn reveal(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    pub fn tutorial(&self) -> Duration {
        Duration::from_millis(self.tutorial_ms)
    }

    pub fn copied_flash(&self) -> Duration {
        Duration::from_millis(self.copied_flash_ms)
    }
}

impl GameConfig {
    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: display, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.max_pages == 0 {
            return Err(ConfigError::Invalid("fetch.max_pages must be at least 1".into()));
        }
        if self.fetch.concurrency == 0 {
            return Err(ConfigError::Invalid("fetch.concurrency must be at least 1".into()));
        }
        if self.fetch.min_valid_actors < 2 {
            return Err(ConfigError::Invalid(
                "fetch.min_valid_actors must be at least 2".into(),
            ));
        }
        Ok(())
    }
}
