//! TMDB data source
//!
//! `ActorSource` is the port the pool loader talks to; `TmdbClient` is the
//! HTTP adapter. Filtering of raw records lives in `filter`.

mod client;
pub mod filter;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::TmdbClient;
pub use types::*;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("failed to decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("no API key configured")]
    MissingApiKey,
}

/// Remote metadata provider for people and their film credits
#[async_trait]
pub trait ActorSource: Send + Sync {
    /// One page of the popular-people listing
    async fn popular_page(&self, page: u32) -> Result<Vec<PopularPerson>, SourceError>;

    async fn person_details(&self, id: u64) -> Result<PersonDetails, SourceError>;

    /// Cast credits for a person's films
    async fn movie_credits(&self, id: u64) -> Result<Vec<CastCredit>, SourceError>;
}
