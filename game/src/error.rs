//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::pairing::PairingError;
use crate::persistence::PersistenceError;
use crate::tmdb::SourceError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to fetch actor pool: {0}")]
    Source(#[from] SourceError),
    #[error("not enough valid actors found ({found} of {required})")]
    NotEnoughActors { found: usize, required: usize },
    #[error(transparent)]
    Pairing(#[from] PairingError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, GameError>;
