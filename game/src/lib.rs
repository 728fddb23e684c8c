//! Who's Older? game engine
//!
//! Builds an actor pool from TMDB, deals rounds of two actors within a
//! bounded age gap, and scores the player's streak against a locally
//! persisted best.

pub mod components;
pub mod config;
pub mod error;
pub mod pairing;
pub mod persistence;
pub mod pool;
pub mod scoring;
pub mod session;
pub mod share;
pub mod tmdb;

pub use components::*;
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use persistence::{FileStorage, LoadedPool, MemoryStorage, SavedState, Storage};
pub use pool::ActorPool;
pub use session::{GameSession, Outcome, Phase, Round};
