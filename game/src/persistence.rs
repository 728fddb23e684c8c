//! Persistence module for local game state and actor pool snapshots
//!
//! The only durable game state is the best streak and whether the tutorial
//! has been seen. Pool snapshots let a fetched pool be replayed offline.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::components::Actor;
use crate::pool::ActorPool;

/// Schema version of the state file
pub const STATE_VERSION: u8 = 1;

/// Schema version of pool snapshots
pub const POOL_VERSION: u8 = 1;

pub const STATE_FILE_NAME: &str = "state.json";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported file version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write through a temp file so a crash never leaves a truncated file
fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))
}

// ============================================================================
// Game state
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub best_streak: u32,
    pub has_seen_tutorial: bool,
}

/// On-disk form of `SavedState`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateFile {
    version: u8,
    #[serde(default)]
    best_streak: u32,
    #[serde(default)]
    has_seen_tutorial: bool,
}

/// Key-value style store for the saved state
pub trait Storage {
    fn load(&self) -> Result<SavedState, PersistenceError>;
    fn save(&mut self, state: &SavedState) -> Result<(), PersistenceError>;
}

/// JSON file store, one document per data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/state.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<SavedState, PersistenceError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved state, using defaults");
            return Ok(SavedState::default());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| io_error(&self.path, e))?;
        let file: StateFile = serde_json::from_str(&raw)?;
        if file.version != STATE_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: file.version,
                expected: STATE_VERSION,
            });
        }

        Ok(SavedState {
            best_streak: file.best_streak,
            has_seen_tutorial: file.has_seen_tutorial,
        })
    }

    fn save(&mut self, state: &SavedState) -> Result<(), PersistenceError> {
        let file = StateFile {
            version: STATE_VERSION,
            best_streak: state.best_streak,
            has_seen_tutorial: state.has_seen_tutorial,
        };
        write_atomic(&self.path, &serde_json::to_string_pretty(&file)?)
    }
}

/// In-memory store, for tests and `--no-save` play
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: SavedState,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStorage {
    pub fn new(state: SavedState) -> Self {
        Self { state, saves: 0 }
    }

    pub fn state(&self) -> SavedState {
        self.state
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<SavedState, PersistenceError> {
        Ok(self.state)
    }

    fn save(&mut self, state: &SavedState) -> Result<(), PersistenceError> {
        self.state = *state;
        self.saves += 1;
        Ok(())
    }
}

// ============================================================================
// Pool snapshots
// ============================================================================

/// Complete actor pool for offline replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub version: u8,
    /// Day the ages were computed on
    pub created: NaiveDate,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Clone)]
pub struct SaveStats {
    pub actors: u32,
    pub file_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct LoadedPool {
    pub pool: ActorPool,
    pub created: NaiveDate,
}

pub fn export_pool(pool: &ActorPool, created: NaiveDate) -> Result<String, PersistenceError> {
    let snapshot = PoolSnapshot {
        version: POOL_VERSION,
        created,
        actors: pool.actors().to_vec(),
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

pub fn import_pool(json: &str) -> Result<LoadedPool, PersistenceError> {
    let snapshot: PoolSnapshot = serde_json::from_str(json)?;
    if snapshot.version != POOL_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: snapshot.version,
            expected: POOL_VERSION,
        });
    }

    Ok(LoadedPool {
        pool: ActorPool::new(snapshot.actors),
        created: snapshot.created,
    })
}

pub fn save_pool(path: &Path, pool: &ActorPool, created: NaiveDate) -> Result<SaveStats, PersistenceError> {
    let json = export_pool(pool, created)?;
    write_atomic(path, &json)?;

    info!(path = %path.display(), actors = pool.len(), "pool snapshot saved");
    Ok(SaveStats {
        actors: pool.len() as u32,
        file_bytes: json.len() as u64,
    })
}

pub fn load_pool(path: &Path) -> Result<LoadedPool, PersistenceError> {
    let raw = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let loaded = import_pool(&raw)?;

    info!(path = %path.display(), actors = loaded.pool.len(), created = %loaded.created, "pool snapshot loaded");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ActorId, Movie};

    fn sample_pool() -> ActorPool {
        ActorPool::new(vec![
            Actor {
                id: ActorId(1),
                name: "First".into(),
                profile_path: "/1.jpg".into(),
                birthday: NaiveDate::from_ymd_opt(1950, 2, 3).unwrap(),
                deathday: NaiveDate::from_ymd_opt(2010, 4, 5),
                age: 60,
                movies: vec![Movie {
                    id: 10,
                    title: "Film".into(),
                    release_date: NaiveDate::from_ymd_opt(1999, 1, 1).unwrap(),
                    character: "Lead".into(),
                }],
            },
            Actor {
                id: ActorId(2),
                name: "Second".into(),
                profile_path: "/2.jpg".into(),
                birthday: NaiveDate::from_ymd_opt(1960, 7, 8).unwrap(),
                deathday: None,
                age: 63,
                movies: Vec::new(),
            },
        ])
    }

    #[test]
    fn test_missing_state_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        assert_eq!(storage.load().unwrap(), SavedState::default());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let mut storage = FileStorage::in_dir(&nested);
        let state = SavedState { best_streak: 17, has_seen_tutorial: true };
        storage.save(&state).unwrap();

        let reopened = FileStorage::in_dir(&nested);
        assert_eq!(reopened.load().unwrap(), state);
        assert!(!nested.join("state.tmp").exists());
    }

    #[test]
    fn test_corrupt_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "not json").unwrap();
        assert!(matches!(storage.load(), Err(PersistenceError::Json(_))));

        fs::write(storage.path(), r#"{"version": 9, "best_streak": 3}"#).unwrap();
        assert!(matches!(
            storage.load(),
            Err(PersistenceError::UnsupportedVersion { found: 9, expected: 1 })
        ));
    }

    #[test]
    fn test_pool_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        let created = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let stats = save_pool(&path, &sample_pool(), created).unwrap();
        assert_eq!(stats.actors, 2);
        assert!(stats.file_bytes > 0);

        let loaded = load_pool(&path).unwrap();
        assert_eq!(loaded.created, created);
        assert_eq!(loaded.pool, sample_pool());
    }

    #[test]
    fn test_pool_snapshot_version_checked() {
        let json = r#"{"version": 2, "created": "2024-01-01", "actors": []}"#;
        assert!(matches!(
            import_pool(json),
            Err(PersistenceError::UnsupportedVersion { found: 2, .. })
        ));
    }
}
