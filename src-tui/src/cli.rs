//! Command line arguments and path resolution

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Who's Older? - guess which of two actors is older
#[derive(Parser, Debug)]
#[command(name = "whos-older")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// TMDB API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// JSON config file overriding game defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the saved state and log
    #[arg(long, env = "WHOS_OLDER_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log file (defaults to <data-dir>/whos-older.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play the game (default)
    Play(PlayArgs),
    /// Fetch an actor pool and save it for offline play
    FetchPool {
        /// Output file
        #[arg(long)]
        out: PathBuf,
        /// Seed for page selection
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the best streak
    Best,
    /// Reset the best streak to zero
    ResetBest,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayArgs {
    /// Play from a saved pool snapshot instead of fetching
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// Seed for round selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not write the best streak to disk
    #[arg(long)]
    pub no_save: bool,
}

impl Args {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Play(PlayArgs::default()))
    }

    /// `--data-dir`, else `$XDG_DATA_HOME/whos-older`, else
    /// `$HOME/.local/share/whos-older`, else the working directory
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg).join("whos-older");
        }
        if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(home).join(".local/share/whos-older");
        }
        PathBuf::from(".")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("whos-older.log"))
    }
}
