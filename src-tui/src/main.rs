//! Who's Older? terminal front end.
//!
//! ## Usage
//!
//! ```bash
//! # Fetch a fresh pool from TMDB and play
//! TMDB_API_KEY=... whos-older
//!
//! # Save a pool once, then play it offline
//! whos-older fetch-pool --out pool.json
//! whos-older play --pool pool.json
//! ```

mod app;
mod cli;
mod ui;

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::persistence::{load_pool, save_pool};
use game::pool::{load_actor_pool, pick_pages};
use game::tmdb::TmdbClient;
use game::{FileStorage, GameConfig, MemoryStorage, SavedState, Storage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::{App, AppStorage, PoolOrigin};
use cli::{Args, Command, PlayArgs};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

const MISSING_KEY: &str = "No TMDB API key configured. Set TMDB_API_KEY or pass --api-key.";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The UI owns the terminal while playing, so logs go to a file
fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.fetch.base_url = base_url.clone();
    }

    match args.command() {
        Command::Play(play) => {
            init_file_logging(&args.log_file())?;
            play_game(&args, play, config)
        }
        Command::FetchPool { out, seed } => {
            init_stderr_logging();
            fetch_pool(&args, &config, &out, seed).await
        }
        Command::Best => {
            init_stderr_logging();
            let state = FileStorage::in_dir(&args.data_dir())
                .load()
                .context("reading saved state")?;
            println!("Best streak: {}", state.best_streak);
            Ok(())
        }
        Command::ResetBest => {
            init_stderr_logging();
            let mut storage = FileStorage::in_dir(&args.data_dir());
            let previous = storage.load().unwrap_or_else(|e| {
                warn!(error = %e, "saved state unreadable, overwriting");
                SavedState::default()
            });
            storage
                .save(&SavedState {
                    best_streak: 0,
                    ..previous
                })
                .context("writing saved state")?;
            println!("Best streak reset (was {})", previous.best_streak);
            Ok(())
        }
    }
}

fn pool_origin(args: &Args, play: &PlayArgs, config: &GameConfig) -> Result<PoolOrigin> {
    if let Some(path) = &play.pool {
        let loaded = load_pool(path).with_context(|| format!("loading pool {}", path.display()))?;
        info!(
            actors = loaded.pool.len(),
            created = %loaded.created,
            "using saved actor pool"
        );
        return Ok(PoolOrigin::Snapshot(loaded.pool));
    }

    Ok(match &args.api_key {
        Some(key) => match TmdbClient::from_config(&config.fetch, key.clone()) {
            Ok(client) => PoolOrigin::Remote(Arc::new(client)),
            Err(e) => PoolOrigin::Unavailable(e.to_string()),
        },
        None => PoolOrigin::Unavailable(MISSING_KEY.to_string()),
    })
}

fn play_game(args: &Args, play: PlayArgs, config: GameConfig) -> Result<()> {
    let origin = pool_origin(args, &play, &config)?;

    let file_storage = FileStorage::in_dir(&args.data_dir());
    let storage = if play.no_save {
        AppStorage::Memory(MemoryStorage::new(file_storage.load().unwrap_or_default()))
    } else {
        info!(path = %file_storage.path().display(), "saving state");
        AppStorage::File(file_storage)
    };

    // Setup terminal with panic hook for cleanup
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(origin, storage, config, play.seed);
    app.start_loading(Instant::now());

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    for message in &app.shared_messages {
        println!("{}\n", message);
    }

    result
}

/// Main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|frame| ui::render(frame, app, now))?;

        if app.should_quit {
            return Ok(());
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Press {
            app.on_key(key.code, Instant::now());
        }
    }
}

async fn fetch_pool(args: &Args, config: &GameConfig, out: &Path, seed: Option<u64>) -> Result<()> {
    let key = args.api_key.clone().context(MISSING_KEY)?;
    let client = TmdbClient::from_config(&config.fetch, key)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let pages = pick_pages(&mut rng, config.fetch.pages_to_fetch, config.fetch.max_pages);
    let today = chrono::Local::now().date_naive();

    info!(pages = ?pages, "fetching actor pool");
    let started = Instant::now();
    let pool = load_actor_pool(&client, &config.fetch, &pages, today, &HashSet::new())
        .await
        .context("Failed to fetch actor pool")?;

    let stats = save_pool(out, &pool, today).with_context(|| format!("writing {}", out.display()))?;
    info!(elapsed = ?started.elapsed(), "pool saved");
    println!(
        "Saved {} actors to {} ({} bytes)",
        stats.actors,
        out.display(),
        stats.file_bytes
    );
    Ok(())
}
