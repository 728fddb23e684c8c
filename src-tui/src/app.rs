//! Application state management.
//!
//! Wraps a `GameSession` with the things only the terminal front end cares
//! about: pool loading, card flips, overlays and share notices.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyCode;
use game::persistence::PersistenceError;
use game::pool::{load_actor_pool, pick_pages};
use game::tmdb::TmdbClient;
use game::{ActorId, ActorPool, FileStorage, GameConfig, GameSession, MemoryStorage, SavedState, Storage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

// ============================================================================
// Storage
// ============================================================================

/// Storage chosen on the command line
#[derive(Debug, Clone)]
pub enum AppStorage {
    File(FileStorage),
    Memory(MemoryStorage),
}

impl Storage for AppStorage {
    fn load(&self) -> Result<SavedState, PersistenceError> {
        match self {
            AppStorage::File(s) => s.load(),
            AppStorage::Memory(s) => s.load(),
        }
    }

    fn save(&mut self, state: &SavedState) -> Result<(), PersistenceError> {
        match self {
            AppStorage::File(s) => s.save(state),
            AppStorage::Memory(s) => s.save(state),
        }
    }
}

// ============================================================================
// State
// ============================================================================

/// Where the actor pool comes from
pub enum PoolOrigin {
    Remote(Arc<TmdbClient>),
    Snapshot(ActorPool),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Failed(String),
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    HowToPlay,
    Share,
    Privacy,
    Credits,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::HowToPlay,
        MenuItem::Share,
        MenuItem::Privacy,
        MenuItem::Credits,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::HowToPlay => "How to Play",
            MenuItem::Share => "Share",
            MenuItem::Privacy => "Privacy",
            MenuItem::Credits => "Credits",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub selected: usize,
    pub open: Option<MenuItem>,
}

/// A share message that was just produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareNotice {
    pub text: String,
    pub until: Instant,
}

pub type Session = GameSession<AppStorage>;

type PoolResult = game::Result<ActorPool>;

pub struct App {
    config: GameConfig,
    origin: PoolOrigin,
    storage: AppStorage,
    seed: Option<u64>,
    pending: Option<oneshot::Receiver<PoolResult>>,
    dealt: Option<[ActorId; 2]>,

    pub screen: Screen,
    pub session: Option<Session>,
    pub loading_started: Instant,
    /// Movie list showing instead of the portrait, per card
    pub flipped: [bool; 2],
    pub menu: Option<MenuState>,
    pub tutorial_until: Option<Instant>,
    pub share: Option<ShareNotice>,
    /// Everything shared this run, printed after the terminal is restored
    pub shared_messages: Vec<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(origin: PoolOrigin, storage: AppStorage, config: GameConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            origin,
            storage,
            seed,
            pending: None,
            dealt: None,
            screen: Screen::Loading,
            session: None,
            loading_started: Instant::now(),
            flipped: [false; 2],
            menu: None,
            tutorial_until: None,
            share: None,
            shared_messages: Vec::new(),
            should_quit: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build or fetch the pool. Remote fetches run on the tokio runtime and
    /// are picked up by `tick`.
    pub fn start_loading(&mut self, now: Instant) {
        self.end_session();
        self.dealt = None;
        self.loading_started = now;

        match &self.origin {
            PoolOrigin::Snapshot(pool) => {
                let pool = pool.clone();
                self.begin_session(pool, now);
            }
            PoolOrigin::Remote(client) => {
                let client = Arc::clone(client);
                let fetch = self.config.fetch.clone();
                let pages = pick_pages(&mut rand::thread_rng(), fetch.pages_to_fetch, fetch.max_pages);
                let today = chrono::Local::now().date_naive();
                let (tx, rx) = oneshot::channel();

                info!(pages = ?pages, "fetching actor pool");
                tokio::spawn(async move {
                    let result =
                        load_actor_pool(client.as_ref(), &fetch, &pages, today, &HashSet::new()).await;
                    let _ = tx.send(result);
                });

                self.pending = Some(rx);
                self.screen = Screen::Loading;
            }
            PoolOrigin::Unavailable(reason) => {
                self.screen = Screen::Failed(reason.clone());
            }
        }
    }

    fn begin_session(&mut self, pool: ActorPool, now: Instant) {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        match GameSession::new(pool, self.storage.clone(), self.config.clone(), rng) {
            Ok(session) => {
                if !session.has_seen_tutorial() {
                    self.tutorial_until = Some(now + self.config.timing.tutorial());
                }
                self.dealt = Some(session.round().ids());
                self.flipped = [false; 2];
                self.session = Some(session);
                self.screen = Screen::Playing;
            }
            Err(e) => self.fail(format!("Failed to initialize actor pool. {}", e)),
        }
    }

    /// Drop the session, keeping whatever it saved for the next one
    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.storage = session.into_storage();
        }
    }

    fn fail(&mut self, message: String) {
        error!(%message, "game unavailable");
        self.end_session();
        self.screen = Screen::Failed(message);
    }

    fn poll_loading(&mut self, now: Instant) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(pool)) => {
                self.pending = None;
                self.begin_session(pool, now);
            }
            Ok(Err(e)) => {
                self.pending = None;
                self.fail(format!("Failed to initialize actor pool. {}", e));
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                self.fail("Pool loader stopped unexpectedly.".to_string());
            }
        }
    }

    /// Periodic update: loader results, session timers and overlay expiry
    pub fn tick(&mut self, now: Instant) {
        self.poll_loading(now);

        let advanced = self.session.as_mut().map(|s| s.advance(now));
        if let Some(Err(e)) = advanced {
            self.fail(format!("Failed to load new round. {}", e));
            return;
        }

        if let Some(session) = &self.session {
            let ids = session.round().ids();
            if self.dealt != Some(ids) {
                self.dealt = Some(ids);
                self.flipped = [false; 2];
            }
        }

        if self.tutorial_until.is_some_and(|until| now >= until) {
            self.dismiss_tutorial();
        }
        if self.share.as_ref().is_some_and(|notice| now >= notice.until) {
            self.share = None;
        }
    }

    pub fn dismiss_tutorial(&mut self) {
        self.tutorial_until = None;
        if let Some(session) = self.session.as_mut() {
            session.mark_tutorial_seen();
        }
    }

    fn record_share(&mut self, text: String, now: Instant) {
        info!("share message produced");
        self.shared_messages.push(text.clone());
        self.share = Some(ShareNotice {
            text,
            until: now + self.config.timing.copied_flash(),
        });
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn on_key(&mut self, code: KeyCode, now: Instant) {
        if self.tutorial_until.is_some() {
            self.dismiss_tutorial();
            return;
        }
        if self.menu.is_some() {
            self.on_menu_key(code, now);
            return;
        }

        match self.screen {
            Screen::Loading => {
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.should_quit = true;
                }
            }
            Screen::Failed(_) => match code {
                KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => self.start_loading(now),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            Screen::Playing => self.on_game_key(code, now),
        }
    }

    fn on_game_key(&mut self, code: KeyCode, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.show_game_over_modal() {
            match code {
                KeyCode::Char('s') => {
                    let text = session.share_message();
                    self.record_share(text, now);
                }
                KeyCode::Enter | KeyCode::Char('p') => self.play_again(),
                KeyCode::Esc | KeyCode::Char('c') => session.dismiss_game_over(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('1') | KeyCode::Left => self.pick(0, now),
            KeyCode::Char('2') | KeyCode::Right => self.pick(1, now),
            KeyCode::Char('f') => self.flipped[0] = !self.flipped[0],
            KeyCode::Char('g') => self.flipped[1] = !self.flipped[1],
            KeyCode::Enter | KeyCode::Char('p') => self.play_again(),
            KeyCode::Char('s') if session.is_game_over() => {
                let text = session.share_message();
                self.record_share(text, now);
            }
            KeyCode::Char('m') => self.menu = Some(MenuState::default()),
            KeyCode::Esc if session.is_game_over() => session.dismiss_game_over(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn pick(&mut self, position: usize, now: Instant) {
        if self.flipped[position] {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let id = session.round().actors[position].id;
        if let Some(outcome) = session.choose(id, now) {
            info!(
                correct = outcome.correct,
                streak = outcome.streak,
                best_streak = outcome.best_streak,
                "pick"
            );
        }
    }

    fn play_again(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.play_again() {
            warn!(error = %e, "could not start a new run");
            self.fail(format!("Failed to load new round. {}", e));
        }
    }

    fn on_menu_key(&mut self, code: KeyCode, now: Instant) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };

        if let Some(item) = menu.open {
            match code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => menu.open = None,
                KeyCode::Char('m') => self.menu = None,
                KeyCode::Enter | KeyCode::Char('s') if item == MenuItem::Share => {
                    let text = game::share::invite_message(self.config.share_url.as_deref());
                    self.record_share(text, now);
                }
                _ => {}
            }
            return;
        }

        let count = MenuItem::ALL.len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => menu.selected = (menu.selected + count - 1) % count,
            KeyCode::Down | KeyCode::Char('j') => menu.selected = (menu.selected + 1) % count,
            KeyCode::Enter | KeyCode::Right => menu.open = Some(MenuItem::ALL[menu.selected]),
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => self.menu = None,
            _ => {}
        }
    }
}
