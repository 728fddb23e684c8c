//! Game Session - round and scoring controller
//!
//! Owns the actor pool, the current round and the streak. Timed transitions
//! (reveal, game-over modal) are driven by `advance` with the caller's clock.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::components::{Actor, ActorId};
use crate::config::GameConfig;
use crate::error::Result;
use crate::pairing::{select_pair, Exclusions, Pairing, PairingError};
use crate::persistence::{SavedState, Storage};
use crate::pool::ActorPool;
use crate::scoring::{is_correct, older_of, Streak, Verdict};
use crate::share;

/// The two actors on the table, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub actors: [Actor; 2],
}

impl Round {
    fn from_pairing(pool: &ActorPool, pairing: Pairing) -> std::result::Result<Self, PairingError> {
        let lookup = |id| pool.get(id).cloned().ok_or(PairingError::UnknownActor { id });
        Ok(Self {
            actors: [lookup(pairing.first)?, lookup(pairing.second)?],
        })
    }

    pub fn ids(&self) -> [ActorId; 2] {
        [self.actors[0].id, self.actors[1].id]
    }

    pub fn position(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|actor| actor.id == id)
    }

    pub fn verdict(&self) -> Verdict {
        older_of(&self.actors[0], &self.actors[1])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player to pick a card
    Choosing,
    /// Correct pick; ages shown until the next round loads
    Revealed { next_round_at: Instant },
    /// Wrong pick; ages shown until the modal opens
    GameOver { modal_at: Instant },
    GameOverModal,
    /// Modal closed, waiting for "play again"
    AwaitingRestart,
}

/// Result of a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub chosen: ActorId,
    pub correct: bool,
    pub verdict: Verdict,
    pub streak: u32,
    pub best_streak: u32,
    pub new_high: bool,
}

pub struct GameSession<S: Storage, R: Rng = StdRng> {
    pool: ActorPool,
    storage: S,
    config: GameConfig,
    rng: R,
    exclusions: Exclusions,
    round: Round,
    phase: Phase,
    streak: Streak,
    selected: Option<ActorId>,
    last_streak: u32,
    has_seen_tutorial: bool,
}

impl<S: Storage, R: Rng> GameSession<S, R> {
    /// Start a session: restore saved state and deal the first round
    pub fn new(pool: ActorPool, storage: S, config: GameConfig, mut rng: R) -> Result<Self> {
        let saved = storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "could not read saved state, starting fresh");
            SavedState::default()
        });

        let mut exclusions = Exclusions::new();
        let pairing = select_pair(&pool, &mut exclusions, &config.round, &mut rng)?;
        let round = Round::from_pairing(&pool, pairing)?;

        info!(
            actors = pool.len(),
            best_streak = saved.best_streak,
            "game session started"
        );

        Ok(Self {
            pool,
            storage,
            config,
            rng,
            exclusions,
            round,
            phase: Phase::Choosing,
            streak: Streak::with_best(saved.best_streak),
            selected: None,
            last_streak: 0,
            has_seen_tutorial: saved.has_seen_tutorial,
        })
    }

    fn deal(&mut self) -> Result<()> {
        let pairing = select_pair(&self.pool, &mut self.exclusions, &self.config.round, &mut self.rng)?;
        self.round = Round::from_pairing(&self.pool, pairing)?;
        self.selected = None;
        self.phase = Phase::Choosing;

        debug!(
            first = %pairing.first,
            second = %pairing.second,
            reset = pairing.reset,
            "new round"
        );
        Ok(())
    }

    fn persist(&mut self) {
        let state = SavedState {
            best_streak: self.streak.best(),
            has_seen_tutorial: self.has_seen_tutorial,
        };
        if let Err(e) = self.storage.save(&state) {
            warn!(error = %e, "failed to save game state");
        }
    }

    /// Pick the actor believed to be older.
    ///
    /// Returns `None` when no pick is allowed right now or `id` is not on
    /// the table.
    pub fn choose(&mut self, id: ActorId, now: Instant) -> Option<Outcome> {
        if self.phase != Phase::Choosing || self.round.position(id).is_none() {
            return None;
        }

        self.selected = Some(id);
        let [first, second] = &self.round.actors;
        let correct = is_correct(first, second, id);

        if correct {
            if self.streak.record_correct() {
                info!(best_streak = self.streak.best(), "new best streak");
                self.persist();
            }
            self.phase = Phase::Revealed {
                next_round_at: now + self.config.timing.reveal(),
            };
        } else {
            self.last_streak = self.streak.record_miss();
            info!(streak = self.last_streak, "game over");
            self.phase = Phase::GameOver {
                modal_at: now + self.config.timing.game_over_delay(),
            };
        }

        Some(Outcome {
            chosen: id,
            correct,
            verdict: self.round.verdict(),
            streak: self.streak.current(),
            best_streak: self.streak.best(),
            new_high: self.streak.is_new_high(),
        })
    }

    /// Fire any timed transition that is due. Returns `true` if the phase
    /// changed.
    pub fn advance(&mut self, now: Instant) -> Result<bool> {
        match self.phase {
            Phase::Revealed { next_round_at } if now >= next_round_at => {
                self.deal()?;
                Ok(true)
            }
            Phase::GameOver { modal_at } if now >= modal_at => {
                self.phase = Phase::GameOverModal;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Deal a new round immediately. Does nothing once the game is over.
    pub fn load_new_round(&mut self) -> Result<bool> {
        if !self.can_advance() {
            return Ok(false);
        }
        self.deal()?;
        Ok(true)
    }

    /// Close the game-over modal (or skip it if still pending)
    pub fn dismiss_game_over(&mut self) {
        if matches!(self.phase, Phase::GameOver { .. } | Phase::GameOverModal) {
            self.phase = Phase::AwaitingRestart;
            self.streak.clear_new_high();
        }
    }

    /// Start a fresh run after a game over
    pub fn play_again(&mut self) -> Result<bool> {
        if !self.is_game_over() {
            return Ok(false);
        }
        self.streak.reset_run();
        self.last_streak = 0;
        self.deal()?;
        info!("new run started");
        Ok(true)
    }

    pub fn mark_tutorial_seen(&mut self) {
        if !self.has_seen_tutorial {
            self.has_seen_tutorial = true;
            self.persist();
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pool(&self) -> &ActorPool {
        &self.pool
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// End the session, handing back its storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn streak(&self) -> u32 {
        self.streak.current()
    }

    pub fn best_streak(&self) -> u32 {
        self.streak.best()
    }

    /// Streak that ended with the last miss
    pub fn last_streak(&self) -> u32 {
        self.last_streak
    }

    pub fn is_new_high(&self) -> bool {
        self.streak.is_new_high()
    }

    pub fn selected(&self) -> Option<ActorId> {
        self.selected
    }

    pub fn has_seen_tutorial(&self) -> bool {
        self.has_seen_tutorial
    }

    /// Ages are visible
    pub fn is_revealed(&self) -> bool {
        matches!(
            self.phase,
            Phase::Revealed { .. } | Phase::GameOver { .. } | Phase::GameOverModal
        )
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self.phase,
            Phase::GameOver { .. } | Phase::GameOverModal | Phase::AwaitingRestart
        )
    }

    pub fn can_advance(&self) -> bool {
        !self.is_game_over()
    }

    pub fn show_game_over_modal(&self) -> bool {
        self.phase == Phase::GameOverModal
    }

    /// Instant of the next timed transition, if one is pending
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Revealed { next_round_at } => Some(next_round_at),
            Phase::GameOver { modal_at } => Some(modal_at),
            _ => None,
        }
    }

    /// Whether the card holding `id` is the older actor. `None` until revealed.
    pub fn is_correct_card(&self, id: ActorId) -> Option<bool> {
        if !self.is_revealed() {
            return None;
        }
        let position = self.round.position(id)?;
        Some(match self.round.verdict() {
            Verdict::First => position == 0,
            Verdict::Second => position == 1,
            Verdict::Tie => true,
        })
    }

    /// Share text for the run that just ended
    pub fn share_message(&self) -> String {
        share::score_message(
            self.last_streak,
            self.streak.best(),
            self.streak.is_new_high(),
            self.config.share_url.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, PersistenceError};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use std::time::Duration;

    fn pool_of(ages: &[u32]) -> ActorPool {
        ActorPool::new(
            ages.iter()
                .enumerate()
                .map(|(i, &age)| Actor {
                    id: ActorId(i as u64 + 1),
                    name: format!("Actor {}", i + 1),
                    profile_path: "/x.jpg".into(),
                    birthday: NaiveDate::from_ymd_opt(2000 - age as i32, 1, 1 + i as u32).unwrap(),
                    deathday: None,
                    age,
                    movies: Vec::new(),
                })
                .collect(),
        )
    }

    fn session(best: u32) -> GameSession<MemoryStorage> {
        GameSession::new(
            pool_of(&[40, 41, 42, 43, 44, 45]),
            MemoryStorage::new(SavedState { best_streak: best, has_seen_tutorial: false }),
            GameConfig::default(),
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    fn older_id<S: Storage>(s: &GameSession<S>) -> ActorId {
        match s.round().verdict() {
            Verdict::Second => s.round().actors[1].id,
            _ => s.round().actors[0].id,
        }
    }

    fn younger_id<S: Storage>(s: &GameSession<S>) -> ActorId {
        match s.round().verdict() {
            Verdict::Second => s.round().actors[0].id,
            _ => s.round().actors[1].id,
        }
    }

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn load(&self) -> std::result::Result<SavedState, PersistenceError> {
            Err(PersistenceError::UnsupportedVersion { found: 7, expected: 1 })
        }

        fn save(&mut self, _state: &SavedState) -> std::result::Result<(), PersistenceError> {
            Err(PersistenceError::UnsupportedVersion { found: 7, expected: 1 })
        }
    }

    #[test]
    fn test_correct_pick_reveals_then_deals() {
        let mut s = session(0);
        let now = Instant::now();
        let first_round = s.round().ids();

        let outcome = s.choose(older_id(&s), now).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.streak, 1);
        assert!(outcome.new_high);
        assert_eq!(s.best_streak(), 1);
        assert_eq!(s.storage().state().best_streak, 1);
        assert!(s.is_revealed());

        // too early
        assert!(!s.advance(now + Duration::from_millis(1999)).unwrap());
        assert!(s.is_revealed());

        assert!(s.advance(now + Duration::from_millis(2000)).unwrap());
        assert_eq!(s.phase(), Phase::Choosing);
        assert_eq!(s.selected(), None);
        // previous actors are excluded from the next round
        for id in s.round().ids() {
            assert!(!first_round.contains(&id));
        }
    }

    #[test]
    fn test_picks_ignored_while_revealed() {
        let mut s = session(0);
        let now = Instant::now();
        s.choose(older_id(&s), now).unwrap();
        assert!(s.choose(older_id(&s), now).is_none());
        assert!(s.choose(ActorId(999), now).is_none());
        assert_eq!(s.streak(), 1);
    }

    #[test]
    fn test_unknown_actor_ignored() {
        let mut s = session(0);
        assert!(s.choose(ActorId(999), Instant::now()).is_none());
        assert_eq!(s.phase(), Phase::Choosing);
    }

    #[test]
    fn test_wrong_pick_game_over_flow() {
        let mut s = session(5);
        let now = Instant::now();

        s.choose(older_id(&s), now).unwrap();
        s.advance(now + Duration::from_secs(2)).unwrap();
        let t = now + Duration::from_secs(3);

        let outcome = s.choose(younger_id(&s), t).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.streak, 0);
        assert_eq!(s.last_streak(), 1);
        assert_eq!(s.best_streak(), 5);
        assert!(s.is_game_over());
        assert!(!s.can_advance());
        assert!(!s.load_new_round().unwrap());
        assert_eq!(s.is_correct_card(younger_id(&s)), Some(false));
        assert_eq!(s.is_correct_card(older_id(&s)), Some(true));

        assert!(!s.show_game_over_modal());
        assert!(s.advance(t + Duration::from_millis(1500)).unwrap());
        assert!(s.show_game_over_modal());
        assert!(s.share_message().contains("beat my score of 5?"));

        s.dismiss_game_over();
        assert_eq!(s.phase(), Phase::AwaitingRestart);
        assert!(!s.is_revealed());

        assert!(s.play_again().unwrap());
        assert_eq!(s.phase(), Phase::Choosing);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.last_streak(), 0);
        assert_eq!(s.best_streak(), 5);
    }

    #[test]
    fn test_new_high_cleared_on_dismiss() {
        let mut s = session(0);
        let now = Instant::now();
        s.choose(older_id(&s), now).unwrap();
        s.advance(now + Duration::from_secs(2)).unwrap();
        s.choose(younger_id(&s), now + Duration::from_secs(3)).unwrap();
        assert!(s.is_new_high());
        assert!(s.share_message().starts_with("New High Score!"));

        s.dismiss_game_over();
        assert!(!s.is_new_high());
    }

    #[test]
    fn test_best_only_saved_when_beaten() {
        let mut s = session(3);
        let now = Instant::now();
        for i in 0..3u64 {
            let t = now + Duration::from_secs(i * 3);
            s.choose(older_id(&s), t).unwrap();
            s.advance(t + Duration::from_secs(2)).unwrap();
        }
        assert_eq!(s.storage().saves, 0);

        s.choose(older_id(&s), now + Duration::from_secs(20)).unwrap();
        assert_eq!(s.storage().saves, 1);
        assert_eq!(s.storage().state().best_streak, 4);
    }

    #[test]
    fn test_play_again_only_after_game_over() {
        let mut s = session(0);
        assert!(!s.play_again().unwrap());
        assert!(s.load_new_round().unwrap());
    }

    #[test]
    fn test_broken_storage_does_not_stop_play() {
        let mut s = GameSession::new(
            pool_of(&[40, 41, 42, 43]),
            BrokenStorage,
            GameConfig::default(),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(s.best_streak(), 0);

        let older = match s.round().verdict() {
            Verdict::Second => s.round().actors[1].id,
            _ => s.round().actors[0].id,
        };
        let outcome = s.choose(older, Instant::now()).unwrap();
        assert!(outcome.correct);
        assert_eq!(s.best_streak(), 1);
    }

    #[test]
    fn test_tutorial_flag_persisted() {
        let mut s = session(2);
        assert!(!s.has_seen_tutorial());
        s.mark_tutorial_seen();
        assert!(s.has_seen_tutorial());
        assert_eq!(
            s.storage().state(),
            SavedState { best_streak: 2, has_seen_tutorial: true }
        );
    }

    #[test]
    fn test_round_from_unknown_actor() {
        let pool = pool_of(&[40, 41]);
        let pairing = Pairing { first: ActorId(1), second: ActorId(99), reset: false };
        assert_eq!(
            Round::from_pairing(&pool, pairing),
            Err(PairingError::UnknownActor { id: ActorId(99) })
        );
    }

    #[test]
    fn test_storage_handed_back() {
        let mut s = session(0);
        s.choose(older_id(&s), Instant::now()).unwrap();
        let storage = s.into_storage();
        assert_eq!(storage.state().best_streak, 1);
    }

    #[test]
    fn test_unpairable_pool_rejected() {
        let result = GameSession::new(
            pool_of(&[20, 50, 80]),
            MemoryStorage::default(),
            GameConfig::default(),
            StdRng::seed_from_u64(1),
        );
        assert!(result.is_err());
    }
}
