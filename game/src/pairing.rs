//! Round Selection
//!
//! Pairs two actors for a round by rejection sampling: take anchors in a
//! random order and draw partners without replacement until one lies within
//! the allowed age gap. Actors already shown this cycle are excluded until
//! the remaining pool runs dry.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::components::{Actor, ActorId};
use crate::config::RoundConfig;
use crate::pool::ActorPool;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("actor pool has {size} actors, need at least 2")]
    PoolTooSmall { size: usize },
    #[error("no two of {pool_size} actors are within {max_gap} years of each other")]
    NoValidPair { pool_size: usize, max_gap: u32 },
    #[error("actor {id} is not in the pool")]
    UnknownActor { id: ActorId },
}

/// Actors that may not appear in the next round
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    used: HashSet<ActorId>,
    current: HashSet<ActorId>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.used.contains(&id) || self.current.contains(&id)
    }

    /// Record the actors of a freshly drawn round
    pub fn mark_round(&mut self, ids: [ActorId; 2]) {
        self.current = ids.into_iter().collect();
        self.used.extend(ids);
    }

    pub fn clear(&mut self) {
        self.used.clear();
        self.current.clear();
    }

    pub fn used(&self) -> &HashSet<ActorId> {
        &self.used
    }
}

/// Result of a successful draw, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub first: ActorId,
    pub second: ActorId,
    /// The exclusion set was cleared to find this pair
    pub reset: bool,
}

impl Pairing {
    pub fn ids(&self) -> [ActorId; 2] {
        [self.first, self.second]
    }
}

/// Find a pair within `max_gap`, or `None` when no such pair exists.
///
/// Anchors are tried in a random order and each anchor's partners are drawn
/// at random without replacement, so every candidate is eventually tried.
fn draw<R: Rng + ?Sized>(candidates: &[&Actor], max_gap: u32, rng: &mut R) -> Option<[ActorId; 2]> {
    if candidates.len() < 2 {
        return None;
    }

    let mut anchors = candidates.to_vec();
    anchors.shuffle(rng);

    for (i, anchor) in anchors.iter().enumerate() {
        let mut partners: Vec<&Actor> = anchors
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, actor)| *actor)
            .collect();
        partners.shuffle(rng);

        if let Some(partner) = partners
            .into_iter()
            .find(|partner| anchor.age.abs_diff(partner.age) <= max_gap)
        {
            return Some([anchor.id, partner.id]);
        }
    }
    None
}

/// Draw the next round's pair and record it in `exclusions`.
///
/// Falls back to the full pool (clearing `exclusions`) when the actors not
/// yet shown cannot furnish a pair.
pub fn select_pair<R: Rng + ?Sized>(
    pool: &ActorPool,
    exclusions: &mut Exclusions,
    config: &RoundConfig,
    rng: &mut R,
) -> Result<Pairing, PairingError> {
    if pool.len() < 2 {
        return Err(PairingError::PoolTooSmall { size: pool.len() });
    }

    let available: Vec<&Actor> = pool
        .actors()
        .iter()
        .filter(|actor| !exclusions.contains(actor.id))
        .collect();

    let mut reset = false;
    let mut pair = draw(&available, config.max_age_gap, rng);

    if pair.is_none() {
        debug!(
            available = available.len(),
            used = exclusions.used().len(),
            "remaining actors exhausted, resetting exclusions"
        );
        exclusions.clear();
        reset = true;

        let everyone: Vec<&Actor> = pool.actors().iter().collect();
        pair = draw(&everyone, config.max_age_gap, rng);
    }

    let Some(mut ids) = pair else {
        return Err(PairingError::NoValidPair {
            pool_size: pool.len(),
            max_gap: config.max_age_gap,
        });
    };

    if rng.gen_bool(0.5) {
        ids.reverse();
    }
    exclusions.mark_round(ids);

    Ok(Pairing { first: ids[0], second: ids[1], reset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool_of(ages: &[u32]) -> ActorPool {
        ActorPool::new(
            ages.iter()
                .enumerate()
                .map(|(i, &age)| Actor {
                    id: ActorId(i as u64 + 1),
                    name: format!("Actor {}", i + 1),
                    profile_path: "/x.jpg".into(),
                    birthday: NaiveDate::from_ymd_opt(2024 - age as i32, 1, 1).unwrap(),
                    deathday: None,
                    age,
                    movies: Vec::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_pair_within_gap_and_distinct() {
        let pool = pool_of(&[20, 25, 31, 38, 44, 52, 60, 67, 75, 81]);
        let config = RoundConfig::default();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut exclusions = Exclusions::new();
            let pair = select_pair(&pool, &mut exclusions, &config, &mut rng).unwrap();

            assert_ne!(pair.first, pair.second);
            let a = pool.get(pair.first).unwrap().age;
            let b = pool.get(pair.second).unwrap().age;
            assert!(a.abs_diff(b) <= config.max_age_gap, "seed {}: {} vs {}", seed, a, b);
        }
    }

    #[test]
    fn test_excluded_actors_not_redrawn_until_reset() {
        let pool = pool_of(&[40, 40, 40, 40, 40, 40]);
        let config = RoundConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut exclusions = Exclusions::new();

        let mut seen = HashSet::new();
        for _ in 0..3 {
            let pair = select_pair(&pool, &mut exclusions, &config, &mut rng).unwrap();
            assert!(!pair.reset);
            assert!(seen.insert(pair.first));
            assert!(seen.insert(pair.second));
        }
        assert_eq!(seen.len(), 6);

        // everyone has been shown: the next draw starts a new cycle
        let pair = select_pair(&pool, &mut exclusions, &config, &mut rng).unwrap();
        assert!(pair.reset);
        assert_eq!(exclusions.used().len(), 2);
    }

    #[test]
    fn test_reset_when_remaining_cannot_pair() {
        // 1 and 2 are the only compatible actors; 3 and 4 are far apart
        let pool = pool_of(&[30, 32, 50, 80]);
        let config = RoundConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut exclusions = Exclusions::new();

        let first = select_pair(&pool, &mut exclusions, &config, &mut rng).unwrap();
        let mut ids = first.ids();
        ids.sort();
        assert_eq!(ids, [ActorId(1), ActorId(2)]);

        let second = select_pair(&pool, &mut exclusions, &config, &mut rng).unwrap();
        assert!(second.reset);
        let mut ids = second.ids();
        ids.sort();
        assert_eq!(ids, [ActorId(1), ActorId(2)]);
    }

    #[test]
    fn test_no_valid_pair_terminates() {
        let pool = pool_of(&[20, 40, 60]);
        let config = RoundConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut exclusions = Exclusions::new();

        let err = select_pair(&pool, &mut exclusions, &config, &mut rng).unwrap_err();
        assert_eq!(err, PairingError::NoValidPair { pool_size: 3, max_gap: 12 });
    }

    #[test]
    fn test_single_valid_pair_always_found() {
        // ages 1, 27, 53, ... are all further apart than the gap; only 1 and 2 pair up
        let mut ages: Vec<u32> = (0..60).map(|i| 1 + 26 * i).collect();
        ages.push(2);
        let pool = pool_of(&ages);
        let config = RoundConfig::default();

        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pair = select_pair(&pool, &mut Exclusions::new(), &config, &mut rng).unwrap();
            assert!(!pair.reset, "seed {}", seed);
            let mut ids = pair.ids();
            ids.sort();
            assert_eq!(ids, [ActorId(1), ActorId(61)], "seed {}", seed);
        }
    }

    #[test]
    fn test_pool_too_small() {
        let pool = pool_of(&[30]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = select_pair(&pool, &mut Exclusions::new(), &RoundConfig::default(), &mut rng)
            .unwrap_err();
        assert_eq!(err, PairingError::PoolTooSmall { size: 1 });
    }

    #[test]
    fn test_display_order_varies() {
        let pool = pool_of(&[30, 31]);
        let config = RoundConfig::default();
        let mut firsts = HashSet::new();

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pair = select_pair(&pool, &mut Exclusions::new(), &config, &mut rng).unwrap();
            firsts.insert(pair.first);
        }
        assert_eq!(firsts.len(), 2);
    }

    #[test]
    fn test_gap_boundary_is_inclusive() {
        let pool = pool_of(&[30, 42]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(select_pair(&pool, &mut Exclusions::new(), &RoundConfig::default(), &mut rng).is_ok());

        let pool = pool_of(&[30, 43]);
        assert!(select_pair(&pool, &mut Exclusions::new(), &RoundConfig::default(), &mut rng).is_err());
    }
}
