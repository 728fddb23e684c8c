//! Actor Pool
//!
//! Builds the in-memory working set of actors from the remote source:
//! sample popular pages, keep prominent people, then fetch and validate
//! their details with bounded concurrency.

use std::collections::HashSet;

use chrono::NaiveDate;
use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use rand::seq::index;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::components::{Actor, ActorId};
use crate::config::FetchConfig;
use crate::error::{GameError, Result};
use crate::tmdb::filter::{build_actor, is_prominent, significant_movies};
use crate::tmdb::{ActorSource, PopularPerson, SourceError};

// ============================================================================
// Pool
// ============================================================================

/// Candidate actors for rounds. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorPool {
    actors: Vec<Actor>,
}

impl ActorPool {
    /// Build a pool, dropping later duplicates of an id
    pub fn new(actors: Vec<Actor>) -> Self {
        let mut seen = HashSet::new();
        let actors = actors
            .into_iter()
            .filter(|actor| seen.insert(actor.id))
            .collect();
        Self { actors }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    pub fn into_actors(self) -> Vec<Actor> {
        self.actors
    }
}

// ============================================================================
// Loading
// ============================================================================

/// `count` distinct page numbers in `1..=max_pages`
pub fn pick_pages<R: Rng + ?Sized>(rng: &mut R, count: usize, max_pages: u32) -> Vec<u32> {
    let max = max_pages as usize;
    let amount = count.min(max);
    index::sample(rng, max, amount)
        .into_iter()
        .map(|i| i as u32 + 1)
        .collect()
}

/// Fetch the given popular pages concurrently and keep prominent people.
///
/// Any failed page fails the whole fetch.
pub async fn fetch_popular<S: ActorSource + ?Sized>(
    source: &S,
    pages: &[u32],
    config: &FetchConfig,
) -> std::result::Result<Vec<PopularPerson>, SourceError> {
    let responses = join_all(pages.iter().map(|&page| source.popular_page(page))).await;

    let mut people = Vec::new();
    for response in responses {
        people.extend(response?.into_iter().filter(|p| is_prominent(p, config)));
    }
    Ok(people)
}

/// Fetch and validate one actor. Details and credits are requested together;
/// a failed credits call counts as no movies.
pub async fn fetch_actor<S: ActorSource + ?Sized>(
    source: &S,
    id: u64,
    today: NaiveDate,
    config: &FetchConfig,
) -> Option<Actor> {
    let (details, credits) = tokio::join!(source.person_details(id), source.movie_credits(id));

    let details = match details {
        Ok(details) => details,
        Err(e) => {
            debug!(id, error = %e, "person details unavailable");
            return None;
        }
    };
    let credits = credits.unwrap_or_else(|e| {
        debug!(id, error = %e, "movie credits unavailable");
        Vec::new()
    });

    build_actor(&details, significant_movies(&credits, config), today, config)
}

/// Build the actor pool from the given popular pages.
///
/// Candidates in `exclude` are skipped. Fails when fewer than
/// `min_valid_actors` survive validation.
pub async fn load_actor_pool<S: ActorSource + ?Sized>(
    source: &S,
    config: &FetchConfig,
    pages: &[u32],
    today: NaiveDate,
    exclude: &HashSet<ActorId>,
) -> Result<ActorPool> {
    let popular = fetch_popular(source, pages, config).await?;

    let mut seen = HashSet::new();
    let candidates: Vec<u64> = popular
        .iter()
        .map(|person| person.id)
        .filter(|&id| !exclude.contains(&ActorId(id)) && seen.insert(id))
        .take(config.pool_size)
        .collect();

    debug!(pages = ?pages, popular = popular.len(), candidates = candidates.len(), "fetching actor details");

    let mut fetched: Vec<(usize, Option<Actor>)> = stream::iter(candidates.iter().copied().enumerate())
        .map(|(idx, id)| async move { (idx, fetch_actor(source, id, today, config).await) })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    // Keep candidate order so seeded games replay identically
    fetched.sort_by_key(|(idx, _)| *idx);
    let actors: Vec<Actor> = fetched.into_iter().filter_map(|(_, actor)| actor).collect();

    if actors.len() < config.min_valid_actors {
        warn!(
            found = actors.len(),
            required = config.min_valid_actors,
            "not enough valid actors"
        );
        return Err(GameError::NotEnoughActors {
            found: actors.len(),
            required: config.min_valid_actors,
        });
    }

    info!(actors = actors.len(), candidates = candidates.len(), "actor pool loaded");
    Ok(ActorPool::new(actors))
}
