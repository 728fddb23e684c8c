//! Record filters
//!
//! Turns raw API records into game actors, keeping only well-known people
//! with enough data to make a fair round.

use chrono::NaiveDate;

use super::{CastCredit, PersonDetails, PopularPerson};
use crate::components::{age_between, parse_date, Actor, ActorId, Movie};
use crate::config::FetchConfig;

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Popular-listing filter: profile image, popularity, and enough
/// known-for works with at least one in the configured language
pub fn is_prominent(person: &PopularPerson, config: &FetchConfig) -> bool {
    has_text(&person.profile_path)
        && person.popularity > config.min_popularity
        && person.known_for.len() >= config.min_known_for
        && person
            .known_for
            .iter()
            .any(|work| work.original_language.as_deref() == Some(config.known_for_language.as_str()))
}

/// Significant roles, newest first, capped at `movies_per_actor`
pub fn significant_movies(credits: &[CastCredit], config: &FetchConfig) -> Vec<Movie> {
    let mut movies: Vec<Movie> = credits
        .iter()
        .filter(|credit| {
            credit.popularity > config.min_movie_popularity
                && credit.vote_count > config.min_movie_votes
                && has_text(&credit.title)
                && has_text(&credit.character)
        })
        .filter_map(|credit| {
            let release_date = credit.release_date.as_deref().and_then(parse_date)?;
            Some(Movie {
                id: credit.id,
                title: credit.title.clone().unwrap_or_default(),
                release_date,
                character: credit.character.clone().unwrap_or_default(),
            })
        })
        .collect();

    movies.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    movies.truncate(config.movies_per_actor);
    movies
}

/// Build a playable actor, or `None` when the record is incomplete.
///
/// `today` anchors the age of living actors.
pub fn build_actor(
    details: &PersonDetails,
    movies: Vec<Movie>,
    today: NaiveDate,
    config: &FetchConfig,
) -> Option<Actor> {
    if !has_text(&details.profile_path)
        || !has_text(&details.place_of_birth)
        || movies.len() < config.min_movies
        || details.popularity < config.min_popularity
    {
        return None;
    }

    let birthday = details.birthday.as_deref().and_then(parse_date)?;
    let deathday = details.deathday.as_deref().and_then(parse_date);

    let age = age_between(birthday, deathday.unwrap_or(today))?;
    if age < 1 {
        return None;
    }

    Some(Actor {
        id: ActorId(details.id),
        name: details.name.clone(),
        profile_path: details.profile_path.clone().unwrap_or_default(),
        birthday,
        deathday,
        age,
        movies,
    })
}
