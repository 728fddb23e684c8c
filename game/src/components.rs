//! Actor records shown on the game cards
//!
//! Ages are whole calendar years, computed once when the pool is built.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Base URL for TMDB profile images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Actor
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub release_date: NaiveDate,
    pub character: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub profile_path: String,
    pub birthday: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deathday: Option<NaiveDate>,
    /// Age at death, or age on the day the pool was built
    pub age: u32,
    #[serde(default)]
    pub movies: Vec<Movie>,
}

impl Actor {
    pub fn is_deceased(&self) -> bool {
        self.deathday.is_some()
    }

    /// Full image URL for a TMDB size bucket such as `w500`
    pub fn profile_url(&self, size: &str) -> String {
        format!("{}/{}{}", IMAGE_BASE_URL, size, self.profile_path)
    }

    /// Age at `today`, or at death for deceased actors
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        age_between(self.birthday, self.deathday.unwrap_or(today))
    }
}

// ============================================================================
// Date helpers
// ============================================================================

/// Whole years elapsed between `birth` and `on`.
///
/// Returns `None` when `on` precedes `birth`.
pub fn age_between(birth: NaiveDate, on: NaiveDate) -> Option<u32> {
    if on < birth {
        return None;
    }

    let mut years = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Parse a `yyyy-MM-dd` date as delivered by the API. Blank input is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
