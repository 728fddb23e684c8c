//! Wire records returned by the TMDB API
//!
//! Only the fields the filters look at are decoded. Anything the API may
//! omit or null out is optional.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopularPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<PopularPerson>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopularPerson {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub known_for: Vec<KnownFor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnownFor {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub original_language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieCredits {
    #[serde(default)]
    pub cast: Vec<CastCredit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastCredit {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_count: u64,
}
