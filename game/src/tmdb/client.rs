//! HTTP adapter for the TMDB v3 API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ActorSource, CastCredit, MovieCredits, PersonDetails, PopularPage, PopularPerson, SourceError};
use crate::config::FetchConfig;

/// TMDB client. Every request carries the API key and language as query
/// parameters.
pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SourceError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            language: language.into(),
        })
    }

    pub fn from_config(config: &FetchConfig, api_key: impl Into<String>) -> Result<Self, SourceError> {
        Self::new(
            config.base_url.clone(),
            api_key,
            config.language.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(endpoint, "TMDB request");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(extra)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ActorSource for TmdbClient {
    async fn popular_page(&self, page: u32) -> Result<Vec<PopularPerson>, SourceError> {
        let data: PopularPage = self
            .get("/person/popular", &[("page", page.to_string())])
            .await?;
        Ok(data.results)
    }

    async fn person_details(&self, id: u64) -> Result<PersonDetails, SourceError> {
        self.get(&format!("/person/{}", id), &[]).await
    }

    async fn movie_credits(&self, id: u64) -> Result<Vec<CastCredit>, SourceError> {
        let data: MovieCredits = self
            .get(&format!("/person/{}/movie_credits", id), &[])
            .await?;
        Ok(data.cast)
    }
}
