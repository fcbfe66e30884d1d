use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{MovieMetadata, TitleTranslation};

const TRANSLATION_LANGUAGES: [&str; 2] = ["en", "ja"];

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata provider has no access token configured")]
    NotConfigured,
    #[error("no metadata found for {0}")]
    NotFound(String),
    #[error("unexpected metadata response: {0}")]
    Unexpected(String),
    #[error("metadata request failed: {0}")]
    Request(#[from] wreq::Error),
}

/// Looks up movie details by IMDb id.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn lookup_by_imdb_id(&self, imdb_id: &str) -> Result<MovieMetadata, MetadataError>;
}

pub struct TmdbClient {
    client: wreq::Client,
    access_token: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(client: wreq::Client, access_token: String, base_url: String, rps: u32) -> Self {
        if access_token.trim().is_empty() {
            tracing::warn!("no TMDB_ACCESS_TOKEN provided, movies will be created without metadata");
        }

        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(rps.max(1)).unwrap_or(NonZeroU32::MIN),
        )));
        Self { client, access_token, base_url, limiter }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MetadataError> {
        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(resp)
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn lookup_by_imdb_id(&self, imdb_id: &str) -> Result<MovieMetadata, MetadataError> {
        if self.access_token.trim().is_empty() {
            return Err(MetadataError::NotConfigured);
        }

        let found: FindResponse =
            self.get(&format!("find/{imdb_id}"), &[("external_source", "imdb_id")]).await?;
        let tmdb_id = found
            .movie_results
            .first()
            .map(|m| m.id)
            .ok_or_else(|| MetadataError::NotFound(imdb_id.to_string()))?;
        debug!(imdb_id = %imdb_id, tmdb_id = tmdb_id, "resolved TMDB id");

        let details: MovieDetails = self.get(&format!("movie/{tmdb_id}"), &[]).await?;
        if details.title.trim().is_empty() {
            return Err(MetadataError::Unexpected(format!("TMDB movie {tmdb_id} has no title")));
        }
        let translations: TranslationsResponse =
            self.get(&format!("movie/{tmdb_id}/translations"), &[]).await?;

        Ok(MovieMetadata {
            tmdb_id,
            title: details.title,
            original_title: details.original_title,
            year: details.release_date.as_deref().and_then(release_year),
            original_language: details.original_language,
            poster_path: details.poster_path,
            translations: pick_translations(translations.translations),
        })
    }
}

fn release_year(date: &str) -> Option<i32> {
    date.parse::<jiff::civil::Date>().ok().map(|d| i32::from(d.year()))
}

fn pick_translations(all: Vec<Translation>) -> Vec<TitleTranslation> {
    let mut out: Vec<TitleTranslation> = Vec::new();
    for t in all {
        let Some(title) = t.data.title.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        else {
            continue;
        };
        if !TRANSLATION_LANGUAGES.contains(&t.iso_639_1.as_str())
            || out.iter().any(|o| o.language == t.iso_639_1)
        {
            continue;
        }
        out.push(TitleTranslation { language: t.iso_639_1, title });
    }
    out
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<FindMovie>,
}

#[derive(Debug, Deserialize)]
struct FindMovie {
    id: i32,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    title: String,
    original_title: Option<String>,
    original_language: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslationsResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    iso_639_1: String,
    data: TranslationData,
}

#[derive(Debug, Deserialize)]
struct TranslationData {
    title: Option<String>,
}
