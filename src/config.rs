use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub tmdb_access_token: String,
    pub tmdb_base_url: String,
    pub database_url: String,
    pub tmdb_rps: u32,
    pub tmdb_timeout_secs: u64,
    pub event_fetch_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let tmdb_access_token = std::env::var("TMDB_ACCESS_TOKEN").unwrap_or_default();
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://awardboxd.db?mode=rwc".to_string());

        let tmdb_rps = env_or("TMDB_RPS", 4);
        let tmdb_timeout_secs = env_or("TMDB_TIMEOUT_SECS", 30);
        let event_fetch_timeout_secs = env_or("EVENT_FETCH_TIMEOUT_SECS", 30);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            tmdb_access_token,
            tmdb_base_url,
            database_url,
            tmdb_rps,
            tmdb_timeout_secs,
            event_fetch_timeout_secs,
        })
    }
}

/// Unset or unparsable values fall back to `default`.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(std::env::var(key).ok().as_deref(), default)
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
