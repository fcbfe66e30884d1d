pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod event_page;
pub mod matcher;
pub mod models;
pub mod resolver;
pub mod routes;
pub mod sync;
pub mod text;
pub mod tmdb;

use std::sync::Arc;

use crate::{catalog::Catalog, event_page::EventPageFetcher, tmdb::MetadataProvider};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub fetcher: Arc<dyn EventPageFetcher>,
    pub metadata: Arc<dyn MetadataProvider>,
}
