#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use awardboxd::{
    catalog::Catalog,
    entities::{category, ceremony, organization},
    error::{SyncError, SyncResult},
    event_page::EventPageFetcher,
    models::MovieMetadata,
    sync::{self, SyncContext, SyncRequest},
    tmdb::{MetadataError, MetadataProvider},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::{Value, json};

pub const EVENT_URL: &str = "https://www.imdb.com/event/ev0000003/2024/1";

pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub struct Seed {
    pub organization_id: i32,
    pub ceremony_id: i32,
    pub category_id: i32,
}

pub async fn seed(db: &DatabaseConnection, category_name: &str, event_url: Option<&str>) -> Seed {
    let org = organization::ActiveModel { name: Set("Academy Awards".into()), ..Default::default() }
        .insert(db)
        .await
        .unwrap();
    let ceremony = ceremony::ActiveModel {
        organization_id: Set(org.id),
        year: Set(2024),
        event_url: Set(event_url.map(str::to_string)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    let category = category::ActiveModel {
        organization_id: Set(org.id),
        name: Set(category_name.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    Seed { organization_id: org.id, ceremony_id: ceremony.id, category_id: category.id }
}

/// Serves one HTML document and remembers requested URLs.
#[derive(Default)]
pub struct StaticPage {
    html: Mutex<String>,
    pub requests: Mutex<Vec<String>>,
}

impl StaticPage {
    pub fn new(html: String) -> Self {
        Self { html: Mutex::new(html), requests: Mutex::default() }
    }

    pub fn set(&self, html: String) {
        *self.html.lock().unwrap() = html;
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl EventPageFetcher for StaticPage {
    async fn fetch(&self, url: &str) -> SyncResult<String> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self.html.lock().unwrap().clone())
    }
}

pub struct FailingPage;

#[async_trait]
impl EventPageFetcher for FailingPage {
    async fn fetch(&self, url: &str) -> SyncResult<String> {
        Err(SyncError::ExternalFetch { url: url.to_string(), reason: "HTTP 503 Service Unavailable".into() })
    }
}

#[derive(Clone, Debug)]
pub enum Scripted {
    Found(MovieMetadata),
    NotFound,
    NotConfigured,
    Broken,
}

/// Metadata provider answering from a fixed table. Unknown ids are not found.
#[derive(Default)]
pub struct ScriptedMetadata {
    answers: HashMap<String, Scripted>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedMetadata {
    pub fn with(mut self, imdb_id: &str, answer: Scripted) -> Self {
        self.answers.insert(imdb_id.to_string(), answer);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for ScriptedMetadata {
    async fn lookup_by_imdb_id(&self, imdb_id: &str) -> Result<MovieMetadata, MetadataError> {
        self.calls.lock().unwrap().push(imdb_id.to_string());
        match self.answers.get(imdb_id).cloned().unwrap_or(Scripted::NotFound) {
            Scripted::Found(meta) => Ok(meta),
            Scripted::NotFound => Err(MetadataError::NotFound(imdb_id.to_string())),
            Scripted::NotConfigured => Err(MetadataError::NotConfigured),
            Scripted::Broken => Err(MetadataError::Unexpected("malformed response".into())),
        }
    }
}

pub fn metadata(tmdb_id: i32, title: &str, year: i32) -> MovieMetadata {
    MovieMetadata {
        tmdb_id,
        title: title.to_string(),
        original_title: Some(title.to_string()),
        year: Some(year),
        original_language: Some("en".into()),
        poster_path: Some(format!("/{tmdb_id}.jpg")),
        translations: Vec::new(),
    }
}

pub fn nominee(id: Option<&str>, title: &str, winner: bool) -> Value {
    json!({ "node": {
        "isWinner": winner,
        "notes": null,
        "awardedEntities": { "awardTitles": [
            { "title": { "id": id, "titleText": { "text": title }, "originalTitleText": { "text": title } } }
        ] }
    } })
}

pub fn category_section(label: &str, nominees: Vec<Value>) -> Value {
    json!({ "node": { "category": { "text": label }, "nominations": { "edges": nominees } } })
}

pub fn event_page(award: &str, sections: Vec<Value>) -> String {
    let payload = json!({ "props": { "pageProps": { "edition": { "awards": [
        { "text": award, "nominationCategories": { "edges": sections } }
    ] } } } });
    format!(
        "<!DOCTYPE html><html><head><title>Event</title></head><body><div id=\"__next\"></div>\
         <script id=\"__NEXT_DATA__\" type=\"application/json\">{payload}</script></body></html>"
    )
}

pub async fn run(
    catalog: &Catalog,
    fetcher: &dyn EventPageFetcher,
    metadata: &dyn MetadataProvider,
    seed: &Seed,
) -> SyncResult<awardboxd::models::SyncSummary> {
    let ctx = SyncContext { catalog, fetcher, metadata };
    sync::sync_category(ctx, SyncRequest { ceremony_id: seed.ceremony_id, category_id: seed.category_id })
        .await
}
