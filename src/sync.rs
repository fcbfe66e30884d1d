use tracing::{debug, info};

use crate::{
    catalog::Catalog,
    error::{SyncError, SyncResult},
    event_page::{self, EventPageFetcher},
    matcher,
    models::{NewNomination, SyncSummary},
    resolver::{MovieResolver, ResolutionCache, ResolvedNomination},
    tmdb::MetadataProvider,
};

/// Collaborators for one sync run, supplied by the caller.
#[derive(Clone, Copy)]
pub struct SyncContext<'a> {
    pub catalog: &'a Catalog,
    pub fetcher: &'a dyn EventPageFetcher,
    pub metadata: &'a dyn MetadataProvider,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncRequest {
    pub ceremony_id: i32,
    pub category_id: i32,
}

impl SyncRequest {
    pub fn parse(ceremony_id: &str, category_id: &str) -> SyncResult<Self> {
        Ok(Self {
            ceremony_id: parse_id("ceremony id", ceremony_id)?,
            category_id: parse_id("category id", category_id)?,
        })
    }
}

fn parse_id(what: &str, raw: &str) -> SyncResult<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SyncError::Validation(format!("{what} is required")));
    }
    raw.parse().map_err(|_| SyncError::Validation(format!("{what} '{raw}' is not a number")))
}

/// Replaces the nominations of one ceremony category with what the
/// ceremony's event page currently lists.
pub async fn sync_category(ctx: SyncContext<'_>, req: SyncRequest) -> SyncResult<SyncSummary> {
    let SyncRequest { ceremony_id, category_id } = req;

    let ceremony = ctx
        .catalog
        .find_ceremony(ceremony_id)
        .await?
        .ok_or_else(|| SyncError::NotFound(format!("ceremony {ceremony_id}")))?;
    let category = ctx
        .catalog
        .find_category(category_id)
        .await?
        .ok_or_else(|| SyncError::NotFound(format!("category {category_id}")))?;

    if category.organization_id != ceremony.organization_id {
        return Err(SyncError::Validation(format!(
            "category {category_id} belongs to organization {}, ceremony {ceremony_id} to {}",
            category.organization_id, ceremony.organization_id
        )));
    }
    let event_url = ceremony
        .event_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(event_page::normalize_event_url)
        .ok_or_else(|| {
            SyncError::Validation(format!("ceremony {ceremony_id} has no event url"))
        })?;

    let html = ctx.fetcher.fetch(&event_url).await?;
    let payload = event_page::embedded_payload(&html)?;
    let sections = event_page::parse_sections(payload)?;

    let targets = matcher::expand_targets(&category.name);
    debug!(category = %category.name, targets = ?targets, "expanded target names");

    let matched = matcher::select_section(&sections, &targets)
        .ok_or_else(|| SyncError::NoCategoryMatch { category: category.name.clone() })?;
    debug!(label = %matched.label, score = matched.score, "matched category section");

    let records = event_page::extract_nominations(matched.section);
    let total_records = records.len();

    let mut cache = ResolutionCache::default();
    let resolution =
        MovieResolver::new(ctx.catalog, ctx.metadata).resolve_all(&records, &mut cache).await?;

    if resolution.nominations.is_empty() {
        return Err(SyncError::NoResolvableNominations { total: total_records });
    }

    let rows = collapse_by_movie(&resolution.nominations);
    let written = ctx.catalog.replace_nominations(ceremony_id, category_id, &rows).await?;

    let summary = SyncSummary {
        created_movies: resolution.created_movies,
        nominations_written: written,
        skipped_without_id: resolution.skipped_without_id,
        total_records,
        category_name: matched.label.trim().to_string(),
    };

    info!(
        ceremony_id = ceremony_id,
        category_id = category_id,
        category = %summary.category_name,
        created_movies = summary.created_movies,
        nominations = summary.nominations_written,
        skipped = summary.skipped_without_id,
        total = summary.total_records,
        "synced nominations"
    );
    Ok(summary)
}

/// One row per movie, in first-seen order. A movie listed more than once
/// wins if any listing won and keeps the first note found.
fn collapse_by_movie(resolved: &[ResolvedNomination]) -> Vec<NewNomination> {
    let mut rows: Vec<NewNomination> = Vec::new();
    for r in resolved {
        match rows.iter_mut().find(|row| row.movie_id == r.movie.id) {
            Some(row) => {
                row.is_winner |= r.is_winner;
                if row.note.is_none() {
                    row.note = r.note.clone();
                }
            },
            None => rows.push(NewNomination {
                movie_id: r.movie.id,
                is_winner: r.is_winner,
                note: r.note.clone(),
            }),
        }
    }
    rows
}
