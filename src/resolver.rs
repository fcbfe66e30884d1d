use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, MovieInsert},
    entities::movie,
    error::{SyncError, SyncResult},
    models::{ExternalNomination, NewMovie},
    tmdb::{MetadataError, MetadataProvider},
};

/// IMDb id to catalog movie mappings established during one sync run.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    movies: HashMap<String, movie::Model>,
}

impl ResolutionCache {
    pub fn get(&self, imdb_id: &str) -> Option<&movie::Model> {
        self.movies.get(imdb_id)
    }

    fn insert(&mut self, imdb_id: &str, movie: movie::Model) {
        self.movies.insert(imdb_id.to_string(), movie);
    }
}

/// A nomination whose movie is now in the catalog.
#[derive(Clone, Debug)]
pub struct ResolvedNomination {
    pub movie: movie::Model,
    pub is_winner: bool,
    pub note: Option<String>,
}

#[derive(Debug, Default)]
pub struct Resolution {
    pub nominations: Vec<ResolvedNomination>,
    pub created_movies: usize,
    pub skipped_without_id: usize,
}

pub struct MovieResolver<'a> {
    catalog: &'a Catalog,
    metadata: &'a dyn MetadataProvider,
}

impl<'a> MovieResolver<'a> {
    pub fn new(catalog: &'a Catalog, metadata: &'a dyn MetadataProvider) -> Self {
        Self { catalog, metadata }
    }

    /// Resolves records one at a time in page order. Records without an IMDb
    /// id are counted and dropped.
    pub async fn resolve_all(
        &self,
        records: &[ExternalNomination],
        cache: &mut ResolutionCache,
    ) -> SyncResult<Resolution> {
        let mut out = Resolution::default();

        for record in records {
            let Some(imdb_id) = record.imdb_id.as_deref() else {
                out.skipped_without_id += 1;
                continue;
            };

            let (movie, created) = self.resolve(imdb_id, record.title.as_deref(), cache).await?;
            if created {
                out.created_movies += 1;
            }
            out.nominations.push(ResolvedNomination {
                movie,
                is_winner: record.is_winner,
                note: record.note.clone(),
            });
        }

        Ok(out)
    }

    /// Maps one IMDb id to a catalog movie, creating it when absent. The bool
    /// is true only when this call inserted the row.
    pub async fn resolve(
        &self,
        imdb_id: &str,
        title: Option<&str>,
        cache: &mut ResolutionCache,
    ) -> SyncResult<(movie::Model, bool)> {
        if let Some(movie) = cache.get(imdb_id) {
            return Ok((movie.clone(), false));
        }

        let (movie, created) = match self.catalog.find_movie_by_imdb_id(imdb_id).await? {
            Some(movie) => {
                debug!(imdb_id = %imdb_id, movie_id = movie.id, "movie already in catalog");
                (movie, false)
            },
            None => match self.create(imdb_id, title).await? {
                MovieInsert::Created(movie) => {
                    debug!(imdb_id = %imdb_id, movie_id = movie.id, "created movie");
                    (movie, true)
                },
                MovieInsert::AlreadyExisted(movie) => {
                    warn!(imdb_id = %imdb_id, movie_id = movie.id, "movie appeared during creation, reusing it");
                    (movie, false)
                },
            },
        };

        cache.insert(imdb_id, movie.clone());
        Ok((movie, created))
    }

    async fn create(&self, imdb_id: &str, title: Option<&str>) -> SyncResult<MovieInsert> {
        let new = match self.metadata.lookup_by_imdb_id(imdb_id).await {
            Ok(meta) => NewMovie::from_metadata(imdb_id, meta),
            Err(err @ (MetadataError::NotConfigured | MetadataError::NotFound(_))) => {
                warn!(imdb_id = %imdb_id, reason = %err, "creating movie without metadata");
                NewMovie::bare(imdb_id, title)
            },
            Err(err) => {
                return Err(SyncError::MovieCreation {
                    imdb_id: imdb_id.to_string(),
                    source: Box::new(err),
                });
            },
        };

        self.catalog.create_or_fetch_movie(new).await.map_err(|err| SyncError::MovieCreation {
            imdb_id: imdb_id.to_string(),
            source: Box::new(err),
        })
    }
}
