use serde::Serialize;

/// One nomination as it appears on the external event page, before it is
/// resolved against the local catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalNomination {
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub is_winner: bool,
    pub note: Option<String>,
}

/// Movie details delivered by a metadata provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovieMetadata {
    pub tmdb_id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub original_language: Option<String>,
    pub poster_path: Option<String>,
    pub translations: Vec<TitleTranslation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleTranslation {
    pub language: String,
    pub title: String,
}

/// Everything needed to insert a catalog movie row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub imdb_id: String,
    pub tmdb_id: Option<i32>,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub original_language: Option<String>,
    pub poster_path: Option<String>,
    pub translations: Vec<TitleTranslation>,
}

impl NewMovie {
    /// A movie row carrying only what the event page told us.
    pub fn bare(imdb_id: &str, title: Option<&str>) -> Self {
        Self {
            imdb_id: imdb_id.to_string(),
            tmdb_id: None,
            title: title.unwrap_or(imdb_id).to_string(),
            original_title: None,
            year: None,
            original_language: None,
            poster_path: None,
            translations: Vec::new(),
        }
    }

    pub fn from_metadata(imdb_id: &str, meta: MovieMetadata) -> Self {
        Self {
            imdb_id: imdb_id.to_string(),
            tmdb_id: Some(meta.tmdb_id),
            title: meta.title,
            original_title: meta.original_title,
            year: meta.year,
            original_language: meta.original_language,
            poster_path: meta.poster_path,
            translations: meta.translations,
        }
    }
}

/// A nomination row about to be written for one (ceremony, category) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewNomination {
    pub movie_id: i32,
    pub is_winner: bool,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created_movies: usize,
    pub nominations_written: usize,
    pub skipped_without_id: usize,
    pub total_records: usize,
    pub category_name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct NominationView {
    pub movie_id: i32,
    pub imdb_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub is_winner: bool,
    pub note: Option<String>,
}
