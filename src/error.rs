use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure of one awards synchronisation run. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid sync request: {0}")]
    Validation(String),
    #[error("failed to fetch event page {url}: {reason}")]
    ExternalFetch { url: String, reason: String },
    #[error("unexpected event page format: {0}")]
    ExternalFormat(String),
    #[error("no category on the event page matches '{category}'")]
    NoCategoryMatch { category: String },
    #[error("none of the {total} nominations on the event page carry a movie id")]
    NoResolvableNominations { total: usize },
    #[error("failed to create movie {imdb_id}")]
    MovieCreation {
        imdb_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl SyncError {
    fn status(&self) -> StatusCode {
        match self {
            SyncError::NotFound(_) => StatusCode::NOT_FOUND,
            SyncError::Validation(_) => StatusCode::BAD_REQUEST,
            SyncError::ExternalFetch { .. } | SyncError::ExternalFormat(_) => {
                StatusCode::BAD_GATEWAY
            },
            SyncError::NoCategoryMatch { .. } | SyncError::NoResolvableNominations { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            },
            SyncError::MovieCreation { .. } | SyncError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: anyhow::Error,
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, inner: err }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        Self { status: err.status(), inner: anyhow::Error::new(err) }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::from(anyhow::Error::new(err))
    }
}

impl From<wreq::Error> for AppError {
    fn from(err: wreq::Error) -> Self {
        Self { status: StatusCode::BAD_GATEWAY, inner: anyhow::Error::new(err) }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = ?self.inner, "request failed");
        }
        let body = Json(serde_json::json!({ "error": format!("{:#}", self.inner) }));
        (self.status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub type SyncResult<T> = Result<T, SyncError>;
