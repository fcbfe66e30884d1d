use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Form, Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::AppResult,
    models::{NominationView, SyncSummary},
    sync::{self, SyncContext, SyncRequest},
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/ceremonies/{ceremony_id}/sync", post(sync_ceremony))
        .route(
            "/ceremonies/{ceremony_id}/categories/{category_id}/nominations",
            get(list_nominations),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SyncForm {
    #[serde(default)]
    category_id: String,
}

pub async fn sync_ceremony(
    State(state): State<Arc<AppState>>,
    Path(ceremony_id): Path<String>,
    Form(form): Form<SyncForm>,
) -> AppResult<Json<SyncSummary>> {
    let req = SyncRequest::parse(&ceremony_id, &form.category_id)?;
    let ctx = SyncContext {
        catalog: &state.catalog,
        fetcher: state.fetcher.as_ref(),
        metadata: state.metadata.as_ref(),
    };
    let summary = sync::sync_category(ctx, req).await?;
    Ok(Json(summary))
}

pub async fn list_nominations(
    State(state): State<Arc<AppState>>,
    Path((ceremony_id, category_id)): Path<(i32, i32)>,
) -> AppResult<Json<Vec<NominationView>>> {
    let rows = state.catalog.nominations_for(ceremony_id, category_id).await?;
    Ok(Json(rows))
}
