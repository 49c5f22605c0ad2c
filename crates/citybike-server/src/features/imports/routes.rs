//! Import diagnostics routes

use axum::{extract::State, routing::get, Json, Router};
use sqlx::PgPool;

use crate::error::AppResult;

use super::queries::{status::handle as handle_status, ImportStatus};

/// Create import diagnostics routes
pub fn imports_routes() -> Router<PgPool> {
    Router::new().route("/", get(get_import_status))
}

/// Report dataset completion flags and per-file cursors
///
/// GET /imports
async fn get_import_status(State(db): State<PgPool>) -> AppResult<Json<ImportStatus>> {
    Ok(Json(handle_status(&db).await?))
}
