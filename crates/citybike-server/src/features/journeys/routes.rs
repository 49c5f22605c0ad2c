//! Journey routes
//!
//! Public read-only routes over imported journeys.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::features::shared::Paginated;

use super::queries::{list::handle as handle_list, JourneySummary, ListJourneysQuery};

/// Create journey routes
pub fn journeys_routes() -> Router<PgPool> {
    Router::new().route("/", get(list_journeys))
}

/// List journeys with pagination, sorting, and station filters
///
/// GET /journeys?page=1&per_page=20&sort_by=duration&order=desc&departure_station_id=094
async fn list_journeys(
    State(db): State<PgPool>,
    Query(query): Query<ListJourneysQuery>,
) -> AppResult<Json<Paginated<JourneySummary>>> {
    Ok(Json(handle_list(&db, query).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_journeys_routes_build() {
        let _router = journeys_routes();
    }
}
