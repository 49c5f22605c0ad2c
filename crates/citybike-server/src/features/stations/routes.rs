//! Station routes
//!
//! Public read-only routes over imported stations.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::features::shared::Paginated;

use super::queries::{
    get::handle as handle_get, list::handle as handle_list, stats::handle as handle_stats,
    ListStationsQuery, StationDetails, StationStats, StationStatsQuery, StationSummary,
};

/// Create station routes
pub fn stations_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_stations))
        .route("/:id", get(get_station))
        .route("/:id/stats", get(get_station_stats))
}

/// List stations with pagination and sorting
///
/// GET /stations?page=1&per_page=20&sort_by=name_fi&order=asc
async fn list_stations(
    State(db): State<PgPool>,
    Query(query): Query<ListStationsQuery>,
) -> AppResult<Json<Paginated<StationSummary>>> {
    Ok(Json(handle_list(&db, query).await?))
}

/// Get one station by database id
///
/// GET /stations/:id
async fn get_station(
    State(db): State<PgPool>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StationDetails>> {
    Ok(Json(handle_get(&db, id).await?))
}

/// Get aggregate journey statistics for one station over a time window
///
/// GET /stations/:id/stats?start_date=...&end_date=...
async fn get_station_stats(
    State(db): State<PgPool>,
    Path(id): Path<Uuid>,
    Query(query): Query<StationStatsQuery>,
) -> AppResult<Json<StationStats>> {
    Ok(Json(handle_stats(&db, id, query).await?))
}
