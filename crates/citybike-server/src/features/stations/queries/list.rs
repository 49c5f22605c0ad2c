//! List stations query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::features::shared::{Paginated, PaginationParams, SortParams};

/// Columns the station list may be ordered by.
const SORTABLE_COLUMNS: &[&str] = &[
    "station_id",
    "name_fi",
    "name_sv",
    "name_en",
    "address_fi",
    "city_fi",
    "operator",
    "capacity",
];

/// Query parameters for listing stations
///
/// GET /stations?page=1&per_page=20&sort_by=name_fi&order=asc
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListStationsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListStationsQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    fn sort(&self) -> SortParams {
        SortParams {
            sort_by: self.sort_by.clone(),
            order: self.order.clone(),
        }
    }
}

/// One station in a list response
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StationSummary {
    pub id: Uuid,
    pub station_id: String,
    pub name_fi: String,
    pub name_sv: String,
    pub name_en: String,
    pub address_fi: String,
    pub city_fi: String,
    pub operator: String,
    pub capacity: String,
    pub x: f64,
    pub y: f64,
    pub created_at: DateTime<Utc>,
}

pub async fn handle(
    pool: &PgPool,
    query: ListStationsQuery,
) -> AppResult<Paginated<StationSummary>> {
    let pagination = query.pagination();
    let (column, direction) = query.sort().resolve(SORTABLE_COLUMNS, "station_id");

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stations")
        .fetch_one(pool)
        .await?;

    // The column and direction are whitelisted constants, never user input.
    let sql = format!(
        "SELECT id, station_id, name_fi, name_sv, name_en, address_fi, city_fi,
                operator, capacity, x, y, created_at
         FROM stations
         ORDER BY {column} {direction}, id ASC
         LIMIT $1 OFFSET $2"
    );

    let items = sqlx::query_as::<_, StationSummary>(&sql)
        .bind(pagination.per_page())
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated::from_items(items, &pagination, total))
}
