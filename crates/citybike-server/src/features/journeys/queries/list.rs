//! List journeys query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::features::shared::{Paginated, PaginationParams, SortParams};

/// Columns the journey list may be ordered by.
const SORTABLE_COLUMNS: &[&str] = &[
    "departure_time",
    "return_time",
    "departure_station_name",
    "return_station_name",
    "covered_distance",
    "duration",
];

/// Query parameters for listing journeys
///
/// GET /journeys?page=1&per_page=20&sort_by=duration&order=desc
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListJourneysQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    /// Only journeys departing from this station.
    pub departure_station_id: Option<String>,
    /// Only journeys returning to this station.
    pub return_station_id: Option<String>,
}

impl ListJourneysQuery {
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

/// One journey in a list response
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JourneySummary {
    pub id: Uuid,
    pub departure_time: String,
    pub return_time: String,
    pub departure_station_id: String,
    pub departure_station_name: String,
    pub return_station_id: String,
    pub return_station_name: String,
    pub covered_distance: i64,
    pub duration: i64,
    pub created_at: DateTime<Utc>,
}

pub async fn handle(
    pool: &PgPool,
    query: ListJourneysQuery,
) -> AppResult<Paginated<JourneySummary>> {
    let pagination = query.pagination();
    let (column, direction) = query.sort().resolve(SORTABLE_COLUMNS, "departure_time");

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM journeys
         WHERE ($1::text IS NULL OR departure_station_id = $1)
           AND ($2::text IS NULL OR return_station_id = $2)",
    )
    .bind(&query.departure_station_id)
    .bind(&query.return_station_id)
    .fetch_one(pool)
    .await?;

    // The column and direction are whitelisted constants, never user input.
    let sql = format!(
        "SELECT id, departure_time, return_time,
                departure_station_id, departure_station_name,
                return_station_id, return_station_name,
                covered_distance, duration, created_at
         FROM journeys
         WHERE ($1::text IS NULL OR departure_station_id = $1)
           AND ($2::text IS NULL OR return_station_id = $2)
         ORDER BY {column} {direction}, id ASC
         LIMIT $3 OFFSET $4"
    );

    let items = sqlx::query_as::<_, JourneySummary>(&sql)
        .bind(&query.departure_station_id)
        .bind(&query.return_station_id)
        .bind(pagination.per_page())
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sort_is_departure_time() {
        let query = ListJourneysQuery::default();
        assert_eq!(
            query.sort().resolve(SORTABLE_COLUMNS, "departure_time"),
            ("departure_time", "ASC")
        );
    }

    #[test]
    fn test_unknown_sort_column_falls_back() {
        let query = ListJourneysQuery {
            sort_by: Some("created_at; --".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.sort().resolve(SORTABLE_COLUMNS, "departure_time"),
            ("departure_time", "ASC")
        );
    }
}
