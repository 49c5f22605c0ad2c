//! Get station query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Full station details
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StationDetails {
    pub id: Uuid,
    pub fid: String,
    pub station_id: String,
    pub name_fi: String,
    pub name_sv: String,
    pub name_en: String,
    pub address_fi: String,
    pub address_sv: String,
    pub city_fi: String,
    pub city_sv: String,
    pub operator: String,
    pub capacity: String,
    pub x: f64,
    pub y: f64,
    pub created_at: DateTime<Utc>,
}

/// Fetch one station by its database identity.
pub async fn handle(pool: &PgPool, id: Uuid) -> AppResult<StationDetails> {
    sqlx::query_as::<_, StationDetails>(
        "SELECT id, fid, station_id, name_fi, name_sv, name_en,
                address_fi, address_sv, city_fi, city_sv,
                operator, capacity, x, y, created_at
         FROM stations
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Station {id} not found")))
}
