//! Per-station journey statistics
//!
//! Aggregates journeys departing from and returning to one station over a
//! required time window: counts, average covered distances, and the five
//! most popular counterpart stations in each direction. Every aggregate
//! filters on the journey's departure timestamp, in both directions.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Query parameters for station statistics
///
/// GET /stations/:id/stats?start_date=2021-06-01T00:00:00&end_date=2021-07-01T00:00:00
///
/// Both bounds are required ISO-8601 datetimes; the window is inclusive on
/// both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationStatsQuery {
    pub start_date: String,
    pub end_date: String,
}

impl StationStatsQuery {
    fn validate(&self) -> AppResult<()> {
        for (name, value) in [("start_date", &self.start_date), ("end_date", &self.end_date)] {
            if value.trim().parse::<chrono::NaiveDateTime>().is_err() {
                return Err(AppError::Validation(format!(
                    "{name} must be a valid ISO-8601 datetime"
                )));
            }
        }
        if self.start_date > self.end_date {
            return Err(AppError::Validation(
                "start_date must not be after end_date".to_string(),
            ));
        }
        Ok(())
    }
}

/// A popular counterpart station
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopStation {
    pub station_id: String,
    pub name: String,
    pub journeys: i64,
}

/// Aggregate statistics for one station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationStats {
    pub station_id: String,
    /// Journeys departing from this station inside the window.
    pub total_journeys_started: i64,
    /// Journeys returning to this station inside the window.
    pub total_journeys_ended: i64,
    /// Average covered distance in meters over departing journeys.
    pub average_distance_started: f64,
    /// Average covered distance in meters over returning journeys.
    pub average_distance_ended: f64,
    /// Top 5 stations journeys from here return to.
    pub top_5_return_stations: Vec<TopStation>,
    /// Top 5 stations journeys ending here departed from.
    pub top_5_departure_stations: Vec<TopStation>,
}

#[derive(Debug, sqlx::FromRow)]
struct DirectionAggregate {
    count: i64,
    avg_distance: f64,
}

pub async fn handle(
    pool: &PgPool,
    id: Uuid,
    query: StationStatsQuery,
) -> AppResult<StationStats> {
    query.validate()?;

    // Aggregates are keyed by the source station id the journeys reference,
    // so resolve the database identity to it first.
    let station_id =
        sqlx::query_scalar::<_, String>("SELECT station_id FROM stations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Station {id} not found")))?;

    let started = direction_aggregate(pool, "departure_station_id", &station_id, &query).await?;
    let ended = direction_aggregate(pool, "return_station_id", &station_id, &query).await?;

    let top_5_return_stations = top_counterparts(
        pool,
        "departure_station_id",
        "return_station_id",
        &station_id,
        &query,
    )
    .await?;
    let top_5_departure_stations = top_counterparts(
        pool,
        "return_station_id",
        "departure_station_id",
        &station_id,
        &query,
    )
    .await?;

    Ok(StationStats {
        station_id,
        total_journeys_started: started.count,
        total_journeys_ended: ended.count,
        average_distance_started: started.avg_distance,
        average_distance_ended: ended.avg_distance,
        top_5_return_stations,
        top_5_departure_stations,
    })
}

/// Count and average distance of journeys matching `station_id` on
/// `match_column`. The average is cast so the result stays a double, and an
/// empty selection averages to zero.
async fn direction_aggregate(
    pool: &PgPool,
    match_column: &'static str,
    station_id: &str,
    query: &StationStatsQuery,
) -> AppResult<DirectionAggregate> {
    let sql = format!(
        "SELECT COUNT(*) AS count,
                COALESCE(AVG(covered_distance::double precision), 0) AS avg_distance
         FROM journeys
         WHERE {match_column} = $1
           AND departure_time >= $2
           AND departure_time <= $3"
    );

    let aggregate = sqlx::query_as::<_, DirectionAggregate>(&sql)
        .bind(station_id)
        .bind(&query.start_date)
        .bind(&query.end_date)
        .fetch_one(pool)
        .await?;

    Ok(aggregate)
}

/// The five most frequent counterpart stations for journeys matching
/// `station_id` on `match_column`, resolved back to station names. A
/// counterpart id with no station record is dropped (journeys hold loose
/// references); duplicate station rows cannot inflate the counts because
/// grouping happens before the lateral lookup.
async fn top_counterparts(
    pool: &PgPool,
    match_column: &'static str,
    group_column: &'static str,
    station_id: &str,
    query: &StationStatsQuery,
) -> AppResult<Vec<TopStation>> {
    let sql = format!(
        "SELECT c.station_id, s.name_fi AS name, c.journeys
         FROM (
             SELECT {group_column} AS station_id, COUNT(*) AS journeys
             FROM journeys
             WHERE {match_column} = $1
               AND departure_time >= $2
               AND departure_time <= $3
             GROUP BY {group_column}
             ORDER BY journeys DESC, station_id ASC
             LIMIT 5
         ) c
         JOIN LATERAL (
             SELECT name_fi FROM stations
             WHERE station_id = c.station_id
             ORDER BY created_at ASC, id ASC
             LIMIT 1
         ) s ON TRUE
         ORDER BY c.journeys DESC, c.station_id ASC"
    );

    let top = sqlx::query_as::<_, TopStation>(&sql)
        .bind(station_id)
        .bind(&query.start_date)
        .bind(&query.end_date)
        .fetch_all(pool)
        .await?;

    Ok(top)
}
