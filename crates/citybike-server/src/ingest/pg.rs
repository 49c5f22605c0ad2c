//! PostgreSQL-backed import store

use async_trait::async_trait;
use citybike_common::{DatasetKind, NormalizedRecord};
use sqlx::PgPool;

use super::error::{ImportError, ImportResult};
use super::store::{DatasetState, FileProgress, ImportStore};

/// [`ImportStore`] backed by the server's PostgreSQL pool.
#[derive(Clone)]
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn dataset_state(&self, kind: DatasetKind) -> ImportResult<DatasetState> {
        sqlx::query(
            "INSERT INTO dataset_import_state (kind) VALUES ($1) ON CONFLICT (kind) DO NOTHING",
        )
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        let completed = sqlx::query_scalar::<_, bool>(
            "SELECT completed FROM dataset_import_state WHERE kind = $1",
        )
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(DatasetState { kind, completed })
    }

    async fn mark_dataset_completed(&self, kind: DatasetKind) -> ImportResult<()> {
        sqlx::query(
            "UPDATE dataset_import_state SET completed = TRUE, updated_at = NOW() WHERE kind = $1",
        )
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_or_create_tracker(
        &self,
        kind: DatasetKind,
        file_path: &str,
    ) -> ImportResult<FileProgress> {
        // The owning state row must exist first for the foreign key.
        sqlx::query(
            "INSERT INTO dataset_import_state (kind) VALUES ($1) ON CONFLICT (kind) DO NOTHING",
        )
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "INSERT INTO file_progress (file_path, kind) VALUES ($1, $2)
             ON CONFLICT (file_path) DO NOTHING",
        )
        .bind(file_path)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        let next_line = sqlx::query_scalar::<_, i64>(
            "SELECT next_line FROM file_progress WHERE file_path = $1",
        )
        .bind(file_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(FileProgress {
            file_path: file_path.to_string(),
            kind,
            next_line,
        })
    }

    async fn current_line(&self, file_path: &str) -> ImportResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT next_line FROM file_progress WHERE file_path = $1")
            .bind(file_path)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ImportError::TrackerNotFound {
                file_path: file_path.to_string(),
            })
    }

    async fn advance(&self, file_path: &str) -> ImportResult<()> {
        let result = sqlx::query(
            "UPDATE file_progress SET next_line = next_line + 1, updated_at = NOW()
             WHERE file_path = $1",
        )
        .bind(file_path)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ImportError::TrackerNotFound {
                file_path: file_path.to_string(),
            });
        }

        Ok(())
    }

    async fn insert(&self, record: &NormalizedRecord) -> ImportResult<()> {
        match record {
            NormalizedRecord::Station(s) => {
                sqlx::query(
                    "INSERT INTO stations (
                        fid, station_id, name_fi, name_sv, name_en,
                        address_fi, address_sv, city_fi, city_sv,
                        operator, capacity, x, y
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
                )
                .bind(&s.fid)
                .bind(&s.station_id)
                .bind(&s.name_fi)
                .bind(&s.name_sv)
                .bind(&s.name_en)
                .bind(&s.address_fi)
                .bind(&s.address_sv)
                .bind(&s.city_fi)
                .bind(&s.city_sv)
                .bind(&s.operator)
                .bind(&s.capacity)
                .bind(s.x)
                .bind(s.y)
                .execute(&self.pool)
                .await?;
            },
            NormalizedRecord::Journey(j) => {
                sqlx::query(
                    "INSERT INTO journeys (
                        departure_time, return_time,
                        departure_station_id, departure_station_name,
                        return_station_id, return_station_name,
                        covered_distance, duration
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                )
                .bind(&j.departure_time)
                .bind(&j.return_time)
                .bind(&j.departure_station_id)
                .bind(&j.departure_station_name)
                .bind(&j.return_station_id)
                .bind(&j.return_station_name)
                .bind(j.covered_distance)
                .bind(j.duration)
                .execute(&self.pool)
                .await?;
            },
        }

        Ok(())
    }
}
