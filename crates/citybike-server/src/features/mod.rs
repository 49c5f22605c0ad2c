//! Feature modules implementing the read API
//!
//! Each feature is a vertical slice with its own queries and routes:
//!
//! - **stations**: station listings, details, and per-station statistics
//! - **journeys**: journey listings with filters
//! - **imports**: diagnostics over the import bookkeeping tables
//!
//! Every slice follows the structure:
//! - `queries/` - Read operations (get, list, stats)
//! - `routes.rs` - HTTP route definitions
//!
//! The import pipeline writes the data these features read; there are no
//! write endpoints.

pub mod imports;
pub mod journeys;
pub mod shared;
pub mod stations;

use axum::Router;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool for database operations
    pub db: sqlx::PgPool,
}

/// Creates the main API router with all feature routes mounted
///
/// - `/stations` - Station listings, details, and statistics
/// - `/journeys` - Journey listings
/// - `/imports` - Import progress diagnostics
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/stations", stations::stations_routes().with_state(state.db.clone()))
        .nest("/journeys", journeys::journeys_routes().with_state(state.db.clone()))
        .nest("/imports", imports::imports_routes().with_state(state.db))
}
