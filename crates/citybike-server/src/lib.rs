//! CityBike Server Library
//!
//! HTTP server and bulk-import pipeline for city bike trip data.
//!
//! # Overview
//!
//! The server ingests delimited station and journey datasets from flat files
//! into PostgreSQL and exposes a read API over the stored records:
//!
//! - **Ingest**: resumable, idempotent CSV import with a durable per-file
//!   line cursor ([`ingest`])
//! - **Features**: paginated station/journey listings and per-station
//!   aggregate statistics ([`features`])
//! - **Configuration**: environment-based configuration management
//! - **Middleware**: CORS, request tracing, response compression
//!
//! # Framework Stack
//!
//! - **Axum**: HTTP routing and handlers
//! - **SQLx**: PostgreSQL access and migrations
//! - **csv-async**: streaming CSV parsing for the importer

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;

// Re-export commonly used types
pub use error::{AppError, AppResult};
