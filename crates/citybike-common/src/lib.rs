//! CityBike Common Library
//!
//! Shared types and utilities for the CityBike workspace:
//!
//! - **Types**: the normalized station and journey record shapes produced by
//!   the import pipeline and consumed by the read API
//! - **Logging**: centralized tracing initialization for all binaries

pub mod logging;
pub mod types;

pub use types::{DatasetKind, JourneyRecord, NormalizedRecord, StationRecord};
