//! Station read queries

pub mod get;
pub mod list;
pub mod stats;

pub use get::StationDetails;
pub use list::{ListStationsQuery, StationSummary};
pub use stats::{StationStats, StationStatsQuery, TopStation};
