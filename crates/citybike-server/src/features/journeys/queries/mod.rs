//! Journey read queries

pub mod list;

pub use list::{JourneySummary, ListJourneysQuery};
