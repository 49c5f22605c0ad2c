//! Journey feature slice

pub mod queries;
pub mod routes;

pub use routes::journeys_routes;
