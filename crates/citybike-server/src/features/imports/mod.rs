//! Import diagnostics feature slice

pub mod queries;
pub mod routes;

pub use routes::imports_routes;
