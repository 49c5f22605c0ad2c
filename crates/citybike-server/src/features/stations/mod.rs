//! Station feature slice

pub mod queries;
pub mod routes;

pub use routes::stations_routes;
