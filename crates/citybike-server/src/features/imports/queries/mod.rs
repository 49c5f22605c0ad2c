//! Import diagnostics queries

pub mod status;

pub use status::{DatasetStatus, FileStatus, ImportStatus};
