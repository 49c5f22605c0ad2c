//! Shared feature utilities

pub mod pagination;
pub mod sorting;

pub use pagination::{Paginated, PaginationMetadata, PaginationParams};
pub use sorting::SortParams;
