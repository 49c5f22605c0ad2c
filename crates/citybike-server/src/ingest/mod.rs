//! Bulk CSV import
//!
//! Resumable, idempotent ingestion of station and journey datasets. Each
//! dataset kind lives in its own subdirectory of the datasets root and is
//! guarded by a durable completion flag; each file carries a durable 1-based
//! line cursor so interrupted imports pick up where they left off.
//!
//! Layering, top down:
//!
//! - [`coordinator`]: per-kind lifecycle (flag check, discovery, fan-out)
//! - [`pipeline`]: per-file streaming loop (skip, validate, persist, advance)
//! - [`validator`]: pure row validation and normalization
//! - [`store`]: persistence seam ([`ImportStore`]), implemented for
//!   PostgreSQL in [`pg`]

pub mod coordinator;
pub mod error;
pub mod pg;
pub mod pipeline;
pub mod store;
pub mod validator;

pub use coordinator::{import_all, import_kind};
pub use error::{ImportError, ImportResult};
pub use pg::PgImportStore;
pub use store::{DatasetState, FileProgress, ImportStore};
pub use validator::{RawRow, RejectionReason};
