//! Shared sorting utilities
//!
//! Sort columns come from the query string and are interpolated into ORDER
//! BY clauses, so they are resolved against a per-query whitelist. Anything
//! not on the whitelist falls back to the query's default column.

use serde::{Deserialize, Serialize};

/// Sort request parameters shared by list queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SortParams {
    /// Column to sort by. Falls back to the query's default when absent or
    /// not whitelisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// Sort direction: "asc" (default) or "desc".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl SortParams {
    /// Resolve to a safe `(column, direction)` pair for an ORDER BY clause.
    pub fn resolve(
        &self,
        whitelist: &[&'static str],
        default_column: &'static str,
    ) -> (&'static str, &'static str) {
        let column = self
            .sort_by
            .as_deref()
            .and_then(|requested| whitelist.iter().find(|c| **c == requested))
            .copied()
            .unwrap_or(default_column);

        let direction = match self.order.as_deref() {
            Some("desc") | Some("DESC") => "DESC",
            _ => "ASC",
        };

        (column, direction)
    }
}
