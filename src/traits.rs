//! Traits for data retrieval abstraction

use async_trait::async_trait;

use crate::types::*;

/// Source of raw statements
///
/// The engine itself never performs I/O. Anything that can hand back raw
/// statement records (a document store, an HTTP API, an in-memory fixture)
/// implements this trait and is driven by [`crate::service::StatementService`].
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Get a raw statement by ID
    async fn get_statement(&self, statement_id: &str) -> SourceResult<Option<RawStatement>>;

    /// List every raw statement the source holds
    async fn list_statements(&self) -> SourceResult<Vec<RawStatement>>;
}
