use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;
use crate::filter::{Filter, Order};

/// The four operations the service needs from the hosted record store.
///
/// Rows travel as JSON objects whose keys are column names. Writes with an
/// empty filter are rejected so a bug can never touch a whole table.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one row and return it as stored.
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StorageError>;

    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StorageError>;

    /// Merge `patch` into every matching row. Returns the updated rows.
    async fn update(
        &self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> Result<Vec<Value>, StorageError>;

    /// Delete matching rows. Returns how many were removed.
    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StorageError>;
}

/// Reject writes whose filter would match every row.
pub(crate) fn guard_write(
    op: &'static str,
    table: &str,
    filter: &Filter,
) -> Result<(), StorageError> {
    if filter.is_empty() {
        return Err(StorageError::UnfilteredWrite {
            op,
            table: table.to_string(),
        });
    }
    Ok(())
}
