use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StorageError;
use crate::filter::{Filter, Order};
use crate::store::RecordStore;

/// Insert a typed record. Returns the row as the store saved it.
pub async fn insert_record<T: Serialize + DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    record: &T,
) -> Result<T, StorageError> {
    let row = store.insert(table, serde_json::to_value(record)?).await?;
    Ok(serde_json::from_value(row)?)
}

/// Select typed records matching `filter`.
pub async fn select_records<T: DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    filter: &Filter,
    order: Option<&Order>,
) -> Result<Vec<T>, StorageError> {
    store
        .select(table, filter, order)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(StorageError::from))
        .collect()
}

/// First record matching `filter`, if any.
pub async fn find_record<T: DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    filter: &Filter,
) -> Result<Option<T>, StorageError> {
    let mut rows = select_records(store, table, filter, None).await?;
    Ok(if rows.is_empty() {
        None
    } else {
        Some(rows.swap_remove(0))
    })
}

/// Load the record with primary key `id`.
pub async fn get_record<T: DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    id: Uuid,
) -> Result<T, StorageError> {
    find_record(store, table, &Filter::by_id(id))
        .await?
        .ok_or_else(|| not_found(table, id))
}

/// Apply `patch` to the record with primary key `id` and return the result.
pub async fn update_record<T: DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    id: Uuid,
    patch: Value,
) -> Result<T, StorageError> {
    let row = store
        .update(table, patch, &Filter::by_id(id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| not_found(table, id))?;
    Ok(serde_json::from_value(row)?)
}

/// Overwrite every column of an existing record with `record`.
pub async fn replace_record<T: Serialize + DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    id: Uuid,
    record: &T,
) -> Result<T, StorageError> {
    update_record(store, table, id, serde_json::to_value(record)?).await
}

/// Delete the record with primary key `id`.
pub async fn delete_record(
    store: &dyn RecordStore,
    table: &str,
    id: Uuid,
) -> Result<(), StorageError> {
    match store.delete(table, &Filter::by_id(id)).await? {
        0 => Err(not_found(table, id)),
        _ => Ok(()),
    }
}

fn not_found(table: &str, id: Uuid) -> StorageError {
    StorageError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
    }
}
