//! PostgREST-style HTTP record store.
//!
//! Maps each operation onto the hosted database's REST interface:
//! `POST`/`GET`/`PATCH`/`DELETE /rest/v1/{table}` with `column=op.value`
//! query filters and `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::StorageError;
use crate::filter::{Condition, Filter, Order};
use crate::store::{guard_write, RecordStore};

#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base: Url,
}

impl RestStore {
    /// Build a client for the store at `base_url`, authenticating every
    /// request with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StorageError> {
        let base = Url::parse(base_url).map_err(|e| StorageError::Config(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| StorageError::Config(format!("invalid api key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| StorageError::Config(format!("invalid api key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// URL for `table` carrying `filter` and `order` as query parameters.
    pub fn table_url(
        &self,
        table: &str,
        filter: &Filter,
        order: Option<&Order>,
    ) -> Result<Url, StorageError> {
        let mut url = self
            .base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| StorageError::Config(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            for condition in filter.conditions() {
                let value = match condition {
                    Condition::Eq(_, Value::String(s)) => format!("eq.{s}"),
                    Condition::Eq(_, other) => format!("eq.{other}"),
                    Condition::IsNull(_) => "is.null".to_string(),
                    Condition::NotNull(_) => "not.is.null".to_string(),
                };
                query.append_pair(condition.column(), &value);
            }
            if let Some(order) = order {
                let direction = if order.ascending { "asc" } else { "desc" };
                query.append_pair("order", &format!("{}.{direction}", order.column));
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Prefer", "return=representation")
    }

    async fn send_rows(&self, req: RequestBuilder) -> Result<Vec<Value>, StorageError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let rows: Vec<Value> = resp.json().await?;
        Ok(rows)
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StorageError> {
        if !record.is_object() {
            return Err(StorageError::NotAnObject);
        }
        let url = self.table_url(table, &Filter::new(), None)?;
        debug!(table, "insert");
        let rows = self
            .send_rows(self.request(Method::POST, url).json(&record))
            .await?;
        Ok(rows.into_iter().next().unwrap_or(record))
    }

    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StorageError> {
        let mut url = self.table_url(table, filter, order)?;
        url.query_pairs_mut().append_pair("select", "*");
        debug!(table, "select");
        self.send_rows(self.request(Method::GET, url)).await
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> Result<Vec<Value>, StorageError> {
        guard_write("update", table, filter)?;
        if !patch.is_object() {
            return Err(StorageError::NotAnObject);
        }
        let url = self.table_url(table, filter, None)?;
        debug!(table, "update");
        self.send_rows(self.request(Method::PATCH, url).json(&patch))
            .await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StorageError> {
        guard_write("delete", table, filter)?;
        let url = self.table_url(table, filter, None)?;
        debug!(table, "delete");
        let rows = self.send_rows(self.request(Method::DELETE, url)).await?;
        Ok(rows.len())
    }
}
