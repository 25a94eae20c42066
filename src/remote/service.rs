use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RemoteServiceError;
use crate::remote::query::{ChangeFilter, SelectQuery};
use crate::remote::subscription::{ChangeCallback, Subscription};

/// Hosted relational store with a row-change channel.
///
/// Rows travel as raw JSON; typing happens in the accessors.
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    /// All rows of `query.table`, in the order the service returns them
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, RemoteServiceError>;

    /// Stores one row and returns it as stored, generated fields included
    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, RemoteServiceError>;

    /// Opens a change channel; `on_change` fires once per notification
    async fn subscribe(
        &self,
        filter: ChangeFilter,
        on_change: ChangeCallback,
    ) -> Result<Subscription, RemoteServiceError>;

    /// Schema that change filters are scoped to
    fn schema(&self) -> &str {
        "public"
    }
}
