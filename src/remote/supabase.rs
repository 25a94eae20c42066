use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::config::RemoteSettings;
use crate::errors::RemoteServiceError;
use crate::remote::query::{ChangeFilter, SelectQuery};
use crate::remote::realtime::RealtimeClient;
use crate::remote::rest::RestClient;
use crate::remote::service::RemoteDataService;
use crate::remote::subscription::{ChangeCallback, Subscription};

/// The hosted service: REST for rows, websocket for change notifications
pub struct SupabaseService {
    rest: RestClient,
    realtime: RealtimeClient,
}

impl SupabaseService {
    pub fn new(settings: RemoteSettings) -> Result<Self> {
        Ok(Self {
            rest: RestClient::new(settings.clone())?,
            realtime: RealtimeClient::new(settings),
        })
    }
}

#[async_trait]
impl RemoteDataService for SupabaseService {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, RemoteServiceError> {
        self.rest.get_rows(query).await
    }

    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, RemoteServiceError> {
        self.rest.post_row(table, &row).await
    }

    async fn subscribe(
        &self,
        filter: ChangeFilter,
        on_change: ChangeCallback,
    ) -> Result<Subscription, RemoteServiceError> {
        self.realtime.subscribe(filter, on_change).await
    }

    fn schema(&self) -> &str {
        self.rest.settings().schema
    }
}
