use log::{debug, info, warn};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::accessors::entity::{Entity, LiveEntity};
use crate::errors::RemoteServiceError;
use crate::remote::{ChangeFilter, RemoteDataService, Subscription};

/// Read/write/subscribe wrapper for one entity type
pub struct Accessor<E: Entity> {
    service: Arc<dyn RemoteDataService>,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Accessor<E> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> Accessor<E> {
    pub fn new(service: Arc<dyn RemoteDataService>) -> Self {
        Self {
            service,
            entity: PhantomData,
        }
    }

    /// All rows in the table's fixed order, exactly as the service returned them
    pub async fn fetch_all(&self) -> Result<Vec<E>, RemoteServiceError> {
        let rows = self.service.select(&E::query()).await.inspect_err(|e| {
            warn!("Fetching {} failed ({:?}): {}", E::TABLE, e.kind, e);
        })?;

        let records = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<E>, _>>()
            .map_err(|e| {
                warn!("Decoding {} rows failed: {}", E::TABLE, e);
                RemoteServiceError::decode(format!("Unexpected {} row: {}", E::TABLE, e))
            })?;

        debug!("Fetched {} rows from {}", records.len(), E::TABLE);
        Ok(records)
    }

    /// Stores one record and returns it with its generated fields
    pub async fn insert_one(&self, draft: &E::Draft) -> Result<E, RemoteServiceError> {
        let row = serde_json::to_value(draft)?;
        let stored = self.service.insert(E::TABLE, row).await.inspect_err(|e| {
            warn!("Insert into {} failed ({:?}): {}", E::TABLE, e.kind, e);
        })?;

        let record = serde_json::from_value(stored).map_err(|e| {
            RemoteServiceError::decode(format!("Unexpected {} row: {}", E::TABLE, e))
        })?;
        info!("Inserted one row into {}", E::TABLE);
        Ok(record)
    }
}

impl<E: LiveEntity> Accessor<E> {
    /// Calls `on_change` for every insert/update/delete on the table.
    ///
    /// The returned disposer must be released when the consumer goes away.
    pub async fn subscribe_to_changes<F>(&self, on_change: F) -> Result<Subscription, RemoteServiceError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let filter = ChangeFilter::all(self.service.schema(), E::TABLE);
        self.service
            .subscribe(filter, Arc::new(on_change))
            .await
            .inspect_err(|e| warn!("Subscribing to {} failed ({:?}): {}", E::TABLE, e.kind, e))
    }
}
