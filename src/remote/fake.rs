use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, oneshot};

use crate::errors::RemoteServiceError;
use crate::remote::query::{ChangeFilter, SelectQuery};
use crate::remote::service::RemoteDataService;
use crate::remote::subscription::{ChangeCallback, LossNotifier, Subscription};

struct Listener {
    id: u64,
    table: &'static str,
    on_change: ChangeCallback,
    lost: LossNotifier,
}

type Listeners = Arc<StdMutex<Vec<Listener>>>;

struct HeldSelect {
    release: oneshot::Receiver<()>,
    rows: Vec<Value>,
}

/// Scriptable in-process stand-in for the hosted service
#[derive(Default)]
pub struct FakeService {
    tables: Mutex<HashMap<&'static str, Vec<Value>>>,
    select_failures: Mutex<VecDeque<RemoteServiceError>>,
    insert_failures: Mutex<VecDeque<RemoteServiceError>>,
    held: Mutex<VecDeque<HeldSelect>>,
    listeners: Listeners,
    select_calls: AtomicU64,
    next_id: AtomicU64,
    subscribe_rejected: StdMutex<Option<RemoteServiceError>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_rows(&self, table: &'static str, rows: Vec<Value>) {
        self.tables.lock().await.insert(table, rows);
    }

    pub async fn fail_next_select(&self, message: &str) {
        self.select_failures
            .lock()
            .await
            .push_back(RemoteServiceError::rejected(500, message));
    }

    pub async fn fail_next_insert(&self, message: &str) {
        self.insert_failures
            .lock()
            .await
            .push_back(RemoteServiceError::rejected(400, message));
    }

    pub fn reject_subscriptions(&self, message: &str) {
        if let Ok(mut slot) = self.subscribe_rejected.lock() {
            *slot = Some(RemoteServiceError::channel(message));
        }
    }

    /// The next select blocks until the returned sender fires, then answers `rows`
    pub async fn hold_next_select(&self, rows: Vec<Value>) -> oneshot::Sender<()> {
        let (tx, release) = oneshot::channel();
        self.held.lock().await.push_back(HeldSelect { release, rows });
        tx
    }

    /// Fires every open subscription on `table`
    pub fn notify(&self, table: &str) {
        let callbacks: Vec<ChangeCallback> = self
            .listeners
            .lock()
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|l| l.table == table)
                    .map(|l| Arc::clone(&l.on_change))
                    .collect()
            })
            .unwrap_or_default();
        for callback in callbacks {
            callback();
        }
    }

    /// Ends every open channel on `table` from the service side
    pub fn drop_channels(&self, table: &str, message: &str) {
        let notifiers: Vec<LossNotifier> = self
            .listeners
            .lock()
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|l| l.table == table)
                    .map(|l| l.lost.clone())
                    .collect()
            })
            .unwrap_or_default();
        for notifier in notifiers {
            notifier.lost(RemoteServiceError::channel(message));
        }
    }

    pub fn select_calls(&self) -> u64 {
        self.select_calls.load(Ordering::SeqCst)
    }

    pub fn open_subscriptions(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RemoteDataService for FakeService {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, RemoteServiceError> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);

        let held = self.held.lock().await.pop_front();
        if let Some(held) = held {
            let _ = held.release.await;
            return Ok(held.rows);
        }

        if let Some(err) = self.select_failures.lock().await.pop_front() {
            return Err(err);
        }

        Ok(self
            .tables
            .lock()
            .await
            .get(query.table)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, RemoteServiceError> {
        if let Some(err) = self.insert_failures.lock().await.pop_front() {
            return Err(err);
        }

        let mut stored = row;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(fields) = stored.as_object_mut() {
            fields.insert("id".to_string(), json!(format!("{table}-{id}")));
            fields.insert("created_at".to_string(), json!("2025-03-01T09:00:00+00:00"));
        }
        self.tables
            .lock()
            .await
            .entry(table)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn subscribe(
        &self,
        filter: ChangeFilter,
        on_change: ChangeCallback,
    ) -> Result<Subscription, RemoteServiceError> {
        if let Some(err) = self.subscribe_rejected.lock().ok().and_then(|slot| slot.clone()) {
            return Err(err);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let listeners = Arc::clone(&self.listeners);
        let subscription = Subscription::new(filter.topic(), move || {
            if let Ok(mut listeners) = listeners.lock() {
                listeners.retain(|l| l.id != id);
            }
        });
        let listener = Listener {
            id,
            table: filter.table,
            on_change: subscription.gate(on_change),
            lost: subscription.loss_notifier(),
        };
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
        Ok(subscription)
    }
}
