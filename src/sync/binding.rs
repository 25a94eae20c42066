use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::accessors::{Accessor, Entity, LiveEntity};
use crate::errors::RemoteServiceError;
use crate::remote::{RemoteDataService, Subscription};
use crate::sync::state::{Phase, ViewState};

struct Inner<E: Entity> {
    accessor: Accessor<E>,
    state: watch::Sender<ViewState<E>>,
    in_flight: AtomicUsize,
    subscription: Mutex<Option<Subscription>>,
}

impl<E: Entity> Inner<E> {
    async fn refresh(&self) -> Phase {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(ViewState::begin_fetch);
        debug!("{} -> loading", E::TABLE);

        let outcome = self.accessor.fetch_all().await;
        if let Err(e) = &outcome {
            warn!("Keeping previous {} data: {}", E::TABLE, e);
        }

        // superseded fetches are not cancelled; the last one to land wins
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        let mut phase = Phase::Idle;
        self.state.send_modify(|state| {
            state.complete_fetch(outcome, remaining > 0);
            phase = state.phase;
        });
        debug!("{} -> {:?}", E::TABLE, phase);
        phase
    }

    fn record_error(&self, error: &RemoteServiceError) {
        self.state
            .send_modify(|state| state.error = Some(error.to_string()));
    }

    fn take_subscription(&self) -> Option<Subscription> {
        self.subscription.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Binds one accessor's output to locally held view state.
///
/// Cloning shares the same state; each view owns its own binding.
pub struct Binding<E: Entity> {
    inner: Arc<Inner<E>>,
}

impl<E: Entity> Clone for Binding<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entity> Binding<E> {
    pub fn new(service: Arc<dyn RemoteDataService>) -> Self {
        Self::from_accessor(Accessor::new(service))
    }

    pub fn from_accessor(accessor: Accessor<E>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            inner: Arc::new(Inner {
                accessor,
                state,
                in_flight: AtomicUsize::new(0),
                subscription: Mutex::new(None),
            }),
        }
    }

    pub async fn mount(&self) -> Phase {
        self.refresh().await
    }

    /// Fetch and replace `data`, or record the error and keep it
    pub async fn refresh(&self) -> Phase {
        self.inner.refresh().await
    }

    /// Inserts a record and refreshes on success.
    ///
    /// Insert failures go back to the caller and do not touch `error`.
    pub async fn insert(&self, draft: &E::Draft) -> Result<E, RemoteServiceError> {
        let stored = self.inner.accessor.insert_one(draft).await?;
        self.refresh().await;
        Ok(stored)
    }

    pub fn snapshot(&self) -> ViewState<E> {
        self.inner.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// State for a view being shown, fetched again unless change notifications keep it current
    pub async fn current(&self) -> ViewState<E> {
        if !self.is_live() || matches!(self.phase(), Phase::Idle | Phase::Failed) {
            self.refresh().await;
        }
        self.snapshot()
    }

    pub fn watch(&self) -> watch::Receiver<ViewState<E>> {
        self.inner.state.subscribe()
    }

    pub fn is_live(&self) -> bool {
        self.inner
            .subscription
            .lock()
            .map(|slot| slot.as_ref().is_some_and(Subscription::is_active))
            .unwrap_or(false)
    }

    /// Releases the change subscription, if any. Safe to call repeatedly.
    pub fn teardown(&self) -> bool {
        match self.inner.take_subscription() {
            Some(subscription) => {
                subscription.dispose();
                debug!("{} binding torn down", E::TABLE);
                true
            }
            None => false,
        }
    }
}

impl<E: LiveEntity> Binding<E> {
    /// Re-fetches on every remote change notification until torn down
    pub async fn go_live(&self) -> Result<(), RemoteServiceError> {
        let weak = Arc::downgrade(&self.inner);
        let runtime = Handle::current();

        let subscribed = self
            .inner
            .accessor
            .subscribe_to_changes(move || {
                if let Some(inner) = weak.upgrade() {
                    runtime.spawn(async move {
                        inner.refresh().await;
                    });
                }
            })
            .await;

        let subscription = match subscribed {
            Ok(subscription) => subscription,
            Err(e) => {
                self.inner.record_error(&e);
                return Err(e);
            }
        };

        let weak = Arc::downgrade(&self.inner);
        subscription.on_lost(move |e| {
            warn!("{} no longer live: {}", E::TABLE, e);
            if let Some(inner) = weak.upgrade() {
                inner.record_error(&e);
            }
        });

        let previous = self
            .inner
            .subscription
            .lock()
            .ok()
            .and_then(|mut slot| slot.replace(subscription));
        if let Some(previous) = previous {
            previous.dispose();
        }
        Ok(())
    }

    pub async fn mount_live(&self) -> Result<Phase, RemoteServiceError> {
        let phase = self.mount().await;
        self.go_live().await?;
        Ok(phase)
    }

    /// Like `current`, and re-opens a change subscription that failed or was lost
    pub async fn current_live(&self) -> ViewState<E> {
        let live = self.is_live();
        if !live || matches!(self.phase(), Phase::Idle | Phase::Failed) {
            self.refresh().await;
        }
        if !live {
            if let Err(e) = self.go_live().await {
                warn!("{} stays without live updates: {}", E::TABLE, e);
            }
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeaderboardEntry, Match, MatchStatus, NewPlayer, Player};
    use crate::remote::fake::FakeService;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn match_row(status: &str) -> Value {
        json!({ "id": "m1", "round": 3, "board": 1, "status": status, "viewers": 10 })
    }

    async fn settle<E: Entity>(binding: &Binding<E>, done: impl FnMut(&ViewState<E>) -> bool) {
        let mut rx = binding.watch();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(done))
            .await
            .expect("binding did not settle")
            .expect("state channel closed");
    }

    fn draft(first_name: &str) -> NewPlayer {
        NewPlayer {
            first_name: first_name.to_string(),
            last_name: "Polgar".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            phone: String::new(),
            country: "OTHER".to_string(),
            rating: 1200,
            title: None,
            birth_date: String::new(),
            emergency_contact: String::new(),
            emergency_phone: String::new(),
            payment_status: "pending".to_string(),
        }
    }

    async fn wait_for_selects(service: &FakeService, calls: u64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while service.select_calls() < calls {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("fetches were not issued");
    }

    fn first_status(state: &ViewState<Match>) -> Option<MatchStatus> {
        state.data.first().map(|m| m.status)
    }

    #[tokio::test]
    async fn test_mount_populates_data_in_service_order() {
        let service = Arc::new(FakeService::new());
        service
            .set_rows(
                "leaderboard",
                vec![
                    json!({ "id": "a", "rank": 1, "points": 3.0 }),
                    json!({ "id": "b", "rank": 2, "points": 2.5 }),
                ],
            )
            .await;
        let binding: Binding<LeaderboardEntry> = Binding::new(service);
        assert_eq!(binding.snapshot().phase, Phase::Idle);

        assert_eq!(binding.mount().await, Phase::Ready);

        let state = binding.snapshot();
        let ids: Vec<&str> = state.data.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_data_and_sets_error() {
        let service = Arc::new(FakeService::new());
        service.set_rows("matches", vec![match_row("live")]).await;
        let binding: Binding<Match> = Binding::new(service.clone());
        binding.mount().await;

        service.fail_next_select("Failed to fetch").await;
        assert_eq!(binding.refresh().await, Phase::Failed);

        let state = binding.snapshot();
        assert_eq!(state.data.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch"));
        assert!(!state.loading);

        assert_eq!(binding.refresh().await, Phase::Ready);
        assert_eq!(binding.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_insert_refreshes_with_record_once() {
        let service = Arc::new(FakeService::new());
        let binding: Binding<Player> = Binding::new(service.clone());
        binding.mount().await;

        let stored = binding.insert(&draft("Judit")).await.unwrap();

        let state = binding.snapshot();
        assert_eq!(state.data.iter().filter(|p| p.id == stored.id).count(), 1);
        assert_eq!(service.select_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_state_alone() {
        let service = Arc::new(FakeService::new());
        service.fail_next_insert("duplicate key value").await;
        let binding: Binding<Player> = Binding::new(service.clone());
        binding.mount().await;

        assert!(binding.insert(&draft("Vera")).await.is_err());
        assert_eq!(binding.snapshot().error, None);
        assert_eq!(service.select_calls(), 1);
    }

    #[tokio::test]
    async fn test_status_cycle_refetches_on_each_notification() {
        let service = Arc::new(FakeService::new());
        let binding: Binding<Match> = Binding::new(service.clone());
        binding.mount_live().await.unwrap();
        assert!(binding.is_live());

        for (status, expected) in [
            ("upcoming", MatchStatus::Upcoming),
            ("live", MatchStatus::Live),
            ("completed", MatchStatus::Completed),
        ] {
            service.set_rows("matches", vec![match_row(status)]).await;
            service.notify("matches");
            settle(&binding, |s| !s.loading && first_status(s) == Some(expected)).await;
        }

        assert_eq!(service.select_calls(), 4);
        binding.teardown();
    }

    #[tokio::test]
    async fn test_racing_notifications_last_landing_wins() {
        let service = Arc::new(FakeService::new());
        let binding: Binding<Match> = Binding::new(service.clone());
        binding.mount_live().await.unwrap();

        let first = service.hold_next_select(vec![match_row("live")]).await;
        let second = service.hold_next_select(vec![match_row("upcoming")]).await;
        service.notify("matches");
        service.notify("matches");
        wait_for_selects(&service, 3).await;

        first.send(()).unwrap();
        settle(&binding, |s| first_status(s) == Some(MatchStatus::Live)).await;
        assert!(binding.snapshot().loading);

        second.send(()).unwrap();
        settle(&binding, |s| !s.loading && first_status(s) == Some(MatchStatus::Upcoming)).await;

        let state = binding.snapshot();
        assert_eq!(state.error, None);
        assert_eq!(state.phase, Phase::Ready);
        binding.teardown();
    }

    #[tokio::test]
    async fn test_teardown_stops_refetching() {
        let service = Arc::new(FakeService::new());
        let binding: Binding<LeaderboardEntry> = Binding::new(service.clone());
        binding.mount_live().await.unwrap();

        assert!(binding.teardown());
        assert!(!binding.teardown());
        assert!(!binding.is_live());
        assert_eq!(service.open_subscriptions(), 0);

        service.notify("leaderboard");
        tokio::task::yield_now().await;
        assert_eq!(service.select_calls(), 1);
    }

    #[tokio::test]
    async fn test_dropping_binding_releases_subscription() {
        let service = Arc::new(FakeService::new());
        let binding: Binding<Match> = Binding::new(service.clone());
        binding.go_live().await.unwrap();
        assert_eq!(service.open_subscriptions(), 1);

        drop(binding);
        assert_eq!(service.open_subscriptions(), 0);
    }

    #[tokio::test]
    async fn test_lost_channel_is_surfaced_and_stops_updates() {
        let service = Arc::new(FakeService::new());
        service.set_rows("matches", vec![match_row("live")]).await;
        let binding: Binding<Match> = Binding::new(service.clone());
        binding.mount_live().await.unwrap();

        service.drop_channels("matches", "Live updates for realtime:matches stopped (phx_error)");

        assert!(!binding.is_live());
        let state = binding.snapshot();
        assert_eq!(
            state.error.as_deref(),
            Some("Live updates for realtime:matches stopped (phx_error)")
        );
        assert_eq!(state.data.len(), 1);

        service.notify("matches");
        tokio::task::yield_now().await;
        assert_eq!(service.select_calls(), 1);
        binding.teardown();
    }

    #[tokio::test]
    async fn test_current_refetches_unless_live() {
        let service = Arc::new(FakeService::new());
        let players: Binding<Player> = Binding::new(service.clone());
        service.fail_next_select("network blip").await;
        assert_eq!(players.mount().await, Phase::Failed);

        service.set_rows("players", vec![json!({ "id": "p1", "first_name": "Hou" })]).await;
        let state = players.current().await;
        assert_eq!(state.error, None);
        assert_eq!(state.data.len(), 1);
        players.current().await;
        assert_eq!(service.select_calls(), 3);

        let matches: Binding<Match> = Binding::new(service.clone());
        matches.mount_live().await.unwrap();
        matches.current_live().await;
        assert_eq!(service.select_calls(), 4);
        matches.teardown();
    }

    #[tokio::test]
    async fn test_current_live_resubscribes_after_loss() {
        let service = Arc::new(FakeService::new());
        let binding: Binding<LeaderboardEntry> = Binding::new(service.clone());
        binding.mount_live().await.unwrap();
        service.drop_channels("leaderboard", "connection closed");
        assert!(!binding.is_live());

        let state = binding.current_live().await;
        assert!(binding.is_live());
        assert_eq!(state.error, None);
        assert_eq!(service.select_calls(), 2);
        binding.teardown();
    }

    #[tokio::test]
    async fn test_rejected_subscription_is_surfaced() {
        let service = Arc::new(FakeService::new());
        service.reject_subscriptions("Realtime is disabled for this project");
        let binding: Binding<Match> = Binding::new(service);

        let err = binding.go_live().await.unwrap_err();
        assert_eq!(err.to_string(), "Realtime is disabled for this project");
        assert_eq!(
            binding.snapshot().error.as_deref(),
            Some("Realtime is disabled for this project")
        );
        assert!(!binding.is_live());
    }
}
