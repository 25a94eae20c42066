use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::{LeaderboardEntry, Match, Player};
use crate::errors::RemoteServiceError;
use crate::remote::RemoteDataService;
use crate::sync::{Binding, ContactOutbox, Phase};

pub mod pages;
pub mod submissions;

/// One binding per entity, shared by the routes that display it
pub struct AppState {
    pub players: Binding<Player>,
    pub matches: Binding<Match>,
    pub leaderboard: Binding<LeaderboardEntry>,
    pub contact: ContactOutbox,
}

impl AppState {
    pub fn new(service: Arc<dyn RemoteDataService>) -> Self {
        Self {
            players: Binding::new(Arc::clone(&service)),
            matches: Binding::new(Arc::clone(&service)),
            leaderboard: Binding::new(Arc::clone(&service)),
            contact: ContactOutbox::new(service),
        }
    }

    /// Initial fetches plus live subscriptions. Failures stay in view state
    /// until a page view refetches.
    pub async fn mount(&self) {
        let (players, matches, leaderboard) = tokio::join!(
            self.players.mount(),
            self.matches.mount_live(),
            self.leaderboard.mount_live(),
        );

        log_phase("players", players);
        log_live("matches", matches);
        log_live("leaderboard", leaderboard);
    }

    pub fn teardown(&self) {
        self.players.teardown();
        self.matches.teardown();
        self.leaderboard.teardown();
        info!("All bindings torn down");
    }
}

fn log_phase(name: &str, phase: Phase) {
    match phase {
        Phase::Ready => info!("Mounted {}", name),
        phase => warn!("Mounted {} in {:?} state", name, phase),
    }
}

fn log_live(name: &str, outcome: Result<Phase, RemoteServiceError>) {
    match outcome {
        Ok(phase) => log_phase(name, phase),
        Err(e) => warn!("Mounted {} without live updates: {}", name, e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleParams {
    pub day: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub filter: Option<String>,
}
