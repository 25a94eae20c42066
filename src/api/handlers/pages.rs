use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;

use super::{AppState, LeaderboardParams, ScheduleParams};
use crate::views::forms::{build_contact, build_registration};
use crate::views::home::build_home;
use crate::views::leaderboard::{StandingsFilter, build_leaderboard};
use crate::views::live::build_live_matches;
use crate::views::schedule::build_schedule;

// each page view counts as a mount of the bindings it reads
pub async fn home(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (players, matches, leaderboard) = tokio::join!(
        state.players.current(),
        state.matches.current_live(),
        state.leaderboard.current_live(),
    );
    Json(build_home(&players, &matches, &leaderboard))
}

pub async fn registration_page() -> impl IntoResponse {
    Json(build_registration())
}

pub async fn schedule(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScheduleParams>,
) -> impl IntoResponse {
    let day = params.day.unwrap_or(1);
    Json(build_schedule(&state.matches.current_live().await, day))
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> impl IntoResponse {
    let filter = match params.filter.as_deref().unwrap_or_default().parse::<StandingsFilter>() {
        Ok(filter) => filter,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(json!({ "error": e }))).into_response(),
    };

    let (leaderboard, players) = tokio::join!(
        state.leaderboard.current_live(),
        state.players.current(),
    );
    Json(build_leaderboard(&leaderboard, &players, filter)).into_response()
}

pub async fn live_matches(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(build_live_matches(&state.matches.current_live().await))
}

pub async fn contact_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(build_contact(state.contact.is_sending()))
}
