use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::handlers::{
    AppState,
    pages::{contact_page, home, leaderboard, live_matches, registration_page, schedule},
    submissions::{submit_contact, submit_registration},
};

pub fn create_router(state: Arc<AppState>, assets_dir: &str) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/registration", get(registration_page).post(submit_registration))
        .route("/schedule", get(schedule))
        .route("/leaderboard", get(leaderboard))
        .route("/live-matches", get(live_matches))
        .route("/contact", get(contact_page).post(submit_contact))
        .fallback_service(ServeDir::new(assets_dir))
        .with_state(state)
}
