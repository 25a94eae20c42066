use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::info;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::AppState;
use crate::domain::{FormFields, NewContactMessage, NewPlayer};
use crate::errors::{FormError, RemoteServiceError};

pub async fn submit_registration(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<FormFields>,
) -> Response {
    let draft = match NewPlayer::from_form(&fields) {
        Ok(draft) => draft,
        Err(e) => return invalid_form(e),
    };

    match state.players.insert(&draft).await {
        Ok(player) => {
            info!("Registered player {}", player.id);
            created(player)
        }
        Err(e) => remote_failure(e),
    }
}

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<FormFields>,
) -> Response {
    let draft = match NewContactMessage::from_form(&fields) {
        Ok(draft) => draft,
        Err(e) => return invalid_form(e),
    };

    match state.contact.send(&draft).await {
        Ok(message) => created(message),
        Err(e) => remote_failure(e),
    }
}

fn created<T: Serialize>(record: T) -> Response {
    (StatusCode::CREATED, Json(record)).into_response()
}

fn invalid_form(e: FormError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": e.to_string() })),
    )
        .into_response()
}

fn remote_failure(e: RemoteServiceError) -> Response {
    (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
}
