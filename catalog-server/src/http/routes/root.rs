//! Landing endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// GET /
async fn welcome(State(state): State<Arc<AppState>>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: format!("Welcome to {}", state.settings.project_name),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(welcome))
}
