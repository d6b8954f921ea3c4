//! Counter JSON API

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use counterctl_core::{Counter, CounterRepo};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Counter response
#[derive(Debug, Serialize, Deserialize)]
pub struct CounterResponse {
    pub id: i64,
    pub value: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Counter> for CounterResponse {
    fn from(counter: Counter) -> Self {
        Self {
            id: counter.id,
            value: counter.value,
            created_at: counter.created_at.to_rfc3339(),
            updated_at: counter.updated_at.to_rfc3339(),
        }
    }
}

/// GET /api/counter
async fn get_counter(State(state): State<Arc<AppState>>) -> Result<Json<CounterResponse>, ApiError> {
    let counter = CounterRepo::new(&state.store).get().await?;
    Ok(Json(counter.into()))
}

/// POST /api/counter/increment
async fn increment_counter(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CounterResponse>, ApiError> {
    let counter = CounterRepo::new(&state.store).increment().await?;
    Ok(Json(counter.into()))
}

/// POST /api/counter/reset
async fn reset_counter(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CounterResponse>, ApiError> {
    let counter = CounterRepo::new(&state.store).reset().await?;
    Ok(Json(counter.into()))
}

/// Counter API routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/counter", get(get_counter))
        .route("/api/counter/increment", post(increment_counter))
        .route("/api/counter/reset", post(reset_counter))
}
