//! ormpad studio - the web playground
//!
//! Serves a single-page editor over the snippet engine:
//! - `GET /` renders the playground with the schema sidebar
//! - `POST /` runs a snippet; JSON for editor fetches, HTML for forms
//! - `GET /health` liveness check

pub mod config;
pub mod error;
pub mod page;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Create the axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::playground::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
