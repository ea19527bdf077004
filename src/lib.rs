use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    routes::{auth_route::auth_router, health},
    state::AppState,
};

pub mod clients;
pub mod config;
pub mod consts;
pub mod directory;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
