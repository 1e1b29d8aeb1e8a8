//! # tally-server: REST API for Tally
//!
//! Thin axum layer over [`tally_core`] (totals, validation) and
//! [`tally_db`] (posting transaction, catalog). See [`routes`] for the
//! surface.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

use axum::Router;

/// Builds the application router over the given state.
pub fn app(state: AppState) -> Router {
    routes::router(state)
}
