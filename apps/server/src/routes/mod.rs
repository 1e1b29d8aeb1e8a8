//! # Route Assembly
//!
//! One router per resource, nested under `/api`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod orders;
pub mod parties;
pub mod products;

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/sales", orders::sales_router())
        .nest("/api/purchases", orders::purchases_router())
        .nest("/api/products", products::router())
        .nest("/api/customers", parties::customers_router())
        .nest("/api/vendors", parties::vendors_router())
        .route("/api/health", get(health))
        .with_state(state)
}

/// Liveness probe: answers 200 while the pool can execute queries.
async fn health(State(state): State<AppState>) -> StatusCode {
    if state.db.health_check().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
