//! # Party Routes
//!
//! Customers and vendors: create and list only. Parties are immutable
//! once an order references them, so no update or delete is exposed.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::dto::CreatePartyRequest;
use crate::error::ApiError;
use crate::state::AppState;
use tally_core::validation::validate_name;
use tally_core::{Party, PartyKind};

const LIST_LIMIT: u32 = 100;

pub fn customers_router() -> Router<AppState> {
    Router::new().route("/", post(create_customer).get(list_customers))
}

pub fn vendors_router() -> Router<AppState> {
    Router::new().route("/", post(create_vendor).get(list_vendors))
}

async fn create_party(
    state: &AppState,
    kind: PartyKind,
    req: CreatePartyRequest,
) -> Result<(StatusCode, Json<Party>), ApiError> {
    validate_name(&req.name)?;

    let party = state
        .db
        .parties()
        .create(kind, &req.name, req.phone, req.address)
        .await?;

    Ok((StatusCode::CREATED, Json(party)))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CreatePartyRequest>,
) -> Result<(StatusCode, Json<Party>), ApiError> {
    create_party(&state, PartyKind::Customer, req).await
}

async fn create_vendor(
    State(state): State<AppState>,
    Json(req): Json<CreatePartyRequest>,
) -> Result<(StatusCode, Json<Party>), ApiError> {
    create_party(&state, PartyKind::Vendor, req).await
}

async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Party>>, ApiError> {
    let parties = state.db.parties().list(PartyKind::Customer, LIST_LIMIT).await?;
    Ok(Json(parties))
}

async fn list_vendors(State(state): State<AppState>) -> Result<Json<Vec<Party>>, ApiError> {
    let parties = state.db.parties().list(PartyKind::Vendor, LIST_LIMIT).await?;
    Ok(Json(parties))
}
