//! # Product Routes
//!
//! Catalog admin: create and list. Stock is never set through this
//! surface after creation; only order postings move it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::dto::CreateProductRequest;
use crate::error::ApiError;
use crate::state::AppState;
use tally_core::validation::{validate_name, validate_price_cents, validate_sku};
use tally_core::Product;

const LIST_LIMIT: u32 = 100;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_product).get(list_products))
}

async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_name(&req.name)?;
    validate_sku(&req.sku)?;
    validate_price_cents(req.price_cents)?;
    if req.stock_qty < 0 {
        return Err(ApiError::validation("stock_qty must not be negative"));
    }

    let product = state
        .db
        .products()
        .create(&req.name, &req.sku, req.price_cents, req.stock_qty)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list(LIST_LIMIT).await?;
    Ok(Json(products))
}
