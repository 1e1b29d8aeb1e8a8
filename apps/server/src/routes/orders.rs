//! # Order Routes
//!
//! Posting and read-back for sales and purchases. The two surfaces are
//! the same pipeline with a different [`OrderKind`]: validate the
//! request, run the totals calculator, hand the priced order to the
//! posting transaction, and shape the response.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::time::timeout;
use tracing::debug;

use crate::dto::{
    CreatePurchaseRequest, CreateSaleRequest, LineItemRequest, PurchaseDetailResponse,
    PurchaseResponse, SaleDetailResponse, SaleResponse,
};
use crate::error::ApiError;
use crate::state::AppState;
use tally_core::{price_lines, OrderHeader, OrderKind};

/// Default page size for listings.
const LIST_LIMIT: u32 = 100;

pub fn sales_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sale).get(list_sales))
        .route("/:id", get(get_sale))
}

pub fn purchases_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase).get(list_purchases))
        .route("/:id", get(get_purchase))
}

/// Shared posting pipeline: DTO conversion, pricing, bounded
/// transaction.
///
/// The timeout fails closed: when it fires, the posting future is
/// dropped mid-transaction and SQLite rolls back, so a late success can
/// never be half-applied.
async fn post_order(
    state: &AppState,
    kind: OrderKind,
    party_id: Option<&str>,
    items: &[LineItemRequest],
) -> Result<OrderHeader, ApiError> {
    let inputs = items
        .iter()
        .map(LineItemRequest::to_line_input)
        .collect::<Result<Vec<_>, _>>()?;

    let priced = price_lines(&inputs)?;

    debug!(
        kind = kind.label(),
        lines = priced.lines.len(),
        grand_total_cents = priced.totals.grand_total_cents,
        "Posting order"
    );

    let header = timeout(
        state.post_timeout,
        state.db.orders().post(kind, party_id, &priced),
    )
    .await
    .map_err(|_| ApiError::timeout())??;

    Ok(header)
}

// =============================================================================
// Sales
// =============================================================================

async fn create_sale(
    State(state): State<AppState>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), ApiError> {
    let header = post_order(
        &state,
        OrderKind::Sale,
        req.customer_id.as_deref(),
        &req.items,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(header.into())))
}

async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaleDetailResponse>, ApiError> {
    let (order, items, customer) = state
        .db
        .orders()
        .get(OrderKind::Sale, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &id))?;

    Ok(Json(SaleDetailResponse {
        order: order.into(),
        items,
        customer,
    }))
}

async fn list_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    let headers = state.db.orders().list(OrderKind::Sale, LIST_LIMIT).await?;
    Ok(Json(headers.into_iter().map(SaleResponse::from).collect()))
}

// =============================================================================
// Purchases
// =============================================================================

async fn create_purchase(
    State(state): State<AppState>,
    Json(req): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError> {
    let header = post_order(
        &state,
        OrderKind::Purchase,
        req.vendor_id.as_deref(),
        &req.items,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(header.into())))
}

async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PurchaseDetailResponse>, ApiError> {
    let (order, items, vendor) = state
        .db
        .orders()
        .get(OrderKind::Purchase, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Purchase", &id))?;

    Ok(Json(PurchaseDetailResponse {
        order: order.into(),
        items,
        vendor,
    }))
}

async fn list_purchases(
    State(state): State<AppState>,
) -> Result<Json<Vec<PurchaseResponse>>, ApiError> {
    let headers = state
        .db
        .orders()
        .list(OrderKind::Purchase, LIST_LIMIT)
        .await?;
    Ok(Json(headers.into_iter().map(PurchaseResponse::from).collect()))
}
