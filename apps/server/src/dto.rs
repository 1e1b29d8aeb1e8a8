//! Request and response shapes for the REST surface.
//!
//! Loose JSON comes in here, gets range-checked, and leaves as typed
//! core inputs; nothing downstream sees an unvalidated value. Rates
//! cross the boundary as percentages (`discount_pct: 8.25`) and are
//! converted to basis points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use tally_core::types::Percent;
use tally_core::{LineInput, OrderHeader, OrderLineView, Party};

// =============================================================================
// Requests
// =============================================================================

/// One submitted line item.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub product_id: String,
    pub qty: i64,
    pub price_cents: i64,
    #[serde(default)]
    pub discount_pct: f64,
    #[serde(default)]
    pub tax_pct: f64,
}

impl LineItemRequest {
    /// Converts to a core line input. Percentage bounds are checked
    /// here because a negative float would otherwise clamp to 0 bps
    /// instead of failing.
    pub fn to_line_input(&self) -> Result<LineInput, ApiError> {
        if !(0.0..=100.0).contains(&self.discount_pct) {
            return Err(ApiError::validation("discount_pct must be between 0 and 100"));
        }
        if !(0.0..=100.0).contains(&self.tax_pct) {
            return Err(ApiError::validation("tax_pct must be between 0 and 100"));
        }

        Ok(LineInput {
            product_id: self.product_id.clone(),
            qty: self.qty,
            unit_price_cents: self.price_cents,
            discount: Percent::from_percentage(self.discount_pct),
            tax: Percent::from_percentage(self.tax_pct),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_id: Option<String>,
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchaseRequest {
    pub vendor_id: Option<String>,
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock_qty: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePartyRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// A posted sale header as clients see it.
#[derive(Debug, Clone, Serialize)]
pub struct SaleResponse {
    pub id: String,
    pub invoice_no: String,
    pub customer_id: Option<String>,
    pub sub_total_cents: i64,
    pub discount_total_cents: i64,
    pub tax_total_cents: i64,
    pub grand_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<OrderHeader> for SaleResponse {
    fn from(h: OrderHeader) -> Self {
        SaleResponse {
            id: h.id,
            invoice_no: h.document_no,
            customer_id: h.party_id,
            sub_total_cents: h.sub_total_cents,
            discount_total_cents: h.discount_total_cents,
            tax_total_cents: h.tax_total_cents,
            grand_total_cents: h.grand_total_cents,
            created_at: h.created_at,
        }
    }
}

/// A posted purchase header as clients see it.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResponse {
    pub id: String,
    pub bill_no: String,
    pub vendor_id: Option<String>,
    pub sub_total_cents: i64,
    pub discount_total_cents: i64,
    pub tax_total_cents: i64,
    pub grand_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<OrderHeader> for PurchaseResponse {
    fn from(h: OrderHeader) -> Self {
        PurchaseResponse {
            id: h.id,
            bill_no: h.document_no,
            vendor_id: h.party_id,
            sub_total_cents: h.sub_total_cents,
            discount_total_cents: h.discount_total_cents,
            tax_total_cents: h.tax_total_cents,
            grand_total_cents: h.grand_total_cents,
            created_at: h.created_at,
        }
    }
}

/// Full sale read-back: header, lines with product detail, counterparty.
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetailResponse {
    pub order: SaleResponse,
    pub items: Vec<OrderLineView>,
    pub customer: Option<Party>,
}

/// Full purchase read-back.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseDetailResponse {
    pub order: PurchaseResponse,
    pub items: Vec<OrderLineView>,
    pub vendor: Option<Party>,
}
