//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4, immutable, used for database relations
//! - Business ID where one exists (product `sku`, order `document_no`),
//!   human-readable and shown on invoices

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000. 825 bps = 8.25%. Used for both line
/// discounts and line tax rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percent(u32);

impl Percent {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a rate from a percentage, for the API boundary where
    /// clients submit `discount_pct: 8.25`.
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `stock_qty` is adjusted only by order postings: sales subtract,
/// purchases add. It may go negative; no floor is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on invoices.
    pub name: String,

    /// Stock Keeping Unit - business identifier, unique per catalog.
    pub sku: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// On-hand count. May be negative.
    pub stock_qty: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Parties (customers and vendors)
// =============================================================================

/// Which party table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Customer,
    Vendor,
}

impl PartyKind {
    /// Human-facing label, used in error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            PartyKind::Customer => "Customer",
            PartyKind::Vendor => "Vendor",
        }
    }
}

/// A counterparty: the customer on a sale or the vendor on a purchase.
///
/// Immutable once referenced by an order; the surface exposes create and
/// read only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Party {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Orders
// =============================================================================

/// The two posting directions of the ledger.
///
/// The kind decides the document prefix, the table pair the order is
/// stored in, which party table the counterparty resolves against, and
/// the sign of the stock delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Sale,
    Purchase,
}

impl OrderKind {
    /// Document number prefix: `INV` for invoices, `PUR` for bills.
    pub const fn document_prefix(&self) -> &'static str {
        match self {
            OrderKind::Sale => "INV",
            OrderKind::Purchase => "PUR",
        }
    }

    /// Stock movement for a posted line: sales subtract, purchases add.
    pub const fn stock_delta(&self, qty: i64) -> i64 {
        match self {
            OrderKind::Sale => -qty,
            OrderKind::Purchase => qty,
        }
    }

    /// Which party table the counterparty lives in.
    pub const fn party_kind(&self) -> PartyKind {
        match self {
            OrderKind::Sale => PartyKind::Customer,
            OrderKind::Purchase => PartyKind::Vendor,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            OrderKind::Sale => "Sale",
            OrderKind::Purchase => "Purchase",
        }
    }
}

/// A posted order header with its four derived totals.
///
/// Created atomically with its lines, never mutated afterwards.
/// Invariant: `grand_total = sub_total - discount_total + tax_total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderHeader {
    pub id: String,

    /// Generated document number (`INV-20260805-K3X9QZ` style), unique.
    pub document_no: String,

    /// Counterparty reference; `None` for a walk-in / no-vendor order.
    pub party_id: Option<String>,

    pub sub_total_cents: i64,
    pub discount_total_cents: i64,
    pub tax_total_cents: i64,
    pub grand_total_cents: i64,

    pub created_at: DateTime<Utc>,
}

/// A line item on a posted order.
///
/// Uses the snapshot pattern: the unit price is the price as submitted
/// at post time, independent of the product's current catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,

    /// Quantity posted (positive).
    pub qty: i64,

    /// Unit price in cents at post time (frozen).
    pub unit_price_cents: i64,

    /// Discount rate in basis points.
    pub discount_bps: u32,

    /// Tax rate in basis points.
    pub tax_bps: u32,

    /// Discount amount in cents, rounded per line.
    pub discount_cents: i64,

    /// Tax amount in cents, rounded per line.
    pub tax_cents: i64,

    /// (base - discount) + tax, in cents.
    pub line_total_cents: i64,
}

impl OrderLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// An order line joined with the product's current name and SKU, shaped
/// for invoice display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLineView {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub qty: i64,
    pub unit_price_cents: i64,
    pub discount_bps: u32,
    pub tax_bps: u32,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub line_total_cents: i64,
}
