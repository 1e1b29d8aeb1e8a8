//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the heart of the ledger. It contains the totals
//! calculator, money arithmetic, domain types, and input validation as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Axum REST handlers                           │
//! │    POST /api/sales, GET /api/sales/:id, catalog CRUD            │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────▼───────────────────────────────────┐
//! │               ★ tally-core (THIS CRATE) ★                       │
//! │                                                                 │
//! │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │
//! │   │   types   │  │   money   │  │  totals   │  │ validation│   │
//! │   │  Product  │  │   Money   │  │ LineInput │  │   rules   │   │
//! │   │   Order   │  │  Percent  │  │PricedOrder│  │  checks   │   │
//! │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │
//! │                                                                 │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────▼───────────────────────────────────┐
//! │                    tally-db (Database Layer)                    │
//! │          SQLite queries, migrations, posting transaction        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Party, OrderHeader, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - The order totals calculator
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// Re-exports so users can do `use tally_core::Money` instead of
// `use tally_core::money::Money`
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use totals::{price_lines, LineInput, OrderTotals, PricedLine, PricedOrder};
pub use types::*;

/// Maximum line items allowed in a single order.
///
/// Prevents runaway submissions and keeps invoices printable on one page.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity on a single line.
///
/// Guards against fat-finger entry (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
