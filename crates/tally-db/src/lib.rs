//! # tally-db: Database Layer for Tally
//!
//! SQLite storage for the ledger, via sqlx on the Tokio runtime.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, party, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tally.db")).await?;
//!
//! let priced = tally_core::price_lines(&items)?;
//! let header = db.orders().post(OrderKind::Sale, customer_id, &priced).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::party::PartyRepository;
pub use repository::product::ProductRepository;
