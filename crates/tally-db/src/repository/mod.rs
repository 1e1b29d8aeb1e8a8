//! # Repository Module
//!
//! Database repositories for Tally. Each repository owns the SQL for one
//! slice of the schema and hands callers domain types from tally-core.
//!
//! - [`product::ProductRepository`] - catalog products and stock reads
//! - [`party::PartyRepository`] - customers and vendors
//! - [`order::OrderRepository`] - order posting and read-back

pub mod order;
pub mod party;
pub mod product;
