//! # Seed Data Loader
//!
//! Populates an empty database with a small sample catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p tally-db --bin seed
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! Idempotent: if any products exist the loader exits without writing.

use std::env;

use tally_core::PartyKind;
use tally_db::{Database, DbConfig, DbError};

#[tokio::main]
async fn main() -> Result<(), DbError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut db_path = env::var("TALLY_DB_PATH").unwrap_or_else(|_| "./tally.db".to_string());

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--db" && i + 1 < args.len() {
            db_path = args[i + 1].clone();
            i += 2;
        } else {
            i += 1;
        }
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    if db.products().count().await? > 0 {
        tracing::info!(path = %db_path, "Database already seeded, nothing to do");
        return Ok(());
    }

    let products = db.products();
    products.create("Laptop 14\"", "LAP-14", 5_000_000, 10).await?;
    products.create("Wireless Mouse", "MOU-001", 50_000, 50).await?;
    products.create("Keyboard", "KEY-101", 120_000, 20).await?;

    let parties = db.parties();
    parties
        .create(
            PartyKind::Customer,
            "John Doe",
            Some("9999999999".to_string()),
            Some("Bangalore".to_string()),
        )
        .await?;
    parties
        .create(
            PartyKind::Customer,
            "Acme Corp",
            Some("080-123456".to_string()),
            Some("Chennai".to_string()),
        )
        .await?;
    parties
        .create(
            PartyKind::Vendor,
            "Gadget Supplies",
            Some("080-777777".to_string()),
            Some("Mumbai".to_string()),
        )
        .await?;

    tracing::info!(path = %db_path, "Seeded sample catalog");
    Ok(())
}
