//! # Order Repository
//!
//! Posting and read-back for sales and purchases. Both order kinds share
//! this repository; [`OrderKind`] selects the table pair, the document
//! prefix, and the stock delta sign.
//!
//! ## Posting Flow
//! ```text
//! post(kind, party_id, priced)
//!      │
//!      ▼
//! BEGIN TRANSACTION
//!      ├── counterparty given? verify it exists, else reject
//!      ├── INSERT header (document number; retry on unique collision)
//!      ├── per line, in order:
//!      │      ├── INSERT line row
//!      │      └── UPDATE products SET stock_qty = stock_qty + delta
//!      │          (delta is -qty for a sale, +qty for a purchase)
//!      ▼
//! COMMIT
//!
//! Any failure before COMMIT drops the transaction: no header, no lines,
//! no stock change persists.
//! ```

use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::party;
use tally_core::{OrderHeader, OrderKind, OrderLine, OrderLineView, Party, PricedOrder};

/// Attempts at a fresh document number before giving up.
///
/// With 36^6 tokens per day-prefix, a second collision in a row already
/// means something is wrong with the RNG or the clock.
const MAX_DOCUMENT_ATTEMPTS: u32 = 5;

/// The (header, items) table pair for an order kind.
const fn tables(kind: OrderKind) -> (&'static str, &'static str) {
    match kind {
        OrderKind::Sale => ("sales", "sale_items"),
        OrderKind::Purchase => ("purchases", "purchase_items"),
    }
}

/// Generates a document number: prefix, date, 6-char uppercase token.
///
/// Example: `INV-20260805-K3X9QZ`. Uniqueness is enforced by the unique
/// index on `document_no`, not by this function; the posting loop
/// regenerates on collision.
fn document_number(kind: OrderKind) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut rng = rand::rng();
    let token: String = (0..6)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();

    format!(
        "{}-{}-{}",
        kind.document_prefix(),
        Utc::now().format("%Y%m%d"),
        token
    )
}

/// Repository for order posting and read-back.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Posts an order: header, lines, and stock deltas in one atomic
    /// transaction.
    ///
    /// `priced` comes from [`tally_core::price_lines`], so quantities,
    /// prices, and rates are already validated and every derived amount
    /// is final. Prices are stored as submitted (snapshot), never
    /// re-read from the catalog.
    ///
    /// ## Errors
    /// - `DbError::NotFound` for an unknown counterparty or product
    ///   (nothing is committed)
    /// - `DbError::UniqueViolation` if document numbers keep colliding
    ///   past the retry budget
    pub async fn post(
        &self,
        kind: OrderKind,
        party_id: Option<&str>,
        priced: &PricedOrder,
    ) -> DbResult<OrderHeader> {
        self.post_with(kind, party_id, priced, || document_number(kind))
            .await
    }

    /// Posting body with an injectable document-number source, so the
    /// collision-retry path is testable.
    pub(crate) async fn post_with<F>(
        &self,
        kind: OrderKind,
        party_id: Option<&str>,
        priced: &PricedOrder,
        mut next_document_no: F,
    ) -> DbResult<OrderHeader>
    where
        F: FnMut() -> String,
    {
        if priced.lines.is_empty() {
            // price_lines already rejects this; the guard keeps the
            // invariant local too
            return Err(DbError::QueryFailed("order has no line items".to_string()));
        }

        let (header_table, items_table) = tables(kind);
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Counterparty must resolve before anything is written
        if let Some(pid) = party_id {
            let party_table = party::table(kind.party_kind());
            let exists: Option<i64> =
                sqlx::query_scalar(&format!("SELECT 1 FROM {party_table} WHERE id = ?1"))
                    .bind(pid)
                    .fetch_optional(&mut *tx)
                    .await?;

            if exists.is_none() {
                return Err(DbError::not_found(kind.party_kind().label(), pid));
            }
        }

        let mut header = OrderHeader {
            id: Uuid::new_v4().to_string(),
            document_no: next_document_no(),
            party_id: party_id.map(str::to_string),
            sub_total_cents: priced.totals.sub_total_cents,
            discount_total_cents: priced.totals.discount_total_cents,
            tax_total_cents: priced.totals.tax_total_cents,
            grand_total_cents: priced.totals.grand_total_cents,
            created_at: now,
        };

        let header_sql = format!(
            r#"
            INSERT INTO {header_table} (
                id, document_no, party_id,
                sub_total_cents, discount_total_cents, tax_total_cents, grand_total_cents,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#
        );

        // Insert the header, regenerating the document number on a
        // unique-index collision. A failed statement leaves the
        // transaction usable in SQLite, so retrying in place is safe.
        let mut attempt = 0;
        loop {
            let result = sqlx::query(&header_sql)
                .bind(&header.id)
                .bind(&header.document_no)
                .bind(&header.party_id)
                .bind(header.sub_total_cents)
                .bind(header.discount_total_cents)
                .bind(header.tax_total_cents)
                .bind(header.grand_total_cents)
                .bind(header.created_at)
                .execute(&mut *tx)
                .await;

            match result {
                Ok(_) => break,
                Err(e) => {
                    let err = DbError::from(e);
                    attempt += 1;
                    if err.is_unique_violation_on("document_no")
                        && attempt < MAX_DOCUMENT_ATTEMPTS
                    {
                        debug!(
                            document_no = %header.document_no,
                            attempt, "Document number collision, regenerating"
                        );
                        header.document_no = next_document_no();
                        continue;
                    }
                    return Err(err);
                }
            }
        }

        let line_sql = format!(
            r#"
            INSERT INTO {items_table} (
                id, order_id, product_id, qty, unit_price_cents,
                discount_bps, tax_bps, discount_cents, tax_cents, line_total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#
        );

        for priced_line in &priced.lines {
            let line = OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: header.id.clone(),
                product_id: priced_line.product_id.clone(),
                qty: priced_line.qty,
                unit_price_cents: priced_line.unit_price_cents,
                discount_bps: priced_line.discount_bps,
                tax_bps: priced_line.tax_bps,
                discount_cents: priced_line.discount_cents,
                tax_cents: priced_line.tax_cents,
                line_total_cents: priced_line.line_total_cents,
            };

            sqlx::query(&line_sql)
                .bind(&line.id)
                .bind(&line.order_id)
                .bind(&line.product_id)
                .bind(line.qty)
                .bind(line.unit_price_cents)
                .bind(line.discount_bps)
                .bind(line.tax_bps)
                .bind(line.discount_cents)
                .bind(line.tax_cents)
                .bind(line.line_total_cents)
                .execute(&mut *tx)
                .await
                .map_err(|e| match DbError::from(e) {
                    // The product FK is the only nullable-free reference
                    // a validated line can dangle on
                    DbError::ForeignKeyViolation { .. } => {
                        DbError::not_found("Product", &line.product_id)
                    }
                    other => other,
                })?;

            // Stock moves in the same transaction, delta-style: sales
            // subtract, purchases add. No floor; stock may go negative.
            let delta = kind.stock_delta(line.qty);
            let updated = sqlx::query(
                "UPDATE products SET stock_qty = stock_qty + ?1, updated_at = ?2 WHERE id = ?3",
            )
            .bind(delta)
            .bind(now)
            .bind(&line.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(DbError::not_found("Product", &line.product_id));
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            kind = kind.label(),
            document_no = %header.document_no,
            lines = priced.lines.len(),
            grand_total_cents = header.grand_total_cents,
            "Order posted"
        );

        Ok(header)
    }

    /// Fetches an order with its lines (joined with product name/SKU)
    /// and its resolved counterparty, or `None` if the id is unknown.
    pub async fn get(
        &self,
        kind: OrderKind,
        id: &str,
    ) -> DbResult<Option<(OrderHeader, Vec<OrderLineView>, Option<Party>)>> {
        let (header_table, items_table) = tables(kind);

        let header_sql = format!(
            r#"
            SELECT id, document_no, party_id,
                   sub_total_cents, discount_total_cents, tax_total_cents, grand_total_cents,
                   created_at
            FROM {header_table}
            WHERE id = ?1
            "#
        );

        let Some(header) = sqlx::query_as::<_, OrderHeader>(&header_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items_sql = format!(
            r#"
            SELECT i.id, i.product_id, p.name, p.sku,
                   i.qty, i.unit_price_cents,
                   i.discount_bps, i.tax_bps, i.discount_cents, i.tax_cents, i.line_total_cents
            FROM {items_table} i
            INNER JOIN products p ON p.id = i.product_id
            WHERE i.order_id = ?1
            ORDER BY i.rowid
            "#
        );

        let items = sqlx::query_as::<_, OrderLineView>(&items_sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        let party = match &header.party_id {
            Some(pid) => {
                let party_table = party::table(kind.party_kind());
                let party_sql = format!(
                    "SELECT id, name, phone, address, created_at FROM {party_table} WHERE id = ?1"
                );
                sqlx::query_as::<_, Party>(&party_sql)
                    .bind(pid)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        Ok(Some((header, items, party)))
    }

    /// Lists order headers of a kind, newest first.
    pub async fn list(&self, kind: OrderKind, limit: u32) -> DbResult<Vec<OrderHeader>> {
        let (header_table, _) = tables(kind);

        let sql = format!(
            r#"
            SELECT id, document_no, party_id,
                   sub_total_cents, discount_total_cents, tax_total_cents, grand_total_cents,
                   created_at
            FROM {header_table}
            ORDER BY created_at DESC
            LIMIT ?1
            "#
        );

        let headers = sqlx::query_as::<_, OrderHeader>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::types::Percent;
    use tally_core::{price_lines, LineInput, PartyKind, Product};

    async fn setup() -> (Database, Product, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let laptop = db
            .products()
            .create("Laptop 14\"", "LAP-14", 5_000_000, 10)
            .await
            .unwrap();
        let mouse = db
            .products()
            .create("Wireless Mouse", "MOU-001", 50_000, 50)
            .await
            .unwrap();

        (db, laptop, mouse)
    }

    fn line(product: &Product, qty: i64, discount_pct: f64, tax_pct: f64) -> LineInput {
        LineInput {
            product_id: product.id.clone(),
            qty,
            unit_price_cents: product.price_cents,
            discount: Percent::from_percentage(discount_pct),
            tax: Percent::from_percentage(tax_pct),
        }
    }

    async fn table_count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_sale_writes_header_lines_and_stock() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 2, 10.0, 5.0)]).unwrap();
        let header = db
            .orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();

        assert!(header.document_no.starts_with("INV-"));
        assert_eq!(header.sub_total_cents, 100_000);
        assert_eq!(header.discount_total_cents, 10_000);
        assert_eq!(header.tax_total_cents, 4_500);
        assert_eq!(header.grand_total_cents, 94_500);

        // Stock decremented by exactly the sold quantity
        let after = db.products().get_by_id(&mouse.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 48);

        assert_eq!(table_count(&db, "sales").await, 1);
        assert_eq!(table_count(&db, "sale_items").await, 1);
    }

    #[tokio::test]
    async fn test_post_purchase_increments_stock() {
        let (db, laptop, _mouse) = setup().await;

        let priced = price_lines(&[line(&laptop, 5, 0.0, 0.0)]).unwrap();
        let header = db
            .orders()
            .post(OrderKind::Purchase, None, &priced)
            .await
            .unwrap();

        assert!(header.document_no.starts_with("PUR-"));
        assert_eq!(header.grand_total_cents, 25_000_000);

        let after = db.products().get_by_id(&laptop.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 15);
    }

    #[tokio::test]
    async fn test_stock_may_go_negative() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 60, 0.0, 0.0)]).unwrap();
        db.orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();

        let after = db.products().get_by_id(&mouse.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, -10);
    }

    #[tokio::test]
    async fn test_empty_order_never_touches_storage() {
        let (db, _laptop, _mouse) = setup().await;

        // The calculator is the first gate
        assert!(price_lines(&[]).is_err());

        // And the repository refuses an empty batch outright
        let empty = PricedOrder {
            lines: vec![],
            totals: Default::default(),
        };
        assert!(db.orders().post(OrderKind::Sale, None, &empty).await.is_err());

        assert_eq!(table_count(&db, "sales").await, 0);
        assert_eq!(table_count(&db, "sale_items").await, 0);
    }

    #[tokio::test]
    async fn test_mid_batch_failure_rolls_back_everything() {
        let (db, _laptop, mouse) = setup().await;

        let ghost = Product {
            id: Uuid::new_v4().to_string(),
            name: "Ghost".into(),
            sku: "GHOST-1".into(),
            price_cents: 1_000,
            stock_qty: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // First line is fine, second references a product that was
        // never inserted
        let priced =
            price_lines(&[line(&mouse, 3, 0.0, 0.0), line(&ghost, 1, 0.0, 0.0)]).unwrap();

        let result = db.orders().post(OrderKind::Sale, None, &priced).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));

        // No header, no lines, and the first line's stock delta is gone
        assert_eq!(table_count(&db, "sales").await, 0);
        assert_eq!(table_count(&db, "sale_items").await, 0);
        let after = db.products().get_by_id(&mouse.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 50);
    }

    #[tokio::test]
    async fn test_unknown_counterparty_rejected_before_mutation() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 1, 0.0, 0.0)]).unwrap();
        let bogus = Uuid::new_v4().to_string();

        let result = db.orders().post(OrderKind::Sale, Some(&bogus), &priced).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));

        assert_eq!(table_count(&db, "sales").await, 0);
        let after = db.products().get_by_id(&mouse.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 50);
    }

    #[tokio::test]
    async fn test_read_back_returns_lines_and_party() {
        let (db, laptop, mouse) = setup().await;

        let customer = db
            .parties()
            .create(PartyKind::Customer, "Acme Corp", Some("080-123456".into()), None)
            .await
            .unwrap();

        let priced =
            price_lines(&[line(&laptop, 1, 0.0, 0.0), line(&mouse, 2, 0.0, 0.0)]).unwrap();
        let header = db
            .orders()
            .post(OrderKind::Sale, Some(&customer.id), &priced)
            .await
            .unwrap();

        let (fetched, items, party) = db
            .orders()
            .get(OrderKind::Sale, &header.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched.id, header.id);
        assert_eq!(fetched.grand_total_cents, 5_100_000);

        // Line count equals submitted count, in submission order, with
        // the calculator's per-line totals and the joined product fields
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "LAP-14");
        assert_eq!(items[0].line_total_cents, priced.lines[0].line_total_cents);
        assert_eq!(items[1].sku, "MOU-001");
        assert_eq!(items[1].line_total_cents, priced.lines[1].line_total_cents);

        assert_eq!(party.unwrap().name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_read_back_walk_in_has_no_party() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 1, 0.0, 0.0)]).unwrap();
        let header = db
            .orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();

        let (_, _, party) = db
            .orders()
            .get(OrderKind::Sale, &header.id)
            .await
            .unwrap()
            .unwrap();
        assert!(party.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_order_is_none() {
        let (db, _laptop, _mouse) = setup().await;
        let missing = db
            .orders()
            .get(OrderKind::Sale, &Uuid::new_v4().to_string())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_sales_and_purchases_are_separate_ledgers() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 1, 0.0, 0.0)]).unwrap();
        let sale = db
            .orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();

        // A sale id does not resolve as a purchase
        assert!(db
            .orders()
            .get(OrderKind::Purchase, &sale.id)
            .await
            .unwrap()
            .is_none());

        assert_eq!(db.orders().list(OrderKind::Sale, 10).await.unwrap().len(), 1);
        assert!(db
            .orders()
            .list(OrderKind::Purchase, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 1, 0.0, 0.0)]).unwrap();
        let first = db
            .orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = db
            .orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();

        let listed = db.orders().list(OrderKind::Sale, 10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_document_number_collision_retries() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 1, 0.0, 0.0)]).unwrap();
        let existing = db
            .orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();

        // Scripted generator: collide once, then produce a fresh number
        let taken = existing.document_no.clone();
        let mut calls = 0;
        let header = db
            .orders()
            .post_with(OrderKind::Sale, None, &priced, || {
                calls += 1;
                if calls == 1 {
                    taken.clone()
                } else {
                    "INV-20260805-RETRY1".to_string()
                }
            })
            .await
            .unwrap();

        assert_eq!(header.document_no, "INV-20260805-RETRY1");
        assert_eq!(table_count(&db, "sales").await, 2);
    }

    #[tokio::test]
    async fn test_document_number_retries_are_bounded() {
        let (db, _laptop, mouse) = setup().await;

        let priced = price_lines(&[line(&mouse, 1, 0.0, 0.0)]).unwrap();
        let existing = db
            .orders()
            .post(OrderKind::Sale, None, &priced)
            .await
            .unwrap();

        let taken = existing.document_no.clone();
        let result = db
            .orders()
            .post_with(OrderKind::Sale, None, &priced, || taken.clone())
            .await;

        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
        // Only the original order made it in
        assert_eq!(table_count(&db, "sales").await, 1);
    }

    #[test]
    fn test_document_number_shape() {
        let doc = document_number(OrderKind::Sale);
        let parts: Vec<&str> = doc.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
