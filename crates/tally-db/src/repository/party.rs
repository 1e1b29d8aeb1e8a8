//! # Party Repository
//!
//! Customers and vendors share one record shape and one repository;
//! [`PartyKind`] selects the table. Parties are create-and-read only:
//! once an order references one, it never changes.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use tally_core::{Party, PartyKind};

/// The table a party kind is stored in.
pub(crate) const fn table(kind: PartyKind) -> &'static str {
    match kind {
        PartyKind::Customer => "customers",
        PartyKind::Vendor => "vendors",
    }
}

/// Repository for customer and vendor records.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    pool: SqlitePool,
}

impl PartyRepository {
    /// Creates a new PartyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartyRepository { pool }
    }

    /// Inserts a party record into the table for `kind`.
    pub async fn insert(&self, kind: PartyKind, party: &Party) -> DbResult<()> {
        debug!(kind = kind.label(), name = %party.name, "Inserting party");

        let sql = format!(
            "INSERT INTO {} (id, name, phone, address, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            table(kind)
        );

        sqlx::query(&sql)
            .bind(&party.id)
            .bind(&party.name)
            .bind(&party.phone)
            .bind(&party.address)
            .bind(party.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Builds a party record (generated id, current timestamp) and
    /// inserts it.
    pub async fn create(
        &self,
        kind: PartyKind,
        name: &str,
        phone: Option<String>,
        address: Option<String>,
    ) -> DbResult<Party> {
        let party = Party {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            phone,
            address,
            created_at: Utc::now(),
        };

        self.insert(kind, &party).await?;
        Ok(party)
    }

    /// Gets a party by ID from the table for `kind`.
    pub async fn get_by_id(&self, kind: PartyKind, id: &str) -> DbResult<Option<Party>> {
        let sql = format!(
            "SELECT id, name, phone, address, created_at FROM {} WHERE id = ?1",
            table(kind)
        );

        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(party)
    }

    /// Lists parties of a kind, newest first.
    pub async fn list(&self, kind: PartyKind, limit: u32) -> DbResult<Vec<Party>> {
        let sql = format!(
            "SELECT id, name, phone, address, created_at FROM {} ORDER BY created_at DESC LIMIT ?1",
            table(kind)
        );

        let parties = sqlx::query_as::<_, Party>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(parties)
    }
}
