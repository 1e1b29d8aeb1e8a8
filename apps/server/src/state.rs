//! Shared handler state.

use std::time::Duration;

use tally_db::Database;

/// State available to every handler. Cloning is cheap: the database
/// handle wraps a shared pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,

    /// Upper bound on a posting transaction.
    pub post_timeout: Duration,
}

impl AppState {
    pub fn new(db: Database, post_timeout: Duration) -> Self {
        AppState { db, post_timeout }
    }
}
