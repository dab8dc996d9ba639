//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! `Database` holds a `SqlitePool`, which is already thread-safe, so no
//! locking happens here.

use folio_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let session = db_state.inner().sessions().current().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
