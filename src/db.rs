//! SQLite pool plumbing shared by repositories.

use diesel::QueryResult;
use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;

pub use pushkind_common::db::{DbConnection, DbPool, establish_connection_pool};

/// Milliseconds a writer waits on a locked database before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Session pragmas every repository connection runs with.
///
/// Foreign keys are off by default in SQLite; appointment lines rely on them
/// for cascading deletes.
pub fn apply_pragmas(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(&format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
    ))
}

#[cfg(feature = "server")]
pub mod migrations {
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

    use super::DbPool;

    pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    /// Apply any pending embedded migrations.
    pub fn run_pending(pool: &DbPool) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = pool.get()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        Ok(applied.len())
    }
}
