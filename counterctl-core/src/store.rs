//! SQLite-backed counter store
//!
//! Owns the connection pool and the `counters` table. Every read or write
//! goes through a [`Session`], which wraps one transaction on one pooled
//! connection and rolls back unless explicitly committed.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::{Sqlite, Transaction};

use crate::error::{CounterError, Result};

/// Default maximum connections for file-backed stores.
/// Kept low for a single-row workload.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a writer waits on a locked database before failing with SQLITE_BUSY
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_COUNTERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS counters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        value INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

const DROP_COUNTERS_TABLE: &str = "DROP TABLE IF EXISTS counters";

/// Handle to the counter database. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct CounterStore {
    pool: SqlitePool,
}

impl CounterStore {
    /// Open (creating if missing) the database at `database_url`.
    ///
    /// Accepts `sqlite://path/to/file.db` or `sqlite::memory:`. The parent
    /// directory of a file database is created on demand. Memory URLs with
    /// extra options (`sqlite::memory:?cache=shared`) keep those options.
    pub async fn connect(database_url: &str) -> Result<Self> {
        if is_private_memory(database_url) {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);

        if let Some(parent) = options
            .get_filename()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            ensure_dir(parent).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::debug!(database_url, "counter store connected");
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool holds exactly one connection that never expires: an in-memory
    /// SQLite database lives only as long as its connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Ensure the `counters` table exists. Safe to call on every start.
    pub async fn create_schema(&self) -> Result<()> {
        sqlx::query(CREATE_COUNTERS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drop and recreate the `counters` table, discarding the counter.
    ///
    /// Test isolation hook; not part of the counter lifecycle.
    pub async fn reset_schema(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(DROP_COUNTERS_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_COUNTERS_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!("counter schema reset");
        Ok(())
    }

    /// Start a transactional session on one pooled connection.
    pub async fn begin(&self) -> Result<Session> {
        let tx = self.pool.begin().await?;
        Ok(Session { tx })
    }

    /// Run `work` inside a session, committing if it returns `Ok`.
    ///
    /// On `Err`, panic, or cancellation the session is dropped uncommitted and
    /// the transaction rolls back.
    ///
    /// ```ignore
    /// let value = store
    ///     .with_session(|s| Box::pin(async move { read_value(s.conn()).await }))
    ///     .await?;
    /// ```
    pub async fn with_session<T, F>(&self, work: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T>>,
    {
        let mut session = self.begin().await?;
        let output = work(&mut session).await?;
        session.commit().await?;
        Ok(output)
    }

    /// Round-trip a trivial query to check the database is reachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// One transaction against the store.
///
/// Dropping a session without calling [`Session::commit`] rolls it back.
pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

impl Session {
    /// Connection to run queries on within this transaction.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Bare in-memory URLs, served by [`CounterStore::in_memory`]
fn is_private_memory(database_url: &str) -> bool {
    matches!(
        database_url,
        "sqlite::memory:" | "sqlite://:memory:" | "sqlite:memory:" | ":memory:"
    )
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| CounterError::io(dir, e))
}
