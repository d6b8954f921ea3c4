//! Counter operations: get, increment, reset.
//!
//! All three follow the same shape: open a session, make sure the singleton
//! row exists, mutate it, commit, and hand back an owned snapshot.
//!
//! - Mutations are single `UPDATE ... RETURNING` statements (no read-modify-write)
//! - Lazy creation is a conditional insert, so a second row is never created
//! - The value a missing counter is created with depends on the operation:
//!   `increment` creates at 1, `get` and `reset` create at 0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteConnection;
use sqlx::FromRow;

use crate::error::Result;
use crate::store::CounterStore;

/// Snapshot of the counter row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Counter {
    pub id: i64,
    pub value: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-place change applied to an existing counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Increment,
    Reset,
}

impl Mutation {
    fn sql(self) -> &'static str {
        match self {
            Self::Increment => {
                r#"
                UPDATE counters
                SET value = value + 1, updated_at = ?1
                WHERE id = (SELECT id FROM counters ORDER BY id LIMIT 1)
                RETURNING id, value, created_at, updated_at
                "#
            }
            Self::Reset => {
                r#"
                UPDATE counters
                SET value = 0, updated_at = ?1
                WHERE id = (SELECT id FROM counters ORDER BY id LIMIT 1)
                RETURNING id, value, created_at, updated_at
                "#
            }
        }
    }

    /// Value a missing counter is materialized with when this mutation is the first access
    fn initial_value(self) -> i64 {
        match self {
            Self::Increment => 1,
            Self::Reset => 0,
        }
    }
}

/// Counter operations over a store handle
pub struct CounterRepo<'a> {
    store: &'a CounterStore,
}

impl<'a> CounterRepo<'a> {
    pub fn new(store: &'a CounterStore) -> Self {
        Self { store }
    }

    /// Return the counter, creating it at 0 if none exists.
    pub async fn get(&self) -> Result<Counter> {
        self.store
            .with_session(|s| Box::pin(async move { ensure_counter(s.conn(), 0).await }))
            .await
    }

    /// Add one to the counter and return the result.
    ///
    /// A missing counter is created directly at 1.
    pub async fn increment(&self) -> Result<Counter> {
        let counter = self.apply(Mutation::Increment).await?;
        tracing::debug!(counter_id = counter.id, value = counter.value, "counter incremented");
        Ok(counter)
    }

    /// Set the counter to 0 and return the result.
    pub async fn reset(&self) -> Result<Counter> {
        let counter = self.apply(Mutation::Reset).await?;
        tracing::debug!(counter_id = counter.id, "counter reset");
        Ok(counter)
    }

    async fn apply(&self, mutation: Mutation) -> Result<Counter> {
        self.store
            .with_session(move |s| {
                Box::pin(async move {
                    // The UPDATE comes first so the session holds the write
                    // lock before deciding whether the row exists.
                    let updated: Option<Counter> = sqlx::query_as(mutation.sql())
                        .bind(Utc::now())
                        .fetch_optional(&mut *s.conn())
                        .await?;

                    match updated {
                        Some(counter) => Ok(counter),
                        None => ensure_counter(s.conn(), mutation.initial_value()).await,
                    }
                })
            })
            .await
    }
}

/// Return the singleton row, inserting it with `initial` if the table is empty.
async fn ensure_counter(conn: &mut SqliteConnection, initial: i64) -> Result<Counter> {
    let now = Utc::now();
    let inserted = sqlx::query(
        r#"
        INSERT INTO counters (value, created_at, updated_at)
        SELECT ?1, ?2, ?2
        WHERE NOT EXISTS (SELECT 1 FROM counters)
        "#,
    )
    .bind(initial)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let counter: Counter = sqlx::query_as(
        r#"
        SELECT id, value, created_at, updated_at
        FROM counters
        ORDER BY id
        LIMIT 1
        "#,
    )
    .fetch_one(&mut *conn)
    .await?;

    if inserted.rows_affected() == 1 {
        tracing::info!(counter_id = counter.id, value = counter.value, "counter created");
    }

    Ok(counter)
}
