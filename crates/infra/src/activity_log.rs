//! Postgres-backed activity log (sqlx).
//!
//! Two append-only tables, one per role, with the same shape; the sender
//! simply never fills `time_taken`. The core issues exactly three statement
//! kinds: `CREATE TABLE IF NOT EXISTS` once on boot, single-row `INSERT`s,
//! and a bounded `SELECT ... ORDER BY timestamp DESC LIMIT n`. Nothing ever
//! updates or deletes a row.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::instrument;

use courier_core::config::DbConfig;
use courier_core::{ActivityRecord, NewActivityRecord, RecordId};
use courier_pipeline::{ActivityLog, ActivityLogError};

/// Which role's table this log writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityTable {
    /// `sent_messages`, written by the sender on submit.
    Sent,
    /// `processed_messages`, written by the receiver on successful processing.
    Processed,
}

impl ActivityTable {
    fn name(self) -> &'static str {
        match self {
            ActivityTable::Sent => "sent_messages",
            ActivityTable::Processed => "processed_messages",
        }
    }
}

/// Lazy connection pool for the activity-log database.
///
/// The store is assumed reachable at startup; connections are only opened on
/// first use, so pool creation itself cannot fail.
pub fn connect_pool(db: &DbConfig) -> PgPool {
    let options = PgConnectOptions::new()
        .host(&db.host)
        .username(&db.user)
        .password(&db.password)
        .database(&db.database);

    PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(options)
}

#[derive(Debug, Clone)]
pub struct PostgresActivityLog {
    pool: PgPool,
    table: ActivityTable,
}

impl PostgresActivityLog {
    pub fn new(pool: PgPool, table: ActivityTable) -> Self {
        Self { pool, table }
    }

    /// Create this log's table if it does not exist yet (idempotent, run on
    /// boot).
    #[instrument(skip(self), fields(table = self.table.name()), err)]
    pub async fn ensure_schema(&self) -> Result<(), ActivityLogError> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL NOT NULL,
                timestamp BIGINT NOT NULL DEFAULT 0,
                time_taken BIGINT,
                processed_by VARCHAR(255) NOT NULL,
                processed_by_color VARCHAR(8) NOT NULL,
                message TEXT,
                PRIMARY KEY (id)
            )
            "#,
            table = self.table.name()
        );

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl ActivityLog for PostgresActivityLog {
    #[instrument(skip(self, record), fields(table = self.table.name()), err)]
    async fn append(&self, record: NewActivityRecord) -> Result<RecordId, ActivityLogError> {
        let sql = format!(
            r#"
            INSERT INTO {table} (timestamp, time_taken, processed_by, processed_by_color, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
            table = self.table.name()
        );

        let row = sqlx::query(&sql)
            .bind(record.timestamp_ms)
            .bind(record.processing_ms)
            .bind(&record.processed_by)
            .bind(&record.processed_by_color)
            .bind(&record.message)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.get::<i64, _>("id"))
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, ActivityLogError> {
        let sql = format!(
            r#"
            SELECT id, timestamp, time_taken, processed_by, processed_by_color, message
            FROM {table}
            ORDER BY timestamp DESC
            LIMIT $1
            "#,
            table = self.table.name()
        );

        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| ActivityRecord {
                id: row.get("id"),
                timestamp_ms: row.get("timestamp"),
                processing_ms: row.get("time_taken"),
                processed_by: row.get("processed_by"),
                processed_by_color: row.get("processed_by_color"),
                message: row.get::<Option<String>, _>("message").unwrap_or_default(),
            })
            .collect())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> ActivityLogError {
    match &err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            ActivityLogError::Unavailable(err.to_string())
        }
        _ => ActivityLogError::Query(err.to_string()),
    }
}
