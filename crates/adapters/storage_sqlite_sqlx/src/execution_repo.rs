//! `SQLite` implementation of [`ExecutionRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use rulehub_app::ports::ExecutionRepository;
use rulehub_domain::error::{NotFoundError, RuleHubError};
use rulehub_domain::execution::{ActionResult, ExecutionRecord, ExecutionStatus};
use rulehub_domain::id::{EventId, ExecutionId, RuleId};
use rulehub_domain::time::Timestamp;

use crate::error::StorageError;

fn decode<E: std::error::Error + Send + Sync + 'static>(err: E) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

fn parse_timestamp(s: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.to_utc())
        .map_err(decode)
}

fn parse_status(s: String) -> Result<ExecutionStatus, sqlx::Error> {
    serde_json::from_value(serde_json::Value::String(s)).map_err(decode)
}

struct Wrapper(ExecutionRecord);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ExecutionRecord> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let rule_id: String = row.try_get("rule_id")?;
        let event_id: String = row.try_get("event_id")?;
        let status: String = row.try_get("status")?;
        let started_at: String = row.try_get("started_at")?;
        let finished_at: Option<String> = row.try_get("finished_at")?;
        let results_json: String = row.try_get("action_results")?;

        let action_results: Vec<ActionResult> =
            serde_json::from_str(&results_json).map_err(decode)?;
        let finished_at = finished_at.map(|s| parse_timestamp(&s)).transpose()?;

        Ok(Self(ExecutionRecord {
            id: ExecutionId::from_str(&id).map_err(decode)?,
            rule_id: RuleId::from_str(&rule_id).map_err(decode)?,
            event_id: EventId::from_str(&event_id).map_err(decode)?,
            status: parse_status(status)?,
            started_at: parse_timestamp(&started_at)?,
            finished_at,
            action_results,
        }))
    }
}

/// `SQLite`-backed execution repository.
pub struct SqliteExecutionRepository {
    pool: SqlitePool,
}

impl SqliteExecutionRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ExecutionRepository for SqliteExecutionRepository {
    async fn insert_pending(&self, record: ExecutionRecord) -> Result<bool, RuleHubError> {
        let results_json =
            serde_json::to_string(&record.action_results).map_err(StorageError::from)?;

        // The unique (event_id, rule_id) index carries the dedup
        // guarantee; a conflicting insert is a redelivery, not an error.
        let result = sqlx::query(
                "INSERT INTO executions (id, rule_id, event_id, status, started_at, finished_at, action_results) VALUES (?, ?, ?, ?, ?, ?, ?) ON CONFLICT (event_id, rule_id) DO NOTHING",
            )
            .bind(record.id.to_string())
            .bind(record.rule_id.to_string())
            .bind(record.event_id.to_string())
            .bind(record.status.to_string())
            .bind(record.started_at.to_rfc3339())
            .bind(record.finished_at.map(|ts| ts.to_rfc3339()))
            .bind(&results_json)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_running(&self, id: ExecutionId) -> Result<(), RuleHubError> {
        let result = sqlx::query("UPDATE executions SET status = 'RUNNING' WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "Execution",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn complete(
        &self,
        id: ExecutionId,
        status: ExecutionStatus,
        results: Vec<ActionResult>,
        finished_at: Timestamp,
    ) -> Result<ExecutionRecord, RuleHubError> {
        let results_json = serde_json::to_string(&results).map_err(StorageError::from)?;

        let result = sqlx::query(
                "UPDATE executions SET status = ?, action_results = ?, finished_at = ? WHERE id = ?",
            )
            .bind(status.to_string())
            .bind(&results_json)
            .bind(finished_at.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "Execution",
                id: id.to_string(),
            }
            .into());
        }

        self.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Execution",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn get_by_id(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>, RuleHubError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM executions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ExecutionRecord>, RuleHubError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(
                "SELECT * FROM executions WHERE rule_id = ? ORDER BY started_at DESC LIMIT ? OFFSET ?",
            )
            .bind(rule_id.to_string())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
