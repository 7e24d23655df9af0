//! `SQLite` implementation of [`RuleRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use rulehub_app::ports::RuleRepository;
use rulehub_domain::error::{NotFoundError, RuleHubError};
use rulehub_domain::id::{RuleId, TenantId};
use rulehub_domain::rule::{Action, AutomationRule, Condition, RuleScope, Trigger};
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

struct Wrapper(AutomationRule);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<AutomationRule> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let description: String = row.try_get("description")?;
        let scope: String = row.try_get("scope")?;
        let tenant_id: Option<String> = row.try_get("tenant_id")?;
        let event_type: String = row.try_get("event_type")?;
        let conditions_json: String = row.try_get("conditions")?;
        let actions_json: String = row.try_get("actions")?;
        let priority: i32 = row.try_get("priority")?;
        let is_active: bool = row.try_get("is_active")?;
        let execution_count: i64 = row.try_get("execution_count")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let id = RuleId::from_str(&id).map_err(decode)?;
        let tenant_id = tenant_id
            .map(|s| TenantId::from_str(&s).map_err(decode))
            .transpose()?;
        let scope = RuleScope::from_parts(&scope, tenant_id).map_err(decode)?;
        let conditions: Vec<Condition> =
            serde_json::from_str(&conditions_json).map_err(decode)?;
        let actions: Vec<Action> = serde_json::from_str(&actions_json).map_err(decode)?;
        let execution_count = u64::try_from(execution_count).map_err(decode)?;

        Ok(Self(AutomationRule {
            id,
            name,
            description,
            scope,
            trigger: Trigger {
                event_type,
                conditions,
            },
            actions,
            priority,
            is_active,
            execution_count,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

/// `SQLite`-backed rule repository.
pub struct SqliteRuleRepository {
    pool: SqlitePool,
}

impl SqliteRuleRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RuleRepository for SqliteRuleRepository {
    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, RuleHubError> {
        let conditions_json =
            serde_json::to_string(&rule.trigger.conditions).map_err(StorageError::from)?;
        let actions_json = serde_json::to_string(&rule.actions).map_err(StorageError::from)?;
        let scope = match rule.scope {
            RuleScope::Global => "GLOBAL",
            RuleScope::Tenant { .. } => "TENANT",
        };
        let execution_count =
            i64::try_from(rule.execution_count).map_err(|err| StorageError::Database(decode(err)))?;

        sqlx::query(
                "INSERT INTO rules (id, name, description, scope, tenant_id, event_type, conditions, actions, priority, is_active, execution_count, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(rule.id.to_string())
            .bind(&rule.name)
            .bind(&rule.description)
            .bind(scope)
            .bind(rule.scope.tenant_id().map(|t| t.to_string()))
            .bind(&rule.trigger.event_type)
            .bind(&conditions_json)
            .bind(&actions_json)
            .bind(rule.priority)
            .bind(rule.is_active)
            .bind(execution_count)
            .bind(rule.created_at.to_rfc3339())
            .bind(rule.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn get_by_id(&self, id: RuleId) -> Result<Option<AutomationRule>, RuleHubError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM rules WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<AutomationRule>, RuleHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM rules ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_active_for_event(
        &self,
        event_type: &str,
        tenant_id: Option<TenantId>,
    ) -> Result<Vec<AutomationRule>, RuleHubError> {
        // Comparing tenant_id against a NULL bind yields NULL (false),
        // so a platform-level event only sees global rules.
        let rows: Vec<Wrapper> = sqlx::query_as(
                "SELECT * FROM rules WHERE is_active = 1 AND event_type = ? AND (scope = 'GLOBAL' OR tenant_id = ?) ORDER BY priority, id",
            )
            .bind(event_type)
            .bind(tenant_id.map(|t| t.to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, rule: AutomationRule) -> Result<AutomationRule, RuleHubError> {
        let conditions_json =
            serde_json::to_string(&rule.trigger.conditions).map_err(StorageError::from)?;
        let actions_json = serde_json::to_string(&rule.actions).map_err(StorageError::from)?;
        let scope = match rule.scope {
            RuleScope::Global => "GLOBAL",
            RuleScope::Tenant { .. } => "TENANT",
        };

        sqlx::query(
                "UPDATE rules SET name = ?, description = ?, scope = ?, tenant_id = ?, event_type = ?, conditions = ?, actions = ?, priority = ?, is_active = ?, updated_at = ? WHERE id = ?",
            )
            .bind(&rule.name)
            .bind(&rule.description)
            .bind(scope)
            .bind(rule.scope.tenant_id().map(|t| t.to_string()))
            .bind(&rule.trigger.event_type)
            .bind(&conditions_json)
            .bind(&actions_json)
            .bind(rule.priority)
            .bind(rule.is_active)
            .bind(rule.updated_at.to_rfc3339())
            .bind(rule.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn delete(&self, id: RuleId) -> Result<(), RuleHubError> {
        sqlx::query("DELETE FROM rules WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn increment_execution_count(&self, id: RuleId) -> Result<(), RuleHubError> {
        let result = sqlx::query(
                "UPDATE rules SET execution_count = execution_count + 1, updated_at = ? WHERE id = ?",
            )
            .bind(rulehub_domain::time::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "Rule",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
