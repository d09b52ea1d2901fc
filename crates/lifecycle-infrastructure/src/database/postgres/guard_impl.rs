//! Dependency guard backed by a child table's foreign key

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use lifecycle_core::error::SoftDeleteError;
use lifecycle_core::policy::DependencyGuard;
use lifecycle_shared::constants::STATUS_ACTIVE;
use lifecycle_shared::EntityId;

/// Counts active rows of `table` whose `parent_column` points at the record.
pub struct PgChildTableGuard {
    pool: PgPool,
    table: &'static str,
    sql: String,
}

impl PgChildTableGuard {
    pub fn new(pool: PgPool, table: &'static str, parent_column: &'static str) -> Self {
        Self { pool, table, sql: child_count_sql(table, parent_column) }
    }

    /// Client apps block their tenant.
    pub fn client_apps_of_tenant(pool: PgPool) -> Self {
        Self::new(pool, "client_apps", "tenant_id")
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

fn child_count_sql(table: &str, parent_column: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1 AND status = '{}'",
        table, parent_column, STATUS_ACTIVE
    )
}

#[async_trait]
impl DependencyGuard for PgChildTableGuard {
    async fn active_dependents(&self, id: &EntityId) -> Result<u64, SoftDeleteError> {
        let count: i64 = sqlx::query_scalar(&self.sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error counting dependents in {}: {}", self.table, e);
                SoftDeleteError::storage(Some(*id), e.to_string())
            })?;

        Ok(count.max(0) as u64)
    }

    fn dependent_kind(&self) -> &'static str {
        self.table
    }
}
