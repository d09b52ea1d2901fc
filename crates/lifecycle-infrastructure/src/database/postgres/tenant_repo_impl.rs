// ============================================================================
// Lifecycle Infrastructure - PostgreSQL Tenant Mapping
// File: crates/lifecycle-infrastructure/src/database/postgres/tenant_repo_impl.rs
// ============================================================================

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

use lifecycle_core::domain::{SubscriptionPlan, Tenant};
use lifecycle_core::error::SoftDeleteError;

use super::soft_delete_repo_impl::{LifecycleRow, PgEntity, PgSoftDeleteRepository};
use super::statements::TableSpec;

pub type PgTenantRepository = PgSoftDeleteRepository<Tenant>;

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
pub struct TenantRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub max_users: i32,
    pub subscription_plan: String,
    #[sqlx(flatten)]
    pub lifecycle: LifecycleRow,
}

impl PgEntity for Tenant {
    type Row = TenantRow;

    const TABLE: TableSpec = TableSpec {
        table: "tenants",
        columns: "id, name, slug, max_users, subscription_plan",
    };

    const INSERT_SQL: &'static str = r#"
        INSERT INTO tenants (
            id, name, slug, max_users, subscription_plan,
            status, deleted_at, deleted_by, created_at, created_by, updated_at, updated_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING
            id, name, slug, max_users, subscription_plan,
            status, deleted_at, deleted_by, created_at, created_by, updated_at, updated_by
    "#;

    fn from_row(row: TenantRow) -> Result<Self, SoftDeleteError> {
        Ok(Tenant {
            id: row.id,
            name: row.name,
            slug: row.slug,
            max_users: row.max_users,
            subscription_plan: SubscriptionPlan::from_str(&row.subscription_plan).ok_or_else(|| {
                SoftDeleteError::storage(
                    Some(row.id),
                    format!("unknown subscription_plan '{}'", row.subscription_plan),
                )
            })?,
            lifecycle: row.lifecycle.into_state(row.id)?,
        })
    }

    fn bind_insert<'q>(
        &'q self,
        query: QueryAs<'q, Postgres, TenantRow, PgArguments>,
    ) -> QueryAs<'q, Postgres, TenantRow, PgArguments> {
        let life = &self.lifecycle;
        query
            .bind(self.id)
            .bind(&self.name)
            .bind(&self.slug)
            .bind(self.max_users)
            .bind(self.subscription_plan.as_str())
            .bind(life.status().as_str())
            .bind(life.deleted_at())
            .bind(life.deleted_by())
            .bind(life.created_at())
            .bind(life.created_by())
            .bind(life.updated_at())
            .bind(life.updated_by())
    }
}
