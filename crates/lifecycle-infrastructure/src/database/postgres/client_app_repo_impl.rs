// ============================================================================
// Lifecycle Infrastructure - PostgreSQL Client App Mapping
// File: crates/lifecycle-infrastructure/src/database/postgres/client_app_repo_impl.rs
// ============================================================================

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

use lifecycle_core::domain::{AppType, ClientApp};
use lifecycle_core::error::SoftDeleteError;

use super::soft_delete_repo_impl::{LifecycleRow, PgEntity, PgSoftDeleteRepository};
use super::statements::TableSpec;

pub type PgClientAppRepository = PgSoftDeleteRepository<ClientApp>;

#[derive(Debug, FromRow)]
pub struct ClientAppRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub unique_name: String,
    pub type_app: String,
    #[sqlx(flatten)]
    pub lifecycle: LifecycleRow,
}

impl PgEntity for ClientApp {
    type Row = ClientAppRow;

    const TABLE: TableSpec = TableSpec {
        table: "client_apps",
        columns: "id, tenant_id, name, unique_name, type_app",
    };

    const INSERT_SQL: &'static str = r#"
        INSERT INTO client_apps (
            id, tenant_id, name, unique_name, type_app,
            status, deleted_at, deleted_by, created_at, created_by, updated_at, updated_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING
            id, tenant_id, name, unique_name, type_app,
            status, deleted_at, deleted_by, created_at, created_by, updated_at, updated_by
    "#;

    fn from_row(row: ClientAppRow) -> Result<Self, SoftDeleteError> {
        Ok(ClientApp {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            unique_name: row.unique_name,
            type_app: AppType::from_str(&row.type_app).ok_or_else(|| {
                SoftDeleteError::storage(Some(row.id), format!("unknown type_app '{}'", row.type_app))
            })?,
            lifecycle: row.lifecycle.into_state(row.id)?,
        })
    }

    fn bind_insert<'q>(
        &'q self,
        query: QueryAs<'q, Postgres, ClientAppRow, PgArguments>,
    ) -> QueryAs<'q, Postgres, ClientAppRow, PgArguments> {
        let life = &self.lifecycle;
        query
            .bind(self.id)
            .bind(self.tenant_id)
            .bind(&self.name)
            .bind(&self.unique_name)
            .bind(self.type_app.as_str())
            .bind(life.status().as_str())
            .bind(life.deleted_at())
            .bind(life.deleted_by())
            .bind(life.created_at())
            .bind(life.created_by())
            .bind(life.updated_at())
            .bind(life.updated_by())
    }
}
