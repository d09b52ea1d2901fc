// ============================================================================
// Lifecycle Infrastructure - PostgreSQL Soft Delete Repository
// File: crates/lifecycle-infrastructure/src/database/postgres/soft_delete_repo_impl.rs
// ============================================================================

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};
use tracing::{debug, error, info};
use uuid::Uuid;

use lifecycle_core::domain::{Entity, EntityStatus, LifecycleState, SoftDeletable};
use lifecycle_core::error::SoftDeleteError;
use lifecycle_core::repositories::{SoftDeleteRepository, StatusScope};
use lifecycle_shared::EntityId;

use super::statements::{Statements, TableSpec};

/// Lifecycle columns as stored; flattened into every entity row type.
#[derive(Debug, FromRow)]
pub struct LifecycleRow {
    pub status: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl LifecycleRow {
    pub fn into_state(self, id: EntityId) -> Result<LifecycleState, SoftDeleteError> {
        let status = EntityStatus::from_str(&self.status).ok_or_else(|| {
            SoftDeleteError::storage(Some(id), format!("unknown status '{}'", self.status))
        })?;

        LifecycleState::restore(
            status,
            self.deleted_at,
            self.deleted_by,
            self.created_at,
            self.created_by,
            self.updated_at,
            self.updated_by,
        )
        .ok_or_else(|| {
            error!("Row {} violates the status/deletion-field invariant", id);
            SoftDeleteError::storage(Some(id), "row status disagrees with its deletion fields")
        })
    }
}

/// A record type with a soft-delete table behind it.
pub trait PgEntity: SoftDeletable {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const TABLE: TableSpec;

    /// `INSERT ... RETURNING` for every column, lifecycle ones included.
    const INSERT_SQL: &'static str;

    fn from_row(row: Self::Row) -> Result<Self, SoftDeleteError>;

    fn bind_insert<'q>(
        &'q self,
        query: QueryAs<'q, Postgres, Self::Row, PgArguments>,
    ) -> QueryAs<'q, Postgres, Self::Row, PgArguments>;
}

pub struct PgSoftDeleteRepository<T: PgEntity> {
    pool: PgPool,
    statements: Statements,
    _entity: PhantomData<fn() -> T>,
}

impl<T: PgEntity> PgSoftDeleteRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statements: Statements::for_table(T::TABLE),
            _entity: PhantomData,
        }
    }

    fn db_error(op: &str, id: Option<EntityId>) -> impl FnOnce(sqlx::Error) -> SoftDeleteError + '_ {
        move |e| {
            error!("Database error during {} on {}: {}", op, T::TABLE.table, e);
            SoftDeleteError::storage(id, e.to_string())
        }
    }

    fn map_rows(rows: Vec<T::Row>) -> Result<Vec<T>, SoftDeleteError> {
        rows.into_iter().map(T::from_row).collect()
    }

    async fn fetch_one_in(&self, id: &EntityId, scope: StatusScope) -> Result<Option<T>, SoftDeleteError> {
        let row: Option<T::Row> = sqlx::query_as(self.statements.find_by_id(scope))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_error("find", Some(*id)))?;

        row.map(T::from_row).transpose()
    }

    async fn fetch_all_in(&self, scope: StatusScope) -> Result<Vec<T>, SoftDeleteError> {
        let rows: Vec<T::Row> = sqlx::query_as(self.statements.find_all(scope))
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_error("find_all", None))?;

        Self::map_rows(rows)
    }

    async fn count_in(&self, scope: StatusScope) -> Result<u64, SoftDeleteError> {
        let count: i64 = sqlx::query_scalar(self.statements.count(scope))
            .fetch_one(&self.pool)
            .await
            .map_err(Self::db_error("count", None))?;

        Ok(count.max(0) as u64)
    }

    /// Runs one status-guarded `UPDATE`; `$1` is the id or id array.
    async fn execute_transition<I>(
        &self,
        sql: &str,
        op: &str,
        target: I,
        id: Option<EntityId>,
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError>
    where
        I: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
    {
        let result = sqlx::query(sql)
            .bind(target)
            .bind(at)
            .bind(actor)
            .execute(&self.pool)
            .await
            .map_err(Self::db_error(op, id))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<T: PgEntity> SoftDeleteRepository<T> for PgSoftDeleteRepository<T> {
    async fn insert(&self, entity: &T) -> Result<T, SoftDeleteError> {
        info!("Inserting into {}: {}", T::TABLE.table, entity.id());

        let row: T::Row = entity
            .bind_insert(sqlx::query_as(T::INSERT_SQL))
            .fetch_one(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error inserting into {}: {}", T::TABLE.table, e);
                let msg = e.to_string();
                if msg.contains("unique") || msg.contains("duplicate") {
                    SoftDeleteError::validation(Some(entity.id()), msg)
                } else {
                    SoftDeleteError::storage(Some(entity.id()), msg)
                }
            })?;

        T::from_row(row)
    }

    async fn find_active(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError> {
        self.fetch_one_in(id, StatusScope::Active).await
    }

    async fn find_all_active(&self) -> Result<Vec<T>, SoftDeleteError> {
        self.fetch_all_in(StatusScope::Active).await
    }

    async fn find_deleted(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError> {
        self.fetch_one_in(id, StatusScope::Deleted).await
    }

    async fn find_all_deleted(&self) -> Result<Vec<T>, SoftDeleteError> {
        self.fetch_all_in(StatusScope::Deleted).await
    }

    async fn find_including_deleted(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError> {
        self.fetch_one_in(id, StatusScope::All).await
    }

    async fn find_all_including_deleted(&self) -> Result<Vec<T>, SoftDeleteError> {
        self.fetch_all_in(StatusScope::All).await
    }

    async fn exists_active(&self, id: &EntityId) -> Result<bool, SoftDeleteError> {
        Ok(self.fetch_one_in(id, StatusScope::Active).await?.is_some())
    }

    async fn deactivate_by_id(
        &self,
        id: &EntityId,
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        let affected = self
            .execute_transition(&self.statements.deactivate_one, "deactivate", *id, Some(*id), at, actor)
            .await?;
        debug!("deactivate {} in {}: {} row(s)", id, T::TABLE.table, affected);
        Ok(affected)
    }

    async fn reactivate_by_id(
        &self,
        id: &EntityId,
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        let affected = self
            .execute_transition(&self.statements.reactivate_one, "reactivate", *id, Some(*id), at, actor)
            .await?;
        debug!("reactivate {} in {}: {} row(s)", id, T::TABLE.table, affected);
        Ok(affected)
    }

    async fn deactivate_by_ids(
        &self,
        ids: &[EntityId],
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        self.execute_transition(&self.statements.deactivate_many, "bulk deactivate", ids.to_vec(), None, at, actor)
            .await
    }

    async fn reactivate_by_ids(
        &self,
        ids: &[EntityId],
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        self.execute_transition(&self.statements.reactivate_many, "bulk reactivate", ids.to_vec(), None, at, actor)
            .await
    }

    async fn count_active(&self) -> Result<u64, SoftDeleteError> {
        self.count_in(StatusScope::Active).await
    }

    async fn count_deleted(&self) -> Result<u64, SoftDeleteError> {
        self.count_in(StatusScope::Deleted).await
    }

    async fn find_deleted_by_actor(&self, actor: &EntityId) -> Result<Vec<T>, SoftDeleteError> {
        let rows: Vec<T::Row> = sqlx::query_as(&self.statements.deleted_by_actor)
            .bind(actor)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_error("find_deleted_by_actor", None))?;

        Self::map_rows(rows)
    }

    async fn find_deleted_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<T>, SoftDeleteError> {
        let rows: Vec<T::Row> = sqlx::query_as(&self.statements.deleted_between)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_error("find_deleted_between", None))?;

        Self::map_rows(rows)
    }
}
