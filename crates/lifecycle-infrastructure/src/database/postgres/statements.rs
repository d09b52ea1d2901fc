// ============================================================================
// Lifecycle Infrastructure - SQL Statement Templates
// File: crates/lifecycle-infrastructure/src/database/postgres/statements.rs
// ============================================================================
//! Every statement a soft-delete table needs, generated once per table from
//! the status-scope templates. Callers never write their own status filters.

use lifecycle_core::repositories::StatusScope;
use lifecycle_shared::constants::{STATUS_ACTIVE, STATUS_INACTIVE};

/// Lifecycle columns every soft-delete table carries, in row-mapping order.
pub const LIFECYCLE_COLUMNS: &str =
    "status, deleted_at, deleted_by, created_at, created_by, updated_at, updated_by";

/// Table name plus its entity-specific columns (without the lifecycle ones).
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table: &'static str,
    pub columns: &'static str,
}

#[derive(Debug, Clone)]
pub struct Statements {
    pub find_by_id: [String; 3],
    pub find_all: [String; 3],
    pub count: [String; 3],
    pub deactivate_one: String,
    pub deactivate_many: String,
    pub reactivate_one: String,
    pub reactivate_many: String,
    pub deleted_by_actor: String,
    pub deleted_between: String,
}

fn slot(scope: StatusScope) -> usize {
    match scope {
        StatusScope::Active => 0,
        StatusScope::Deleted => 1,
        StatusScope::All => 2,
    }
}

/// `WHERE`-clause body for a scope; `TRUE` when the scope admits everything.
pub fn scope_predicate(scope: StatusScope) -> String {
    match scope.required_status() {
        Some(status) => format!("status = '{}'", status.as_str()),
        None => "TRUE".to_string(),
    }
}

impl Statements {
    pub fn for_table(def: TableSpec) -> Self {
        let scopes = [StatusScope::Active, StatusScope::Deleted, StatusScope::All];
        let select = |scope: StatusScope, extra: &str| {
            format!(
                "SELECT {cols}, {life} FROM {table} WHERE {pred}{extra}",
                cols = def.columns,
                life = LIFECYCLE_COLUMNS,
                table = def.table,
                pred = scope_predicate(scope),
                extra = extra,
            )
        };
        let ordered = " ORDER BY created_at, id";

        // $1 = id(s), $2 = timestamp, $3 = actor
        let transition = |target: &str, expected: &str, clear: bool, many: bool| {
            let deleted = if clear {
                "deleted_at = NULL, deleted_by = NULL".to_string()
            } else {
                "deleted_at = $2, deleted_by = $3".to_string()
            };
            let id_match = if many { "id = ANY($1)" } else { "id = $1" };
            format!(
                "UPDATE {table} SET status = '{target}', {deleted}, \
                 updated_at = GREATEST($2, updated_at + INTERVAL '1 microsecond'), updated_by = $3 \
                 WHERE {id_match} AND status = '{expected}'",
                table = def.table,
            )
        };

        Self {
            find_by_id: scopes.map(|scope| select(scope, " AND id = $1")),
            find_all: scopes.map(|scope| select(scope, ordered)),
            count: scopes.map(|scope| {
                format!("SELECT COUNT(*) FROM {} WHERE {}", def.table, scope_predicate(scope))
            }),
            deactivate_one: transition(STATUS_INACTIVE, STATUS_ACTIVE, false, false),
            deactivate_many: transition(STATUS_INACTIVE, STATUS_ACTIVE, false, true),
            reactivate_one: transition(STATUS_ACTIVE, STATUS_INACTIVE, true, false),
            reactivate_many: transition(STATUS_ACTIVE, STATUS_INACTIVE, true, true),
            deleted_by_actor: select(StatusScope::Deleted, &format!(" AND deleted_by = $1{}", ordered)),
            deleted_between: select(
                StatusScope::Deleted,
                &format!(" AND deleted_at BETWEEN $1 AND $2{}", ordered),
            ),
        }
    }

    pub fn find_by_id(&self, scope: StatusScope) -> &str {
        &self.find_by_id[slot(scope)]
    }

    pub fn find_all(&self, scope: StatusScope) -> &str {
        &self.find_all[slot(scope)]
    }

    pub fn count(&self, scope: StatusScope) -> &str {
        &self.count[slot(scope)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: TableSpec = TableSpec { table: "widgets", columns: "id, name" };

    #[test]
    fn test_default_reads_filter_active() {
        let s = Statements::for_table(WIDGETS);
        assert_eq!(
            s.find_by_id(StatusScope::Active),
            "SELECT id, name, status, deleted_at, deleted_by, created_at, created_by, updated_at, updated_by \
             FROM widgets WHERE status = 'ACTIVE' AND id = $1"
        );
        assert!(s.find_all(StatusScope::Deleted).contains("WHERE status = 'INACTIVE' ORDER BY"));
        assert!(s.find_all(StatusScope::All).contains("WHERE TRUE ORDER BY"));
        assert_eq!(s.count(StatusScope::Active), "SELECT COUNT(*) FROM widgets WHERE status = 'ACTIVE'");
    }

    #[test]
    fn test_transitions_are_status_guarded() {
        let s = Statements::for_table(WIDGETS);
        assert!(s.deactivate_one.starts_with("UPDATE widgets SET status = 'INACTIVE', deleted_at = $2, deleted_by = $3"));
        assert!(s.deactivate_one.ends_with("WHERE id = $1 AND status = 'ACTIVE'"));
        assert!(s.deactivate_many.ends_with("WHERE id = ANY($1) AND status = 'ACTIVE'"));
        assert!(s.reactivate_one.contains("deleted_at = NULL, deleted_by = NULL"));
        assert!(s.reactivate_many.ends_with("WHERE id = ANY($1) AND status = 'INACTIVE'"));
    }

    #[test]
    fn test_audit_queries_only_see_deleted_rows() {
        let s = Statements::for_table(WIDGETS);
        assert!(s.deleted_by_actor.contains("WHERE status = 'INACTIVE' AND deleted_by = $1"));
        assert!(s.deleted_between.contains("AND deleted_at BETWEEN $1 AND $2"));
    }
}
