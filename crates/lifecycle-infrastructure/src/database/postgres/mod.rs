//! PostgreSQL adapters

pub mod statements;
pub mod soft_delete_repo_impl;
pub mod tenant_repo_impl;
pub mod client_app_repo_impl;
pub mod guard_impl;

pub use soft_delete_repo_impl::{LifecycleRow, PgEntity, PgSoftDeleteRepository};
pub use tenant_repo_impl::PgTenantRepository;
pub use client_app_repo_impl::PgClientAppRepository;
pub use guard_impl::PgChildTableGuard;
pub use statements::{Statements, TableSpec};
