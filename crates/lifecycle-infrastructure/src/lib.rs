//! # Lifecycle Infrastructure
//! 
//! Storage adapters for the soft-delete repository port: PostgreSQL and in-memory.

pub mod database;
pub mod memory;

pub use database::{create_pool, run_migrations, PgChildTableGuard, PgClientAppRepository, PgSoftDeleteRepository, PgTenantRepository};
pub use memory::{ActiveChildrenGuard, InMemorySoftDeleteRepository};
