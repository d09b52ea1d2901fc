//! Dependency guard over an in-memory child table

use std::sync::Arc;

use async_trait::async_trait;

use lifecycle_core::domain::{ChildOf, SoftDeletable};
use lifecycle_core::error::SoftDeleteError;
use lifecycle_core::policy::DependencyGuard;
use lifecycle_core::repositories::StatusScope;
use lifecycle_shared::EntityId;

use super::repository::InMemorySoftDeleteRepository;

/// Blocks deactivation of a parent while any of its children are active.
pub struct ActiveChildrenGuard<C: SoftDeletable + ChildOf> {
    children: Arc<InMemorySoftDeleteRepository<C>>,
    kind: &'static str,
}

impl<C: SoftDeletable + ChildOf> ActiveChildrenGuard<C> {
    pub fn new(children: Arc<InMemorySoftDeleteRepository<C>>, kind: &'static str) -> Self {
        Self { children, kind }
    }
}

#[async_trait]
impl<C: SoftDeletable + ChildOf> DependencyGuard for ActiveChildrenGuard<C> {
    async fn active_dependents(&self, id: &EntityId) -> Result<u64, SoftDeleteError> {
        Ok(self.children.count(StatusScope::Active, |child| child.parent_id() == *id))
    }

    fn dependent_kind(&self) -> &'static str {
        self.kind
    }
}
