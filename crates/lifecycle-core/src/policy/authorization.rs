// ============================================================================
// Lifecycle Core - Authorization Policy
// File: crates/lifecycle-core/src/policy/authorization.rs
// ============================================================================
//! Opaque permission predicates for lifecycle transitions

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lifecycle_shared::EntityId;

/// Authorization collaborator. The service consults it before touching the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LifecyclePolicy: Send + Sync {
    async fn can_soft_delete(&self, entity_id: &EntityId, user_id: &EntityId) -> bool;
    async fn can_reactivate(&self, entity_id: &EntityId, user_id: &EntityId) -> bool;
    /// Gate for deleted-record reads and counts.
    async fn can_view_deleted(&self, user_id: &EntityId) -> bool;
}

/// Grants everything. For trusted internal callers and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl LifecyclePolicy for AllowAll {
    async fn can_soft_delete(&self, _entity_id: &EntityId, _user_id: &EntityId) -> bool {
        true
    }

    async fn can_reactivate(&self, _entity_id: &EntityId, _user_id: &EntityId) -> bool {
        true
    }

    async fn can_view_deleted(&self, _user_id: &EntityId) -> bool {
        true
    }
}

/// Actor role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Owner,
    Admin,
    Member,
    Guest,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Owner => "owner",
            ActorRole::Admin => "admin",
            ActorRole::Member => "member",
            ActorRole::Guest => "guest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(ActorRole::Owner),
            "admin" => Some(ActorRole::Admin),
            "member" => Some(ActorRole::Member),
            "guest" => Some(ActorRole::Guest),
            _ => None,
        }
    }

    pub fn can_manage_lifecycle(&self) -> bool {
        matches!(self, ActorRole::Owner | ActorRole::Admin)
    }
}

impl Default for ActorRole {
    fn default() -> Self {
        ActorRole::Guest
    }
}

/// Static actor -> role table. Owners and admins may delete, reactivate and
/// audit; everyone else is denied. Unknown actors are guests.
#[derive(Debug, Clone, Default)]
pub struct RoleBasedPolicy {
    roles: HashMap<EntityId, ActorRole>,
}

impl RoleBasedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, user_id: EntityId, role: ActorRole) -> Self {
        self.roles.insert(user_id, role);
        self
    }

    pub fn role_of(&self, user_id: &EntityId) -> ActorRole {
        self.roles.get(user_id).copied().unwrap_or_default()
    }
}

#[async_trait]
impl LifecyclePolicy for RoleBasedPolicy {
    async fn can_soft_delete(&self, _entity_id: &EntityId, user_id: &EntityId) -> bool {
        self.role_of(user_id).can_manage_lifecycle()
    }

    async fn can_reactivate(&self, _entity_id: &EntityId, user_id: &EntityId) -> bool {
        self.role_of(user_id).can_manage_lifecycle()
    }

    async fn can_view_deleted(&self, user_id: &EntityId) -> bool {
        self.role_of(user_id).can_manage_lifecycle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle_shared::new_id;

    #[tokio::test]
    async fn test_role_based_policy() {
        let admin = new_id();
        let member = new_id();
        let stranger = new_id();
        let entity = new_id();

        let policy = RoleBasedPolicy::new()
            .with_role(admin, ActorRole::Admin)
            .with_role(member, ActorRole::Member);

        assert!(policy.can_soft_delete(&entity, &admin).await);
        assert!(policy.can_view_deleted(&admin).await);
        assert!(!policy.can_reactivate(&entity, &member).await);
        assert!(!policy.can_view_deleted(&stranger).await);
        assert_eq!(policy.role_of(&stranger), ActorRole::Guest);
    }
}
