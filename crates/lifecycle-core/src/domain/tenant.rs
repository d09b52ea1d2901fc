// ============================================================================
// Lifecycle Core - Tenant Entity
// File: crates/lifecycle-core/src/domain/tenant.rs
// Description: Tenant record with embedded lifecycle state
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

use lifecycle_shared::{new_id, EntityId};

use super::lifecycle::{Entity, HasLifecycle, LifecycleState};

/// Subscription plan enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    Free,
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Basic => "basic",
            SubscriptionPlan::Premium => "premium",
            SubscriptionPlan::Enterprise => "enterprise",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(SubscriptionPlan::Free),
            "basic" => Some(SubscriptionPlan::Basic),
            "premium" => Some(SubscriptionPlan::Premium),
            "enterprise" => Some(SubscriptionPlan::Enterprise),
            _ => None,
        }
    }
}

impl Default for SubscriptionPlan {
    fn default() -> Self {
        SubscriptionPlan::Free
    }
}

/// Tenant entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tenant {
    pub id: EntityId,

    #[validate(length(min = 2, max = 100, message = "Tenant name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 100, message = "Slug must be between 2 and 100 characters"))]
    pub slug: String,

    #[validate(range(min = 1, max = 10000, message = "Max users must be between 1 and 10000"))]
    pub max_users: i32,

    pub subscription_plan: SubscriptionPlan,

    pub lifecycle: LifecycleState,
}

impl Tenant {
    pub fn new(
        name: String,
        slug: String,
        max_users: i32,
        subscription_plan: SubscriptionPlan,
        created_by: Option<EntityId>,
    ) -> Result<Self, validator::ValidationErrors> {
        let tenant = Self {
            id: new_id(),
            name: name.trim().to_string(),
            slug: slug.trim().to_lowercase(),
            max_users,
            subscription_plan,
            lifecycle: LifecycleState::new(created_by),
        };

        tenant.validate()?;
        Ok(tenant)
    }

    pub fn change_plan(&mut self, plan: SubscriptionPlan, max_users: i32, modified_by: EntityId) {
        self.subscription_plan = plan;
        self.max_users = max_users;
        self.lifecycle.stamp_updated(modified_by);
    }
}

impl Entity for Tenant {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl HasLifecycle for Tenant {
    fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut LifecycleState {
        &mut self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tenant() {
        let tenant = Tenant::new(
            " Acme Corp ".to_string(),
            "Acme".to_string(),
            100,
            SubscriptionPlan::Basic,
            None,
        )
        .unwrap();

        assert_eq!(tenant.name, "Acme Corp");
        assert_eq!(tenant.slug, "acme");
        assert!(tenant.is_active());
    }

    #[test]
    fn test_invalid_max_users() {
        let tenant = Tenant::new("Test".to_string(), "test".to_string(), 0, SubscriptionPlan::Free, None);
        assert!(tenant.is_err());
    }

    #[test]
    fn test_change_plan_stamps_update() {
        let mut tenant =
            Tenant::new("Test".to_string(), "test".to_string(), 10, SubscriptionPlan::Free, None).unwrap();
        let admin = new_id();

        tenant.change_plan(SubscriptionPlan::Premium, 500, admin);

        assert_eq!(tenant.subscription_plan, SubscriptionPlan::Premium);
        assert_eq!(tenant.lifecycle.updated_by(), Some(admin));
        assert!(tenant.lifecycle.updated_at() > tenant.lifecycle.created_at());
    }
}
