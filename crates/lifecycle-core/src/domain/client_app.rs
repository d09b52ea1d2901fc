// ============================================================================
// Lifecycle Core - Client App Entity
// File: crates/lifecycle-core/src/domain/client_app.rs
// Description: Client application owned by a tenant
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

use lifecycle_shared::{new_id, EntityId};

use super::lifecycle::{ChildOf, Entity, HasLifecycle, LifecycleState};

/// Application type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Web,
    Mobile,
    Desktop,
    Api,
}

impl AppType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Web => "web",
            AppType::Mobile => "mobile",
            AppType::Desktop => "desktop",
            AppType::Api => "api",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "web" => Some(AppType::Web),
            "mobile" => Some(AppType::Mobile),
            "desktop" => Some(AppType::Desktop),
            "api" => Some(AppType::Api),
            _ => None,
        }
    }
}

impl Default for AppType {
    fn default() -> Self {
        AppType::Web
    }
}

/// Client Application entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientApp {
    pub id: EntityId,
    pub tenant_id: EntityId,

    #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 3, max = 100, message = "Unique name must be between 3 and 100 characters"))]
    pub unique_name: String,

    pub type_app: AppType,

    pub lifecycle: LifecycleState,
}

impl ClientApp {
    /// Create new client application under `tenant_id`
    pub fn new(
        tenant_id: EntityId,
        name: String,
        unique_name: String,
        type_app: AppType,
        created_by: Option<EntityId>,
    ) -> Result<Self, validator::ValidationErrors> {
        let app = Self {
            id: new_id(),
            tenant_id,
            name: name.trim().to_string(),
            unique_name: unique_name.trim().to_lowercase(),
            type_app,
            lifecycle: LifecycleState::new(created_by),
        };

        app.validate()?;
        Ok(app)
    }

    pub fn rename(&mut self, name: String, renamed_by: EntityId) {
        self.name = name.trim().to_string();
        self.lifecycle.stamp_updated(renamed_by);
    }
}

impl Entity for ClientApp {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl HasLifecycle for ClientApp {
    fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut LifecycleState {
        &mut self.lifecycle
    }
}

impl ChildOf for ClientApp {
    fn parent_id(&self) -> EntityId {
        self.tenant_id
    }
}
