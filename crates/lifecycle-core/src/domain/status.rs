// ============================================================================
// Lifecycle Core - Entity Status
// File: crates/lifecycle-core/src/domain/status.rs
// Description: Two-state status machine shared by every soft-deletable record
// ============================================================================

use serde::{Deserialize, Serialize};

use lifecycle_shared::constants::{STATUS_ACTIVE, STATUS_INACTIVE};

/// Entity status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    Active,
    /// Soft-deleted. Hidden from default reads, kept for audit and reactivation.
    Inactive,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => STATUS_ACTIVE,
            EntityStatus::Inactive => STATUS_INACTIVE,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            STATUS_ACTIVE => Some(EntityStatus::Active),
            STATUS_INACTIVE => Some(EntityStatus::Inactive),
            _ => None,
        }
    }
}

impl Default for EntityStatus {
    fn default() -> Self {
        EntityStatus::Active
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_storage_names() {
        assert_eq!(EntityStatus::Active.as_str(), "ACTIVE");
        assert_eq!(EntityStatus::from_str("inactive"), Some(EntityStatus::Inactive));
        assert_eq!(EntityStatus::from_str("DELETED"), None);
    }
}
