//! Status scopes every read is generated from.

use crate::domain::{EntityStatus, HasLifecycle};

/// Which lifecycle states a read may return. Default reads use [`StatusScope::Active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusScope {
    #[default]
    Active,
    Deleted,
    /// Bypasses status filtering; audit and recovery tooling only.
    All,
}

impl StatusScope {
    /// The status a row must carry, `None` for [`StatusScope::All`].
    pub fn required_status(&self) -> Option<EntityStatus> {
        match self {
            StatusScope::Active => Some(EntityStatus::Active),
            StatusScope::Deleted => Some(EntityStatus::Inactive),
            StatusScope::All => None,
        }
    }

    pub fn admits<T: HasLifecycle + ?Sized>(&self, entity: &T) -> bool {
        self.required_status()
            .map_or(true, |status| entity.status() == status)
    }
}
