//! Lifecycle errors

use thiserror::Error;

use lifecycle_shared::EntityId;

/// Discriminant of [`SoftDeleteError`], for callers that branch on the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EntityNotFound,
    EntityAlreadyDeleted,
    EntityNotDeleted,
    InsufficientPermissions,
    CascadingConstraintViolation,
    ValidationError,
    ConcurrentModification,
    /// The store could not run the statement. Never used for lifecycle conditions.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EntityNotFound => "ENTITY_NOT_FOUND",
            ErrorKind::EntityAlreadyDeleted => "ENTITY_ALREADY_DELETED",
            ErrorKind::EntityNotDeleted => "ENTITY_NOT_DELETED",
            ErrorKind::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            ErrorKind::CascadingConstraintViolation => "CASCADING_CONSTRAINT_VIOLATION",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorKind::Storage => "STORAGE",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoftDeleteError {
    #[error("{message}")]
    EntityNotFound { entity_id: EntityId, message: String },

    #[error("{message}")]
    EntityAlreadyDeleted { entity_id: EntityId, message: String },

    #[error("{message}")]
    EntityNotDeleted { entity_id: EntityId, message: String },

    #[error("{message}")]
    InsufficientPermissions { entity_id: Option<EntityId>, message: String },

    #[error("{message}")]
    CascadingConstraintViolation { entity_id: EntityId, message: String },

    #[error("{message}")]
    ValidationError { entity_id: Option<EntityId>, message: String },

    #[error("{message}")]
    ConcurrentModification { entity_id: EntityId, message: String },

    #[error("Storage error: {message}")]
    Storage { entity_id: Option<EntityId>, message: String },
}

impl SoftDeleteError {
    pub fn entity_not_found(entity_id: EntityId) -> Self {
        Self::EntityNotFound {
            entity_id,
            message: format!("Entity with ID {} not found", entity_id),
        }
    }

    pub fn entity_already_deleted(entity_id: EntityId) -> Self {
        Self::EntityAlreadyDeleted {
            entity_id,
            message: format!("Entity with ID {} is already deleted", entity_id),
        }
    }

    pub fn entity_not_deleted(entity_id: EntityId) -> Self {
        Self::EntityNotDeleted {
            entity_id,
            message: format!("Entity with ID {} is not deleted and cannot be reactivated", entity_id),
        }
    }

    pub fn insufficient_permissions(entity_id: Option<EntityId>, user_id: EntityId) -> Self {
        let message = match entity_id {
            Some(id) => format!("User {} lacks permission to perform operation on entity {}", user_id, id),
            None => format!("User {} lacks permission to perform this operation", user_id),
        };
        Self::InsufficientPermissions { entity_id, message }
    }

    pub fn cascading_constraint_violation(entity_id: EntityId, details: impl AsRef<str>) -> Self {
        Self::CascadingConstraintViolation {
            entity_id,
            message: format!(
                "Cannot delete entity {} due to cascading constraints: {}",
                entity_id,
                details.as_ref()
            ),
        }
    }

    pub fn validation(entity_id: Option<EntityId>, validation_message: impl AsRef<str>) -> Self {
        let message = match entity_id {
            Some(id) => format!("Validation failed for entity {}: {}", id, validation_message.as_ref()),
            None => format!("Validation failed: {}", validation_message.as_ref()),
        };
        Self::ValidationError { entity_id, message }
    }

    pub fn concurrent_modification(entity_id: EntityId) -> Self {
        Self::ConcurrentModification {
            entity_id,
            message: format!(
                "Entity {} was modified by another process. Please retry the operation",
                entity_id
            ),
        }
    }

    pub fn storage(entity_id: Option<EntityId>, message: impl Into<String>) -> Self {
        Self::Storage { entity_id, message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EntityNotFound { .. } => ErrorKind::EntityNotFound,
            Self::EntityAlreadyDeleted { .. } => ErrorKind::EntityAlreadyDeleted,
            Self::EntityNotDeleted { .. } => ErrorKind::EntityNotDeleted,
            Self::InsufficientPermissions { .. } => ErrorKind::InsufficientPermissions,
            Self::CascadingConstraintViolation { .. } => ErrorKind::CascadingConstraintViolation,
            Self::ValidationError { .. } => ErrorKind::ValidationError,
            Self::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Self::EntityNotFound { entity_id, .. }
            | Self::EntityAlreadyDeleted { entity_id, .. }
            | Self::EntityNotDeleted { entity_id, .. }
            | Self::CascadingConstraintViolation { entity_id, .. }
            | Self::ConcurrentModification { entity_id, .. } => Some(*entity_id),
            Self::InsufficientPermissions { entity_id, .. }
            | Self::ValidationError { entity_id, .. }
            | Self::Storage { entity_id, .. } => *entity_id,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::EntityNotFound { message, .. }
            | Self::EntityAlreadyDeleted { message, .. }
            | Self::EntityNotDeleted { message, .. }
            | Self::InsufficientPermissions { message, .. }
            | Self::CascadingConstraintViolation { message, .. }
            | Self::ValidationError { message, .. }
            | Self::ConcurrentModification { message, .. }
            | Self::Storage { message, .. } => message,
        }
    }
}
