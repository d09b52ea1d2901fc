//! # Lifecycle Core
//! 
//! Soft-delete lifecycle model, error taxonomy, repository port and lifecycle service.

pub mod domain;
pub mod error;
pub mod policy;
pub mod repositories;
pub mod services;

// Re-export domain entities
pub use domain::*;
pub use error::{ErrorKind, SoftDeleteError};
