//! # Lifecycle Shared
//! 
//! Shared ids, time helpers, configuration and telemetry for the lifecycle workspace.

pub mod constants;
pub mod types;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
