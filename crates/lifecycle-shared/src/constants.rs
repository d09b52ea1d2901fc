//! Workspace-wide constants

/// Upper bound on ids accepted by one bulk lifecycle call.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_INACTIVE: &str = "INACTIVE";

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 3;
