//! Authorization and dependency ports consulted before every lifecycle mutation

pub mod authorization;
pub mod dependency;

pub use authorization::{ActorRole, AllowAll, LifecyclePolicy, RoleBasedPolicy};
pub use dependency::{DependencyGuard, NoDependents};

#[cfg(test)]
pub use authorization::MockLifecyclePolicy;
#[cfg(test)]
pub use dependency::MockDependencyGuard;
