//! # Lifecycle Core - Domain Module
//! 
//! Lifecycle state, capability traits and the domain records that embed them.

pub mod status;
pub mod lifecycle;
pub mod tenant;
pub mod client_app;

pub use status::EntityStatus;
pub use lifecycle::{ChildOf, Entity, HasLifecycle, LifecycleState, SoftDeletable};
pub use tenant::{Tenant, SubscriptionPlan};
pub use client_app::{ClientApp, AppType};
