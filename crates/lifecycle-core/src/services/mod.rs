//! Domain services (business logic)

pub mod soft_delete_service;

pub use soft_delete_service::SoftDeleteService;
