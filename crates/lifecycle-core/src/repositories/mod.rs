//! Repository traits (ports)

pub mod scope;
pub mod soft_delete_repository;

pub use scope::StatusScope;
pub use soft_delete_repository::SoftDeleteRepository;
