//! In-memory adapters

pub mod guard;
pub mod repository;

pub use guard::ActiveChildrenGuard;
pub use repository::InMemorySoftDeleteRepository;
