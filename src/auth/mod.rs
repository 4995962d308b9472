pub mod auth_models;
pub mod auth_repository;

pub use auth_models::SessionIdentity;
pub use auth_repository::SessionRepository;
