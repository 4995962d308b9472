pub mod marketplace_models;
pub mod marketplace_repository;

pub use marketplace_models::{OrderSummary, ProductSummary, UserProfile, UserRole};
pub use marketplace_repository::{MarketplaceStore, PgMarketplaceStore};
