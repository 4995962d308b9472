use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::marketplace_models::{OrderSummary, ProductSummary, UserProfile};
use crate::error::Result;

/// Read-only lookups into the marketplace tables the messaging core does
/// not own: user profiles for participant checks and display snapshots,
/// products and orders for conversation context.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserProfile>>;
    async fn find_product(&self, id: Uuid) -> Result<Option<ProductSummary>>;
    async fn find_order(&self, id: Uuid) -> Result<Option<OrderSummary>>;
}

#[derive(Clone)]
pub struct PgMarketplaceStore {
    pool: PgPool,
}

impl PgMarketplaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarketplaceStore for PgMarketplaceStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let user = sqlx::query_as::<_, UserProfile>(
            "SELECT id, username, avatar_url, role, is_active FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductSummary>> {
        let product = sqlx::query_as::<_, ProductSummary>(
            "SELECT id, vendor_id, title, thumbnail_url FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderSummary>> {
        let order = sqlx::query_as::<_, OrderSummary>(
            "SELECT id, buyer_id, vendor_id, order_number FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}
