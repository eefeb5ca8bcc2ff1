use anyhow::Result;
use async_trait::async_trait;

use super::value_objects::{GoodAttribute, GoodPriceData, Language, OrderItem, PricePair};

// ============================================================================
// Collaborator Ports
// ============================================================================
//
// Everything the order item service needs from the rest of the system.
// Implementations live outside the domain (see src/adapters/).
//
// ============================================================================

/// Persistence of order items. The only writer of durable item state.
#[async_trait]
pub trait OrderItemProvider: Send + Sync {
    /// Store a new item and return the id assigned to it
    async fn create_new_order_item(&self, item: OrderItem) -> Result<i64>;

    async fn find_order_item_by_id(&self, id: i64) -> Result<Option<OrderItem>>;

    async fn update_item(&self, item: OrderItem) -> Result<()>;
}

/// Catalog read model.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn get_detail_goods_prices_data(
        &self,
        good_price_ids: &[i64],
        lang: Language,
    ) -> Result<Vec<GoodPriceData>>;
}

#[async_trait]
pub trait PricingService: Send + Sync {
    /// One `PricePair` per requested id, in request order
    async fn get_goods_prices_with_discounts(
        &self,
        good_price_ids: &[i64],
        currency_id: i64,
        customer_id: i64,
        region_id: i64,
    ) -> Result<Vec<PricePair>>;
}

#[async_trait]
pub trait GoodAttributeService: Send + Sync {
    async fn get_attributes(&self, good_id: i64, lang: Language) -> Result<Vec<GoodAttribute>>;
}

#[async_trait]
pub trait GoodProvider: Send + Sync {
    async fn get_good_manufacturer_name_by_id(&self, good_id: i64) -> Result<String>;
}

#[async_trait]
pub trait CurrencyService: Send + Sync {
    async fn round_currency(&self, amount: f64, currency_id: i64) -> Result<f64>;
}
