use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::order_item::{
    CurrencyService, GoodAttribute, GoodAttributeService, GoodPriceData, GoodProvider, Language,
    OrderItem, OrderItemProvider, PricePair, PricingService, SearchProvider,
};

// ============================================================================
// In-Memory Adapters
// ============================================================================
//
// Collaborator implementations backed by plain maps. Used by the demo binary
// and by tests; none of them persist anything beyond the process.
//
// ============================================================================

/// Order item store with sequential ids starting at 1.
pub struct InMemoryOrderItemProvider {
    items: RwLock<HashMap<i64, OrderItem>>,
    next_id: AtomicI64,
}

impl InMemoryOrderItemProvider {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl Default for InMemoryOrderItemProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderItemProvider for InMemoryOrderItemProvider {
    async fn create_new_order_item(&self, mut item: OrderItem) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        item.id = Some(id);
        self.items.write().await.insert(id, item);

        tracing::debug!(item_id = id, "Stored order item");
        Ok(id)
    }

    async fn find_order_item_by_id(&self, id: i64) -> Result<Option<OrderItem>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn update_item(&self, item: OrderItem) -> Result<()> {
        let Some(id) = item.id else {
            bail!("Cannot update order item without id");
        };

        let mut items = self.items.write().await;
        match items.get_mut(&id) {
            Some(stored) => {
                *stored = item;
                Ok(())
            }
            None => bail!("Order item does not exist: {}", id),
        }
    }
}

/// Catalog seeded up front: search records, attributes and manufacturers.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    goods_prices: HashMap<i64, GoodPriceData>,
    attributes: HashMap<i64, Vec<GoodAttribute>>,
    manufacturers: HashMap<i64, String>,
}

/// Search record keyed by its good price id, as stored in catalog fixtures.
#[derive(Debug, serde::Deserialize)]
struct CatalogRecord {
    good_price_id: i64,
    #[serde(flatten)]
    data: GoodPriceData,
    #[serde(default)]
    manufacturer: Option<String>,
    #[serde(default)]
    attributes: Vec<GoodAttribute>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a JSON array of search records, each carrying `good_price_id`
    /// and optionally `manufacturer` and `attributes`.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)?;

        let mut catalog = Self::new();
        for record in records {
            let good_id = record.data.good_id;
            if let Some(manufacturer) = record.manufacturer {
                catalog.manufacturers.insert(good_id, manufacturer);
            }
            if !record.attributes.is_empty() {
                catalog.attributes.insert(good_id, record.attributes);
            }
            catalog.goods_prices.insert(record.good_price_id, record.data);
        }
        Ok(catalog)
    }

    pub fn with_good_price(mut self, good_price_id: i64, data: GoodPriceData) -> Self {
        self.goods_prices.insert(good_price_id, data);
        self
    }

    pub fn with_attributes(mut self, good_id: i64, attributes: Vec<GoodAttribute>) -> Self {
        self.attributes.insert(good_id, attributes);
        self
    }

    pub fn with_manufacturer(mut self, good_id: i64, name: impl Into<String>) -> Self {
        self.manufacturers.insert(good_id, name.into());
        self
    }
}

#[async_trait]
impl SearchProvider for StaticCatalog {
    async fn get_detail_goods_prices_data(
        &self,
        good_price_ids: &[i64],
        _lang: Language,
    ) -> Result<Vec<GoodPriceData>> {
        Ok(good_price_ids
            .iter()
            .filter_map(|id| self.goods_prices.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl GoodAttributeService for StaticCatalog {
    async fn get_attributes(&self, good_id: i64, _lang: Language) -> Result<Vec<GoodAttribute>> {
        Ok(self.attributes.get(&good_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl GoodProvider for StaticCatalog {
    async fn get_good_manufacturer_name_by_id(&self, good_id: i64) -> Result<String> {
        match self.manufacturers.get(&good_id) {
            Some(name) => Ok(name.clone()),
            None => bail!("Unknown manufacturer for good {}", good_id),
        }
    }
}

/// Price table by good price id. Ignores currency, customer and region.
#[derive(Debug, Clone, Default)]
pub struct FixedPricing {
    prices: HashMap<i64, PricePair>,
}

impl FixedPricing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, good_price_id: i64, prices: PricePair) -> Self {
        self.prices.insert(good_price_id, prices);
        self
    }
}

#[async_trait]
impl PricingService for FixedPricing {
    async fn get_goods_prices_with_discounts(
        &self,
        good_price_ids: &[i64],
        _currency_id: i64,
        _customer_id: i64,
        _region_id: i64,
    ) -> Result<Vec<PricePair>> {
        good_price_ids
            .iter()
            .map(|id| match self.prices.get(id) {
                Some(prices) => Ok(*prices),
                None => bail!("No price for good price {}", id),
            })
            .collect()
    }
}

pub const DEFAULT_CURRENCY_PRECISION: u32 = 2;

/// Rounds half away from zero to the number of decimals configured per currency.
///
/// Ties are judged on the decimal value as written (1.005 → 1.01), not on its
/// binary approximation.
#[derive(Debug, Clone, Default)]
pub struct PrecisionCurrencyService {
    precision: HashMap<i64, u32>,
}

impl PrecisionCurrencyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, currency_id: i64, decimals: u32) -> Self {
        self.precision.insert(currency_id, decimals);
        self
    }

    fn decimals(&self, currency_id: i64) -> u32 {
        self.precision
            .get(&currency_id)
            .copied()
            .unwrap_or(DEFAULT_CURRENCY_PRECISION)
    }
}

#[async_trait]
impl CurrencyService for PrecisionCurrencyService {
    async fn round_currency(&self, amount: f64, currency_id: i64) -> Result<f64> {
        if !amount.is_finite() {
            bail!("Cannot round non-finite amount: {}", amount);
        }
        let factor = 10f64.powi(self.decimals(currency_id) as i32);
        Ok(pre_round(amount * factor).round() / factor)
    }
}

/// Significant digits kept before the final rounding step.
const PRE_ROUND_DIGITS: i32 = 15;

/// Drop binary noise below 15 significant digits, so a decimal tie such as
/// 100.49999999999999 (1.005 × 100) is rounded as the 100.5 it was written as.
fn pre_round(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let digits = (PRE_ROUND_DIGITS - 1 - magnitude).clamp(0, PRE_ROUND_DIGITS);
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> OrderItem {
        OrderItem {
            good_id: 7,
            part_number: "ABC123".to_string(),
            quantity_init: 2,
            quantity_final: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_provider_assigns_sequential_ids() {
        let provider = InMemoryOrderItemProvider::new();

        let first = provider.create_new_order_item(item()).await.unwrap();
        let second = provider.create_new_order_item(item()).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(provider.len().await, 2);

        let stored = provider.find_order_item_by_id(first).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(1));
    }

    #[tokio::test]
    async fn test_provider_update_replaces_item() {
        let provider = InMemoryOrderItemProvider::new();
        let id = provider.create_new_order_item(item()).await.unwrap();

        let mut updated = provider.find_order_item_by_id(id).await.unwrap().unwrap();
        updated.quantity_final = 1;
        provider.update_item(updated).await.unwrap();

        let stored = provider.find_order_item_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.quantity_final, 1);
        assert_eq!(stored.quantity_init, 2);
    }

    #[tokio::test]
    async fn test_provider_update_unknown_item_fails() {
        let provider = InMemoryOrderItemProvider::new();

        assert!(provider.update_item(item()).await.is_err());

        let unknown = OrderItem { id: Some(9), ..item() };
        assert!(provider.update_item(unknown).await.is_err());
        assert!(provider.is_empty().await);
    }

    #[tokio::test]
    async fn test_catalog_from_json() {
        let json = r#"[
            {
                "good_price_id": 100,
                "good_id": 7,
                "catalog_num": "ABC123",
                "site_id": 1,
                "delivery_id": 2,
                "name_en": "Widget",
                "name_ru": "",
                "manufacturer": "Acme",
                "attributes": [{"name": "color", "value": "Red"}]
            }
        ]"#;

        let catalog = StaticCatalog::from_json(json).unwrap();

        let data = catalog
            .get_detail_goods_prices_data(&[100, 101], Language::En)
            .await
            .unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].catalog_num, "ABC123");

        let attributes = catalog.get_attributes(7, Language::En).await.unwrap();
        assert_eq!(attributes, vec![GoodAttribute::new("color", "Red")]);

        let manufacturer = catalog.get_good_manufacturer_name_by_id(7).await.unwrap();
        assert_eq!(manufacturer, "Acme");
    }

    #[tokio::test]
    async fn test_catalog_unknown_good() {
        let catalog = StaticCatalog::new();
        assert!(catalog.get_attributes(1, Language::Ru).await.unwrap().is_empty());
        assert!(catalog.get_good_manufacturer_name_by_id(1).await.is_err());
    }

    #[tokio::test]
    async fn test_fixed_pricing() {
        let pricing = FixedPricing::new().with_price(100, PricePair::new(19.99, 24.99));

        let prices = pricing
            .get_goods_prices_with_discounts(&[100], 1, 42, 0)
            .await
            .unwrap();
        assert_eq!(prices, vec![PricePair::new(19.99, 24.99)]);

        assert!(pricing
            .get_goods_prices_with_discounts(&[100, 5], 1, 42, 0)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_currency_rounding() {
        let currency = PrecisionCurrencyService::new().with_precision(2, 0);

        assert_eq!(currency.round_currency(10.125, 1).await.unwrap(), 10.13);
        assert_eq!(currency.round_currency(-2.5, 2).await.unwrap(), -3.0);
        assert_eq!(currency.round_currency(99.4, 2).await.unwrap(), 99.0);
        assert!(currency.round_currency(f64::NAN, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_currency_rounding_of_decimal_ties() {
        let currency = PrecisionCurrencyService::new();

        assert_eq!(currency.round_currency(1.005, 1).await.unwrap(), 1.01);
        assert_eq!(currency.round_currency(0.285, 1).await.unwrap(), 0.29);
        assert_eq!(currency.round_currency(2.675, 1).await.unwrap(), 2.68);
        assert_eq!(currency.round_currency(-1.005, 1).await.unwrap(), -1.01);
        assert_eq!(currency.round_currency(1.0049, 1).await.unwrap(), 1.0);
        assert_eq!(currency.round_currency(0.0, 1).await.unwrap(), 0.0);
    }

    #[test]
    fn test_pre_round_keeps_exact_values() {
        assert_eq!(pre_round(100.5), 100.5);
        assert_eq!(pre_round(-2.5), -2.5);
        assert_eq!(pre_round(1.0e20), 1.0e20);
    }
}
