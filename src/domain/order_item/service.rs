use std::sync::Arc;

use crate::config::{PricingFailurePolicy, ServiceConfig};
use crate::metrics::OrderItemMetrics;

use super::commands::{OrderItemToSave, OrderToSave};
use super::errors::{OrderItemError, Result};
use super::naming::{compose_item_name, good_name};
use super::ports::{
    CurrencyService, GoodAttributeService, GoodProvider, OrderItemProvider, PricingService,
    SearchProvider,
};
use super::value_objects::{GoodPriceData, Language, Order, OrderItem, PricePair};

// ============================================================================
// Order Item Service
// ============================================================================
//
// Orchestrates: catalog lookup → pricing → naming → OrderItem → provider
//
// ============================================================================

/// The services an `OrderItemService` delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub order_item_provider: Arc<dyn OrderItemProvider>,
    pub search_provider: Arc<dyn SearchProvider>,
    pub good_attribute_service: Arc<dyn GoodAttributeService>,
    pub pricing_service: Arc<dyn PricingService>,
    pub good_provider: Arc<dyn GoodProvider>,
    pub currency_service: Arc<dyn CurrencyService>,
}

pub struct OrderItemService {
    collaborators: Collaborators,
    config: ServiceConfig,
    metrics: Arc<OrderItemMetrics>,
}

impl OrderItemService {
    pub fn new(
        collaborators: Collaborators,
        config: ServiceConfig,
        metrics: Arc<OrderItemMetrics>,
    ) -> Self {
        Self {
            collaborators,
            config,
            metrics,
        }
    }

    pub fn order_item_provider(&self) -> &Arc<dyn OrderItemProvider> {
        &self.collaborators.order_item_provider
    }

    pub fn search_provider(&self) -> &Arc<dyn SearchProvider> {
        &self.collaborators.search_provider
    }

    pub fn good_attribute_service(&self) -> &Arc<dyn GoodAttributeService> {
        &self.collaborators.good_attribute_service
    }

    pub fn pricing_service(&self) -> &Arc<dyn PricingService> {
        &self.collaborators.pricing_service
    }

    pub fn good_provider(&self) -> &Arc<dyn GoodProvider> {
        &self.collaborators.good_provider
    }

    pub fn currency_service(&self) -> &Arc<dyn CurrencyService> {
        &self.collaborators.currency_service
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<OrderItemMetrics> {
        &self.metrics
    }

    /// Add a new line to `order` at the caller-supplied `price`.
    ///
    /// The catalog price is not checked against `price`. Every call creates a
    /// new item; returns the id the provider assigned.
    #[tracing::instrument(skip(self, order), fields(order_id = order.id))]
    pub async fn add_item_to_order(
        &self,
        order: &Order,
        good_price_id: i64,
        quantity: i32,
        price: f64,
        lang: Language,
    ) -> Result<i64> {
        let result = self.try_add_item(order, good_price_id, quantity, price, lang).await;
        self.observe("add_item_to_order", &result);
        result
    }

    async fn try_add_item(
        &self,
        order: &Order,
        good_price_id: i64,
        quantity: i32,
        price: f64,
        lang: Language,
    ) -> Result<i64> {
        let item = OrderItem {
            price,
            ..self.build_order_item_by_good_price_id(order, good_price_id, quantity, lang).await?
        };

        let id = self.order_item_provider().create_new_order_item(item).await?;
        self.metrics.items_created.inc();

        tracing::info!(order_id = order.id, item_id = id, good_price_id, "Order item created");
        Ok(id)
    }

    /// Build, but do not persist, an order line for `good_price_id`.
    #[tracing::instrument(skip(self, order), fields(order_id = order.id))]
    pub async fn build_order_item_by_good_price_id(
        &self,
        order: &Order,
        good_price_id: i64,
        quantity: i32,
        lang: Language,
    ) -> Result<OrderItem> {
        let data = self
            .search_provider()
            .get_detail_goods_prices_data(&[good_price_id], lang)
            .await?
            .into_iter()
            .next()
            .ok_or(OrderItemError::GoodPriceNotFound(good_price_id))?;

        let prices = self.resolve_prices(order, good_price_id).await?;
        let name = self.item_name(&data, lang).await?;

        Ok(OrderItem {
            id: None,
            good_id: data.good_id,
            part_number: data.catalog_num,
            name,
            price: prices.price,
            price_no_discount: prices.price_without_discount,
            site_id: data.site_id,
            customer_id: order.customer_id,
            quantity_init: quantity,
            quantity_final: quantity,
            delivery_id: data.delivery_id,
            order_id: order.id,
            order_seq_id: order.seq_id,
            status_id: order.status_id,
            good_price_id,
            replacement_good_id: None,
            calc_weight: None,
        })
    }

    async fn resolve_prices(&self, order: &Order, good_price_id: i64) -> Result<PricePair> {
        let result = self
            .pricing_service()
            .get_goods_prices_with_discounts(
                &[good_price_id],
                order.currency_id,
                order.customer_id,
                order.region_id(),
            )
            .await
            .and_then(|prices| {
                prices
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("No prices returned for good price {}", good_price_id))
            });

        match result {
            Ok(prices) => Ok(prices),
            Err(e) => match self.config.pricing_failure {
                PricingFailurePolicy::Zero => {
                    tracing::warn!(
                        order_id = order.id,
                        good_price_id,
                        error = %e,
                        "Pricing failed, item priced at zero"
                    );
                    self.metrics.pricing_fallbacks.inc();
                    Ok(PricePair::zero())
                }
                PricingFailurePolicy::Reject => Err(OrderItemError::Pricing(e)),
            },
        }
    }

    async fn item_name(&self, data: &GoodPriceData, lang: Language) -> Result<String> {
        let attributes = self
            .good_attribute_service()
            .get_attributes(data.good_id, lang)
            .await?;

        let title_en = good_name(&data.name_en, &attributes);
        let title_ru = good_name(&data.name_ru, &attributes);
        let title = if lang == Language::Ru && !title_ru.is_empty() {
            title_ru
        } else {
            title_en
        };

        let manufacturer = self
            .good_provider()
            .get_good_manufacturer_name_by_id(data.good_id)
            .await?;

        Ok(compose_item_name(&manufacturer, &data.catalog_num, &title))
    }

    /// Apply the requested changes to an existing line.
    ///
    /// Only status, price, final quantity, replacement good and calculated
    /// weight are taken from `item_to_save`; everything else is kept.
    #[tracing::instrument(skip_all, fields(item_id = ?item_to_save.id, order_id = ?order_to_save.id))]
    pub async fn update_item(
        &self,
        item_to_save: &OrderItemToSave,
        order_to_save: &OrderToSave,
    ) -> Result<()> {
        let result = self.try_update_item(item_to_save).await;
        self.observe("update_item", &result);
        result
    }

    async fn try_update_item(&self, item_to_save: &OrderItemToSave) -> Result<()> {
        let id = item_to_save.valid_id().ok_or(OrderItemError::MissingId)?;

        let current = self
            .order_item_provider()
            .find_order_item_by_id(id)
            .await?
            .ok_or(OrderItemError::NotFound(id))?;

        let updated = Self::item_for_update(item_to_save, current);
        self.order_item_provider().update_item(updated).await?;
        self.metrics.items_updated.inc();

        tracing::info!(item_id = id, "Order item updated");
        Ok(())
    }

    fn item_for_update(item_to_save: &OrderItemToSave, current: OrderItem) -> OrderItem {
        OrderItem {
            status_id: item_to_save.status_id,
            price: item_to_save.price,
            quantity_final: item_to_save.quantity,
            replacement_good_id: item_to_save.replacement_good_id,
            calc_weight: item_to_save.weight_calc,
            ..current
        }
    }

    /// Currency-rounded sum of price × quantity over the non-canceled lines.
    #[tracing::instrument(skip(self, save_item_list), fields(lines = save_item_list.len()))]
    pub async fn count_total_by_save_item_list(
        &self,
        save_item_list: &[OrderItemToSave],
        currency_id: i64,
    ) -> Result<f64> {
        let result = self.try_count_total(save_item_list, currency_id).await;
        self.observe("count_total_by_save_item_list", &result);
        result
    }

    async fn try_count_total(&self, save_item_list: &[OrderItemToSave], currency_id: i64) -> Result<f64> {
        if save_item_list.is_empty() {
            return Ok(0.0);
        }

        let total: f64 = save_item_list.iter().map(OrderItemToSave::line_total).sum();

        let rounded = self
            .currency_service()
            .round_currency(total, currency_id)
            .await?;

        tracing::debug!(currency_id, total, rounded, "Counted order total");
        Ok(rounded)
    }

    fn observe<T>(&self, operation: &str, result: &Result<T>) {
        if let Err(e) = result {
            tracing::error!(operation, error = %e, "Order item operation failed");
            self.metrics.record_failure(operation, e.reason());
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
