use std::sync::Arc;

use order_item_service::adapters::{
    FixedPricing, InMemoryOrderItemProvider, PrecisionCurrencyService, StaticCatalog,
};
use order_item_service::domain::order_item::{
    OrderItemProvider, OrderItemToSave, OrderToSave, PricePair, ShippingAddress,
};
use order_item_service::telemetry::init_tracing;
use order_item_service::{Collaborators, ConfigLoader, Order, OrderItemMetrics, OrderItemService};

const DEMO_CATALOG: &str = r#"[
    {
        "good_price_id": 100,
        "good_id": 7,
        "catalog_num": "ABC123",
        "site_id": 1,
        "delivery_id": 2,
        "name_en": "Widget",
        "name_ru": "",
        "manufacturer": "Acme"
    },
    {
        "good_price_id": 200,
        "good_id": 8,
        "catalog_num": "XY-9",
        "site_id": 1,
        "delivery_id": 2,
        "name_en": "Bolt",
        "name_ru": "Болт",
        "manufacturer": "Bosch",
        "attributes": [{ "name": "size", "value": "M8" }]
    }
]"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging comes up first so configuration loading is visible,
    // then switches to the configured filter. RUST_LOG overrides both.
    // Example: RUST_LOG=debug cargo run
    let log_handle = init_tracing()?;
    let config = ConfigLoader::new().load()?;
    log_handle.apply_config(&config.logging)?;

    tracing::info!(
        pricing_failure = ?config.service.pricing_failure,
        language = %config.service.default_language,
        "Starting order item service demo"
    );

    // === 1. Wire in-memory collaborators ===
    let items = Arc::new(InMemoryOrderItemProvider::new());
    let catalog = Arc::new(StaticCatalog::from_json(DEMO_CATALOG)?);
    let pricing = FixedPricing::new()
        .with_price(100, PricePair::new(19.99, 24.99))
        .with_price(200, PricePair::new(1.5, 2.0));

    let collaborators = Collaborators {
        order_item_provider: items.clone(),
        search_provider: catalog.clone(),
        good_attribute_service: catalog.clone(),
        pricing_service: Arc::new(pricing),
        good_provider: catalog,
        currency_service: Arc::new(PrecisionCurrencyService::new()),
    };

    let metrics = Arc::new(OrderItemMetrics::new()?);
    let service = OrderItemService::new(collaborators, config.service.clone(), metrics.clone());

    // === 2. Add lines to an order ===
    let order = Order {
        id: 500,
        seq_id: 9001,
        currency_id: 1,
        customer_id: 42,
        status_id: 1,
        shipping_address: Some(ShippingAddress { region_id: 77 }),
    };
    let lang = config.service.default_language;

    let widget_id = service.add_item_to_order(&order, 100, 3, 19.99, lang).await?;
    let bolt_id = service.add_item_to_order(&order, 200, 10, 1.5, lang).await?;

    // Missing catalog data is reported, not fatal for the demo
    if let Err(e) = service.add_item_to_order(&order, 404, 1, 1.0, lang).await {
        tracing::warn!(error = %e, "Expected failure for unknown good price");
    }

    // === 3. Partially cancel the widget line ===
    let widget_update = OrderItemToSave {
        id: Some(widget_id),
        status_id: 2,
        price: 18.5,
        quantity: 2,
        replacement_good_id: None,
        weight_calc: Some(0.75),
        canceled: false,
    };
    let order_to_save = OrderToSave {
        id: Some(order.id),
        status_id: 2,
        currency_id: order.currency_id,
    };
    service.update_item(&widget_update, &order_to_save).await?;

    // === 4. Count the total with the bolt line canceled ===
    let bolt_line = OrderItemToSave {
        id: Some(bolt_id),
        status_id: 2,
        price: 1.5,
        quantity: 10,
        canceled: true,
        ..Default::default()
    };
    let total = service
        .count_total_by_save_item_list(&[widget_update, bolt_line], order.currency_id)
        .await?;
    tracing::info!(order_id = order.id, total, "Order total");

    for id in [widget_id, bolt_id] {
        if let Some(item) = items.find_order_item_by_id(id).await? {
            tracing::info!(
                item_id = id,
                name = %item.name,
                price = item.price,
                quantity_init = item.quantity_init,
                quantity_final = item.quantity_final,
                "Stored order item"
            );
        }
    }

    // === 5. Dump metrics ===
    println!("{}", metrics.render()?);

    Ok(())
}
