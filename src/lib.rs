pub mod adapters;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod telemetry;

pub use config::{AppConfig, ConfigLoader, PricingFailurePolicy, ServiceConfig};
pub use domain::order_item::{
    Collaborators, Language, Order, OrderItem, OrderItemError, OrderItemService, OrderItemToSave,
    OrderToSave,
};
pub use metrics::OrderItemMetrics;
