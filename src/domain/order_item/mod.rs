// ============================================================================
// Order Item Domain - Business Logic for Order Lines
// ============================================================================
//
// This module contains ALL order-item-specific code:
// - Value objects (Order, OrderItem, Language, catalog and price records)
// - Input DTOs (OrderItemToSave, OrderToSave)
// - Errors (OrderItemError enum)
// - Naming rules for order line display names
// - Ports (collaborator traits)
// - Service (OrderItemService)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod naming;
pub mod ports;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use ports::*;
pub use service::*;
