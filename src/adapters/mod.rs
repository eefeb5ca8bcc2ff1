mod memory;

pub use memory::{
    FixedPricing, InMemoryOrderItemProvider, PrecisionCurrencyService, StaticCatalog,
    DEFAULT_CURRENCY_PRECISION,
};
