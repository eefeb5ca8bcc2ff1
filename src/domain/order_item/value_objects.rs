use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order Item Value Objects
// ============================================================================

/// Locale used for catalog lookups and display names.
///
/// `En` is the fallback locale: whenever a Russian title cannot be produced
/// the English one is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            other => anyhow::bail!("Unsupported language: {}", other),
        }
    }
}

/// Shipping address of an order. Only the region matters for pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub region_id: i64,
}

/// Order aggregate as seen by the item service (referenced, not owned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub seq_id: i64,
    pub currency_id: i64,
    pub customer_id: i64,
    pub status_id: i64,
    pub shipping_address: Option<ShippingAddress>,
}

impl Order {
    /// Region used for pricing; orders without a shipping address price in region 0.
    pub fn region_id(&self) -> i64 {
        self.shipping_address
            .as_ref()
            .map(|address| address.region_id)
            .unwrap_or(0)
    }
}

/// One line of an order.
///
/// `quantity_init` is fixed when the item is built, updates only ever touch
/// `quantity_final`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Option<i64>,
    pub good_id: i64,
    pub part_number: String,
    pub name: String,
    pub price: f64,
    pub price_no_discount: f64,
    pub site_id: i64,
    pub customer_id: i64,
    pub quantity_init: i32,
    pub quantity_final: i32,
    pub delivery_id: i64,
    pub order_id: i64,
    pub order_seq_id: i64,
    pub status_id: i64,
    pub good_price_id: i64,
    pub replacement_good_id: Option<i64>,
    pub calc_weight: Option<f64>,
}

/// Detail record of the search read model for one good price id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodPriceData {
    pub good_id: i64,
    pub catalog_num: String,
    pub site_id: i64,
    pub delivery_id: i64,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_ru: String,
}

/// Unit prices for a good price id after and before discounts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricePair {
    pub price: f64,
    pub price_without_discount: f64,
}

impl PricePair {
    pub fn new(price: f64, price_without_discount: f64) -> Self {
        Self { price, price_without_discount }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodAttribute {
    pub name: String,
    pub value: String,
}

impl GoodAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("ru".parse::<Language>().unwrap(), Language::Ru);
        assert_eq!(" EN ".parse::<Language>().unwrap(), Language::En);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serialization() {
        assert_eq!(serde_json::to_string(&Language::Ru).unwrap(), "\"ru\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }

    #[test]
    fn test_region_defaults_to_zero_without_shipping_address() {
        let mut order = Order {
            id: 1,
            seq_id: 10,
            currency_id: 1,
            customer_id: 42,
            status_id: 3,
            shipping_address: None,
        };
        assert_eq!(order.region_id(), 0);

        order.shipping_address = Some(ShippingAddress { region_id: 77 });
        assert_eq!(order.region_id(), 77);
    }

    #[test]
    fn test_good_price_data_from_search_record() {
        let json = r#"{
            "good_id": 7,
            "catalog_num": "ABC123",
            "site_id": 1,
            "delivery_id": 2,
            "name_en": "Widget"
        }"#;

        let data: GoodPriceData = serde_json::from_str(json).unwrap();
        assert_eq!(data.good_id, 7);
        assert_eq!(data.catalog_num, "ABC123");
        assert_eq!(data.name_en, "Widget");
        assert_eq!(data.name_ru, "");
    }
}
