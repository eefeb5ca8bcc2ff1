use serde::{Deserialize, Serialize};

// ============================================================================
// Order Item Input DTOs - Represent the changes a caller asks for
// ============================================================================

/// Changes requested for one order line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderItemToSave {
    pub id: Option<i64>,
    pub status_id: i64,
    pub price: f64,
    pub quantity: i32,
    pub replacement_good_id: Option<i64>,
    pub weight_calc: Option<f64>,
    #[serde(default)]
    pub canceled: bool,
}

impl OrderItemToSave {
    /// Id of the line to update. Absent and non-positive ids both count as "no id".
    pub fn valid_id(&self) -> Option<i64> {
        self.id.filter(|id| *id > 0)
    }

    /// Contribution of this line to the order total. Canceled lines contribute nothing.
    pub fn line_total(&self) -> f64 {
        if self.canceled {
            0.0
        } else {
            self.price * f64::from(self.quantity)
        }
    }
}

/// Order header accompanying an item update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderToSave {
    pub id: Option<i64>,
    pub status_id: i64,
    pub currency_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_id_rejects_missing_and_zero() {
        let mut item = OrderItemToSave::default();
        assert_eq!(item.valid_id(), None);

        item.id = Some(0);
        assert_eq!(item.valid_id(), None);

        item.id = Some(15);
        assert_eq!(item.valid_id(), Some(15));
    }

    #[test]
    fn test_canceled_line_contributes_nothing() {
        let item = OrderItemToSave {
            price: 10.0,
            quantity: 3,
            canceled: true,
            ..Default::default()
        };
        assert_eq!(item.line_total(), 0.0);

        let item = OrderItemToSave { canceled: false, ..item };
        assert_eq!(item.line_total(), 30.0);
    }
}
