// ============================================================================
// Order Item Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderItemError {
    #[error("No ID is given")]
    MissingId,

    #[error("Order item was not found: {0}")]
    NotFound(i64),

    #[error("No catalog data for good price: {0}")]
    GoodPriceNotFound(i64),

    #[error("Pricing failed: {0}")]
    Pricing(anyhow::Error),

    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl OrderItemError {
    /// Short label used for the failure metric.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderItemError::MissingId => "missing_id",
            OrderItemError::NotFound(_) => "not_found",
            OrderItemError::GoodPriceNotFound(_) => "good_price_not_found",
            OrderItemError::Pricing(_) => "pricing",
            OrderItemError::Collaborator(_) => "collaborator",
        }
    }
}

pub type Result<T, E = OrderItemError> = std::result::Result<T, E>;
