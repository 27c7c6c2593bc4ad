use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Invalid argument: {field} — {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PricingError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        PricingError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(e: serde_json::Error) -> Self {
        PricingError::SerializationError(e.to_string())
    }
}
