//! Validation errors for incoming planning requests.

use thiserror::Error;

/// Reasons a planning request is rejected before any work starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    /// A required identifier is absent or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// An identifier is not a UUID.
    #[error("{field} must be a UUID, got '{value}'")]
    InvalidIdentifier {
        /// Request field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// The requested quantity is outside the accepted range.
    #[error("quantity must be between {min} and {max}, got {quantity}")]
    QuantityOutOfRange {
        /// Requested quantity.
        quantity: i64,
        /// Smallest accepted quantity.
        min: usize,
        /// Largest accepted quantity.
        max: usize,
    },
}
