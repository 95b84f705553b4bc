//! Parsing error types for listing extraction and product detail mapping
//!
//! Listing failures (`ParsingError`) and JSON mapping failures (`MappingError`)
//! are kept apart so callers can tell a blocked page from a malformed response.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Age confirmation required: {title}")]
    AgeGate { title: String },

    #[error("Invalid CSS selector for '{field}': {selector} - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },
}

impl ParsingError {
    pub fn age_gate(title: &str) -> Self {
        Self::AgeGate {
            title: title.to_string(),
        }
    }

    pub fn invalid_selector(field: &str, selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the page was served but withheld behind the age interstitial
    pub fn is_age_gate(&self) -> bool {
        matches!(self, Self::AgeGate { .. })
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Response carries no usable numeric id; treated as "not a product"
    #[error("Product response has no numeric id (got {found})")]
    InvalidId { found: String },

    /// Response structure differs from the expected item schema
    #[error("Product response shape mismatch: {reason}")]
    ShapeMismatch { reason: String },
}

impl MappingError {
    pub fn shape_mismatch(reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            reason: reason.into(),
        }
    }
}

pub type MappingResult<T> = Result<T, MappingError>;
