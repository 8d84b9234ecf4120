//! Error types for Civica.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CivicaError {
    #[error("Please fill in the '{0}' field.")]
    MissingField(&'static str),

    #[error("Unknown complaint category: {0}")]
    UnknownCategory(String),

    #[error("Email delivery failed: {0}")]
    Delivery(String),

    #[error("No email transport is configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CivicaError {
    /// Validation errors are recovered by re-rendering the form;
    /// everything else becomes a non-fatal delivery warning.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CivicaError::MissingField(_) | CivicaError::UnknownCategory(_)
        )
    }
}
