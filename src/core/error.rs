//! Error kinds raised while converting an amount.

use thiserror::Error;

/// Shown when the amount input does not parse to a finite number.
pub const INVALID_AMOUNT_MESSAGE: &str = "enter a valid amount";

/// Shown for every failure past input validation.
pub const CONVERSION_FAILED_MESSAGE: &str = "conversion failed, try again later";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Invalid amount: '{input}'")]
    InvalidAmount { input: String },

    #[error("Failed to load rate for {code}: {status} - {body}")]
    RateFetch {
        code: String,
        status: u16,
        body: String,
    },

    #[error("Invalid rate data from API: {fields}")]
    InvalidRateFormat { fields: String },

    #[error("Request error for {code}: {source}")]
    Network {
        code: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response for {code}: {source}")]
    MalformedResponse {
        code: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConvertError {
    /// Message written to the display. Only an invalid amount gets a
    /// dedicated text; everything else collapses to one generic message.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConvertError::InvalidAmount { .. } => INVALID_AMOUNT_MESSAGE,
            _ => CONVERSION_FAILED_MESSAGE,
        }
    }

    /// Short name of the error kind, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InvalidAmount { .. } => "invalid_amount",
            ConvertError::RateFetch { .. } => "rate_fetch",
            ConvertError::InvalidRateFormat { .. } => "invalid_rate_format",
            ConvertError::Network { .. } => "network",
            ConvertError::MalformedResponse { .. } => "malformed_response",
        }
    }
}
