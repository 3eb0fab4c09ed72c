//! Exchange rate abstractions

use crate::core::error::ConvertError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the rate document for a single currency code.
    ///
    /// The body is returned as parsed JSON without any shape checks; callers
    /// run it through [`RateResponse::decode`].
    async fn fetch_rate(&self, code: &str) -> Result<Value, ConvertError>;
}

/// Rate of one unit of a currency expressed in the reference currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateResponse {
    pub value: f64,
    pub char_code: Option<String>,
    pub name: Option<String>,
}

impl RateResponse {
    /// Decodes a raw rate document.
    ///
    /// `value` must be a JSON number. On failure the offending `value` is
    /// returned rendered as text (`missing` when absent) so the caller can name
    /// it in the error.
    pub fn decode(raw: &Value) -> Result<Self, String> {
        let value = match raw.get("value") {
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| n.to_string())?,
            Some(other) => return Err(other.to_string()),
            None => return Err("missing".to_string()),
        };

        Ok(RateResponse {
            value,
            char_code: raw
                .get("charCode")
                .and_then(Value::as_str)
                .map(str::to_string),
            name: raw.get("name").and_then(Value::as_str).map(str::to_string),
        })
    }
}
