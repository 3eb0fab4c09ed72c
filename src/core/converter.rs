//! Amount conversion between two currencies quoted against a reference currency.

use crate::core::error::ConvertError;
use crate::core::number::{format_number, format_rounded};
use crate::core::rate::{RateProvider, RateResponse};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Currency every rate is quoted in. Its own rate is always 1.0.
pub const REFERENCE_CURRENCY: &str = "RUB";

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, ConvertError> {
        Ok(ConversionRequest {
            amount: parse_amount(amount)?,
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Parses user input into a finite amount.
pub fn parse_amount(input: &str) -> Result<f64, ConvertError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| ConvertError::InvalidAmount {
            input: input.to_string(),
        })
}

pub struct Converter {
    provider: Arc<dyn RateProvider>,
    reference_currency: String,
}

impl Converter {
    pub fn new(provider: Arc<dyn RateProvider>, reference_currency: &str) -> Self {
        Converter {
            provider,
            reference_currency: reference_currency.to_string(),
        }
    }

    pub fn reference_currency(&self) -> &str {
        &self.reference_currency
    }

    /// Converts user input and returns the text to display.
    ///
    /// Failures never escape: an unparsable amount yields the invalid amount
    /// message, every other failure is logged and collapsed into the generic
    /// conversion failure message.
    pub async fn convert(&self, amount: &str, from: &str, to: &str) -> String {
        match self.try_convert(amount, from, to).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    ConvertError::InvalidAmount { .. } => debug!(error = %e, "Rejected amount"),
                    _ => error!(kind = e.kind(), error = %e, "Conversion failed"),
                }
                e.user_message().to_string()
            }
        }
    }

    pub async fn try_convert(
        &self,
        amount: &str,
        from: &str,
        to: &str,
    ) -> Result<String, ConvertError> {
        let request = ConversionRequest::parse(amount, from, to)?;
        self.execute(&request).await
    }

    #[instrument(
        name = "Conversion",
        skip(self, request),
        fields(amount = %request.amount, from = %request.from, to = %request.to)
    )]
    pub async fn execute(&self, request: &ConversionRequest) -> Result<String, ConvertError> {
        let ConversionRequest { amount, from, to } = request;
        let amount = *amount;
        let shown_amount = format_number(amount);

        if from == to {
            return Ok(format!("{shown_amount} {from} = {shown_amount} {to}"));
        }

        if *to == self.reference_currency {
            let raw = self.provider.fetch_rate(from).await?;
            let from_rate = RateResponse::decode(&raw).map_err(|v| {
                ConvertError::InvalidRateFormat {
                    fields: format!("fromRate={v}"),
                }
            })?;
            let converted = from_rate.value * amount;
            debug!(from_rate = from_rate.value, converted, "Converted into reference");
            return Ok(format!(
                "{shown_amount} {from} = {} {to}",
                format_number(converted)
            ));
        }

        let (from_rate, to_rate) = if *from == self.reference_currency {
            let raw = self.provider.fetch_rate(to).await?;
            let to_rate = RateResponse::decode(&raw).map_err(|v| {
                ConvertError::InvalidRateFormat {
                    fields: format!("toRate={v}"),
                }
            })?;
            (1.0, to_rate.value)
        } else {
            // Sequential on purpose: the second request starts only once the
            // first body has been read.
            let from_raw = self.provider.fetch_rate(from).await?;
            let to_raw = self.provider.fetch_rate(to).await?;

            match (
                RateResponse::decode(&from_raw),
                RateResponse::decode(&to_raw),
            ) {
                (Ok(f), Ok(t)) => (f.value, t.value),
                (f, t) => {
                    return Err(ConvertError::InvalidRateFormat {
                        fields: format!(
                            "fromRate={}, toRate={}",
                            render_decoded(&f),
                            render_decoded(&t)
                        ),
                    });
                }
            }
        };

        if to_rate == 0.0 {
            return Err(ConvertError::InvalidRateFormat {
                fields: format!("toRate={to_rate}"),
            });
        }

        let converted = amount * (from_rate / to_rate);
        debug!(from_rate, to_rate, converted, "Converted across currencies");
        Ok(format!(
            "{shown_amount} {from} = {} {to}",
            format_rounded(converted)
        ))
    }

    /// Looks up the rate of a single currency. The reference currency is
    /// answered locally.
    pub async fn rate(&self, code: &str) -> Result<RateResponse, ConvertError> {
        if code == self.reference_currency {
            return Ok(RateResponse {
                value: 1.0,
                char_code: Some(code.to_string()),
                name: None,
            });
        }

        let raw = self.provider.fetch_rate(code).await?;
        RateResponse::decode(&raw).map_err(|v| ConvertError::InvalidRateFormat {
            fields: format!("{code}={v}"),
        })
    }
}

fn render_decoded(decoded: &Result<RateResponse, String>) -> String {
    match decoded {
        Ok(rate) => format_number(rate.value),
        Err(raw) => raw.clone(),
    }
}
