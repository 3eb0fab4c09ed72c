//! Core conversion logic and its ambient plumbing

pub mod config;
pub mod converter;
pub mod error;
pub mod handler;
pub mod log;
pub mod number;
pub mod rate;

// Re-export main types for cleaner imports
pub use converter::{ConversionRequest, Converter, REFERENCE_CURRENCY};
pub use error::ConvertError;
pub use handler::{ConversionHandler, ResultDisplay};
pub use rate::{RateProvider, RateResponse};
