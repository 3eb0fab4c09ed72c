//! Terminal front end: reads user input and writes conversion results.

pub mod convert;
pub mod currencies;
pub mod interactive;
pub mod rates;
pub mod setup;
pub mod ui;
