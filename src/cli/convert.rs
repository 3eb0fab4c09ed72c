use super::ui;
use crate::core::config::AppConfig;
use crate::core::{ConversionHandler, Converter, ResultDisplay};
use anyhow::Result;
use std::sync::Arc;

/// Converts one amount and writes the result to `display`.
pub async fn run(
    config: &AppConfig,
    converter: Arc<Converter>,
    display: Arc<dyn ResultDisplay>,
    amount: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    let from = ui::selected_code(config, from)?;
    let to = ui::selected_code(config, to)?;

    let handler = ConversionHandler::new(converter, display);
    handler.trigger(amount, &from, &to).await;
    Ok(())
}
