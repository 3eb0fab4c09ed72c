use super::ui;
use crate::core::config::AppConfig;
use crate::core::{ConversionHandler, Converter, ResultDisplay};
use anyhow::{Context, Result, bail};
use futures::future::join_all;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Parsed `AMOUNT FROM TO` line. The amount stays raw text; the converter
/// validates it.
#[derive(Debug, PartialEq)]
pub struct ConversionLine {
    pub amount: String,
    pub from: String,
    pub to: String,
}

pub fn parse_line(config: &AppConfig, line: &str) -> Result<ConversionLine> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [amount, from, to] = parts.as_slice() else {
        bail!("Expected: AMOUNT FROM TO (e.g. 100 USD RUB)");
    };

    Ok(ConversionLine {
        amount: amount.to_string(),
        from: ui::selected_code(config, from)?,
        to: ui::selected_code(config, to)?,
    })
}

/// Reads conversion requests from stdin until EOF or `quit`.
pub async fn run(
    config: &AppConfig,
    converter: Arc<Converter>,
    display: Arc<dyn ResultDisplay>,
) -> Result<()> {
    println!(
        "{}",
        ui::style_text(
            "Enter AMOUNT FROM TO per line, 'quit' to exit",
            ui::StyleType::Subtle
        )
    );
    let handler = Arc::new(ConversionHandler::new(converter, display));
    run_with_input(config, handler, BufReader::new(tokio::io::stdin())).await
}

/// Every line triggers its own conversion task, so a slow request never holds
/// up the prompt. Only the most recent request's result is displayed.
pub async fn run_with_input<R>(
    config: &AppConfig,
    handler: Arc<ConversionHandler>,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut tasks = Vec::new();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match parse_line(config, line) {
            Ok(request) => {
                debug!(?request, "Spawning conversion");
                let generation = handler.begin();
                let handler = Arc::clone(&handler);
                tasks.push(tokio::spawn(async move {
                    handler
                        .run(generation, &request.amount, &request.from, &request.to)
                        .await
                }));
            }
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        }
    }

    // Let in-flight conversions finish before exiting.
    for result in join_all(tasks).await {
        if let Err(e) = result {
            warn!(error = %e, "Conversion task failed");
        }
    }
    Ok(())
}
