use super::ui;
use crate::core::config::AppConfig;
use crate::core::number::format_number;
use crate::core::{ConvertError, Converter, RateResponse};
use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment};
use futures::future::join_all;
use std::sync::Arc;

/// Shows the rate of a single currency.
pub async fn run_single(config: &AppConfig, converter: Arc<Converter>, code: &str) -> Result<()> {
    let code = ui::selected_code(config, code)?;
    let rate = converter
        .rate(&code)
        .await
        .with_context(|| format!("Failed to fetch rate for {code}"))?;

    println!("{}", format_rate_line(&code, &rate, converter.reference_currency()));
    Ok(())
}

/// Shows a table of rates. With no codes given, every selectable currency is
/// listed.
pub async fn run(config: &AppConfig, converter: Arc<Converter>, codes: &[String]) -> Result<()> {
    let codes = if codes.is_empty() {
        config.currencies.clone()
    } else {
        codes
            .iter()
            .map(|c| ui::selected_code(config, c))
            .collect::<Result<Vec<_>>>()?
    };

    let pb = ui::new_progress_bar(codes.len() as u64)?;
    pb.set_message("Fetching rates...");

    let rate_futures = codes.iter().map(|code| {
        let pb_clone = pb.clone();
        let converter = Arc::clone(&converter);
        async move {
            let res = converter.rate(code).await;
            pb_clone.inc(1);
            (code.clone(), res)
        }
    });

    let results = join_all(rate_futures).await;
    pb.finish_and_clear();

    println!("{}", render_table(&results, converter.reference_currency()));
    Ok(())
}

pub fn format_rate_line(code: &str, rate: &RateResponse, reference: &str) -> String {
    let line = format!("1 {code} = {} {reference}", format_number(rate.value));
    match &rate.name {
        Some(name) => format!("{line} ({name})"),
        None => line,
    }
}

fn render_table(results: &[(String, Result<RateResponse, ConvertError>)], reference: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell(&format!("Rate ({reference})")),
    ]);

    for (code, result) in results {
        match result {
            // Prefer the code the service answered with over the requested one.
            Ok(rate) => table.add_row(vec![
                Cell::new(rate.char_code.as_deref().unwrap_or(code)),
                ui::format_optional_cell(rate.name.clone(), |n| n),
                Cell::new(format_number(rate.value)).set_alignment(CellAlignment::Right),
            ]),
            Err(e) => {
                tracing::error!(code = %code, error = %e, "Failed to fetch rate");
                table.add_row(vec![Cell::new(code), ui::na_cell(true), ui::na_cell(true)])
            }
        };
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::tests::MockRateProvider;
    use serde_json::json;

    #[test]
    fn test_format_rate_line() {
        let rate = RateResponse {
            value: 90.5,
            char_code: Some("USD".to_string()),
            name: Some("US Dollar".to_string()),
        };
        assert_eq!(
            format_rate_line("USD", &rate, "RUB"),
            "1 USD = 90.5 RUB (US Dollar)"
        );

        let rate = RateResponse {
            value: 1.0,
            char_code: None,
            name: None,
        };
        assert_eq!(format_rate_line("RUB", &rate, "RUB"), "1 RUB = 1 RUB");
    }

    #[tokio::test]
    async fn test_rates_table_marks_failures() {
        let provider = Arc::new(
            MockRateProvider::new(&[("USD", json!({"name": "US Dollar", "value": 90}))])
                .failing("EUR", 500),
        );
        let converter = Converter::new(provider.clone(), "RUB");

        let mut results = Vec::new();
        for code in ["RUB", "USD", "EUR"] {
            results.push((code.to_string(), converter.rate(code).await));
        }

        let table = render_table(&results, "RUB");
        assert!(table.contains("Rate (RUB)"));
        assert!(table.contains("US Dollar"));
        assert!(table.contains("90"));
        assert!(table.contains("N/A"));
        assert_eq!(provider.requested(), vec!["USD", "EUR"]);
    }

    #[test]
    fn test_rates_table_uses_answered_code() {
        let results = vec![(
            "XAU".to_string(),
            Ok(RateResponse {
                value: 1e-7,
                char_code: Some("GOLD".to_string()),
                name: None,
            }),
        )];

        let table = render_table(&results, "RUB");
        assert!(table.contains("GOLD"));
        assert!(!table.contains("XAU"));
        assert!(table.contains("1e-7"));
    }

    #[tokio::test]
    async fn test_rates_for_explicit_codes() {
        let provider = Arc::new(MockRateProvider::new(&[
            ("USD", json!({"value": 90})),
            ("EUR", json!({"value": 100})),
        ]));
        let converter = Arc::new(Converter::new(provider.clone(), "RUB"));

        run(
            &AppConfig::default(),
            converter,
            &["usd".to_string(), "eur".to_string()],
        )
        .await
        .unwrap();

        let mut requested = provider.requested();
        requested.sort();
        assert_eq!(requested, vec!["EUR", "USD"]);
    }
}
