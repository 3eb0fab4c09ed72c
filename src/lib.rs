pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::ui::TerminalDisplay;
use crate::core::Converter;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Rate {
        code: String,
    },
    Rates {
        codes: Vec<String>,
    },
    Currencies,
    Interactive,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = load_config(config_path)?;

    let provider = providers::HttpRateProvider::new(&config.provider.base_url)?;
    let converter = Arc::new(Converter::new(
        Arc::new(provider),
        &config.reference_currency,
    ));

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(
                &config,
                converter,
                Arc::new(TerminalDisplay),
                &amount,
                &from,
                &to,
            )
            .await
        }
        AppCommand::Rate { code } => cli::rates::run_single(&config, converter, &code).await,
        AppCommand::Rates { codes } => cli::rates::run(&config, converter, &codes).await,
        AppCommand::Currencies => {
            cli::currencies::run(&config);
            Ok(())
        }
        AppCommand::Interactive => {
            cli::interactive::run(&config, converter, Arc::new(TerminalDisplay)).await
        }
    }
}
