use anyhow::Result;
use cconv::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cconv::AppCommand {
    fn from(cmd: Commands) -> cconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => cconv::AppCommand::Convert { amount, from, to },
            Commands::Rate { code } => cconv::AppCommand::Rate { code },
            Commands::Rates { codes } => cconv::AppCommand::Rates { codes },
            Commands::Currencies => cconv::AppCommand::Currencies,
            Commands::Interactive => cconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
    },
    /// Show the rate of one currency
    Rate {
        /// Currency code
        code: String,
    },
    /// Show rates for several currencies (all selectable ones by default)
    Rates {
        /// Currency codes
        codes: Vec<String>,
    },
    /// List selectable currencies
    Currencies,
    /// Read AMOUNT FROM TO lines from stdin and convert each
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cconv::cli::setup::setup(),
        Some(cmd) => cconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
