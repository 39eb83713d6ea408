use std::path::Path;

use clap::Parser;
use scripts::{
    cli::Cli,
    config::DeployConfig,
    constants::{DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER},
    errors::ScriptError,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Credentials live in the environment, optionally populated from `.env`
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let Cli {
        config,
        network,
        command,
    } = Cli::parse();

    let config = match config {
        Some(path) => DeployConfig::load(&path)?,
        None => DeployConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
    };

    command.run(&config, &network).await
}
