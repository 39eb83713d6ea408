//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, export_deployments, list_accounts, print_config},
    config::DeployConfig,
    constants::{CONFIG_PATH_ENV_VAR, DEFAULT_NETWORK, NETWORK_ENV_VAR},
    errors::ScriptError,
};

/// Deploy the Web3Arena contracts to an EVM chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the deploy config.
    ///
    /// Defaults to `deploy.toml`, falling back to the built-in config if
    /// that file does not exist.
    #[arg(short, long, env = CONFIG_PATH_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// The network to operate on
    #[arg(short, long, env = NETWORK_ENV_VAR, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands of the deploy CLI
#[derive(Subcommand)]
pub enum Command {
    /// Run the deploy scripts
    Deploy(DeployArgs),
    /// Print the named accounts resolved on the network
    Accounts,
    /// Export the addresses of the contracts deployed on the network
    Export(ExportArgs),
    /// Print the effective config
    Config,
}

impl Command {
    /// Run the command against the given config and network
    pub async fn run(self, config: &DeployConfig, network: &str) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, config, network).await,
            Command::Accounts => list_accounts(config, network).await,
            Command::Export(args) => export_deployments(args, config, network),
            Command::Config => print_config(config),
        }
    }
}

/// Run the deploy scripts
#[derive(Args)]
pub struct DeployArgs {
    /// Only run the scripts carrying one of these tags
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Delete the network's deployment records before running,
    /// forcing every contract to be redeployed
    #[arg(long)]
    pub reset: bool,
}

/// Export deployed addresses
#[derive(Args)]
pub struct ExportArgs {
    /// The file to write the addresses to, as JSON.
    /// Printed to stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn test_parse_deploy() {
        let cli = Cli::try_parse_from([
            "arena-deploy",
            "--network",
            "cronos-testnet",
            "deploy",
            "--tags",
            "Affiliate,Core",
            "--reset",
        ])
        .unwrap();

        assert_eq!(cli.network, "cronos-testnet");
        let Command::Deploy(args) = cli.command else {
            panic!("expected deploy command");
        };
        assert_eq!(args.tags, vec!["Affiliate", "Core"]);
        assert!(args.reset);
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from(["arena-deploy", "export", "-o", "addresses.json"]).unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.output.unwrap().to_str(), Some("addresses.json"));
    }
}
