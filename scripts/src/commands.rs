//! Implementations of the CLI commands

use std::fs;

use tracing::{info, warn};

use crate::{
    accounts::{AccountResolver, ConfiguredAccounts},
    cli::{DeployArgs, ExportArgs},
    client::setup_client,
    config::DeployConfig,
    deploy::{all_scripts, DeployEnv},
    deployments::DeploymentStore,
    engine::Deployer,
    errors::ScriptError,
    runner::run_scripts,
};

/// Run the deploy scripts selected by the given tags on the network
pub async fn deploy(
    args: DeployArgs,
    config: &DeployConfig,
    network: &str,
) -> Result<(), ScriptError> {
    let client = setup_client(config.network(network)?).await?;

    let store = DeploymentStore::new(&config.paths.deployments, network);
    if args.reset {
        warn!("deleting deployment records in {}", store.dir().display());
        store.reset()?;
    }

    let accounts = ConfiguredAccounts::new(config, network, &client);
    let deployer = Deployer::new(client.clone(), config.paths.artifacts.clone(), store);
    let env = DeployEnv {
        accounts: &accounts,
        deployments: &deployer,
    };

    let ran = run_scripts(&all_scripts(), &args.tags, &env).await?;
    info!("ran {} deploy script(s) on `{network}`", ran.len());

    Ok(())
}

/// Print the named accounts resolved on the network
pub async fn list_accounts(config: &DeployConfig, network: &str) -> Result<(), ScriptError> {
    let client = setup_client(config.network(network)?).await?;
    let named_accounts = ConfiguredAccounts::new(config, network, &client)
        .get_named_accounts()
        .await?;

    for (role, address) in named_accounts.iter() {
        println!("{role}: {address}");
    }

    Ok(())
}

/// Write the deployed addresses of the network as JSON
pub fn export_deployments(
    args: ExportArgs,
    config: &DeployConfig,
    network: &str,
) -> Result<(), ScriptError> {
    config.network(network)?;
    let store = DeploymentStore::new(&config.paths.deployments, network);
    let json = serde_json::to_string_pretty(&store.export()?)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    match args.output {
        Some(path) => {
            fs::write(&path, json)
                .map_err(|e| ScriptError::WriteDeployments(format!("{}: {}", path.display(), e)))?;
            info!("exported deployments of `{network}` to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Print the effective config
pub fn print_config(config: &DeployConfig) -> Result<(), ScriptError> {
    println!("{}", config.to_toml_string()?);
    Ok(())
}
