//! The deployment engine: deploys artifacts by name, skipping those already
//! deployed with the same bytecode and arguments

use std::path::PathBuf;

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    artifacts::load_artifact,
    client::ChainClient,
    deployments::{DeploymentRecord, DeploymentStore},
    errors::ScriptError,
};

/// Options of a single deployment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// The account that signs and pays for the deployment
    pub from: Address,
    /// The constructor arguments, in string form
    pub args: Vec<String>,
}

/// The outcome of a deployment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    /// The address of the contract
    pub address: Address,
    /// The hash of the creation transaction
    pub transaction_hash: TxHash,
    /// Whether a new contract was created by this request
    pub newly_deployed: bool,
}

/// Deploys named artifacts
#[async_trait]
pub trait DeploymentEngine: Send + Sync {
    /// Deploy the artifact with the given name, unless a deployment of the
    /// same bytecode and arguments is already recorded
    async fn deploy(&self, name: &str, options: DeployOptions)
        -> Result<DeployResult, ScriptError>;
}

/// A [`DeploymentEngine`] that reads artifacts from disk, submits creations
/// through a [`ChainClient`] and records them in a [`DeploymentStore`]
pub struct Deployer<C> {
    /// The chain client
    client: C,
    /// The directory holding compilation artifacts
    artifacts_dir: PathBuf,
    /// The deployment records of the active network
    store: DeploymentStore,
}

impl<C: ChainClient> Deployer<C> {
    /// Constructor
    pub fn new(client: C, artifacts_dir: PathBuf, store: DeploymentStore) -> Self {
        Self {
            client,
            artifacts_dir,
            store,
        }
    }

    /// The chain client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The deployment records of the active network
    pub fn store(&self) -> &DeploymentStore {
        &self.store
    }
}

#[async_trait]
impl<C: ChainClient> DeploymentEngine for Deployer<C> {
    async fn deploy(
        &self,
        name: &str,
        options: DeployOptions,
    ) -> Result<DeployResult, ScriptError> {
        let artifact = load_artifact(&self.artifacts_dir, name)?;
        let init_code = artifact.init_code(&options.args)?;

        let chain_id = self.client.chain_id().await?;
        self.store.check_chain_id(chain_id)?;

        let previous = self.store.read(name)?;
        if let Some(record) = &previous {
            if record.matches(&artifact.bytecode, &options.args) {
                info!("reusing `{name}` at {:#x}", record.address);
                return Ok(DeployResult {
                    address: record.address,
                    transaction_hash: record.transaction_hash,
                    newly_deployed: false,
                });
            }
            warn!(
                "`{name}` at {:#x} differs from the current artifact, redeploying",
                record.address
            );
        }

        let created = self.client.create_contract(options.from, init_code).await?;
        let record = DeploymentRecord {
            address: created.address,
            abi: artifact.abi,
            transaction_hash: created.transaction_hash,
            block_number: created.block_number,
            deployer: options.from,
            args: options.args,
            bytecode: artifact.bytecode,
            deployed_bytecode: artifact.deployed_bytecode,
            num_deployments: previous.map_or(1, |r| r.num_deployments + 1),
        };
        self.store.ensure_chain_id(chain_id)?;
        self.store.write(name, &record)?;

        info!(
            "deployed `{name}` at {:#x} (tx {:#x})",
            created.address, created.transaction_hash
        );
        Ok(DeployResult {
            address: created.address,
            transaction_hash: created.transaction_hash,
            newly_deployed: true,
        })
    }
}
