//! Persisted deployment records.
//!
//! Each network has its own directory under the deployments path, holding a
//! `.chainId` file and one `<Name>.json` record per deployed artifact.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, Bytes, B256},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{CHAIN_ID_FILE, JSON_EXTENSION},
    errors::ScriptError,
};

/// The record of a contract deployed on a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// The address of the deployed contract
    pub address: Address,
    /// The contract interface
    pub abi: JsonAbi,
    /// The hash of the creation transaction
    pub transaction_hash: B256,
    /// The block the creation transaction was included in
    pub block_number: Option<u64>,
    /// The account that deployed the contract
    pub deployer: Address,
    /// The constructor arguments
    pub args: Vec<String>,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
    /// The runtime bytecode
    pub deployed_bytecode: Bytes,
    /// How many times the contract has been deployed under this name
    pub num_deployments: u64,
}

impl DeploymentRecord {
    /// Whether this record was produced from the given bytecode and args
    pub fn matches(&self, bytecode: &Bytes, args: &[String]) -> bool {
        &self.bytecode == bytecode && self.args == args
    }
}

/// The deployment records of a single network
#[derive(Debug, Clone)]
pub struct DeploymentStore {
    /// The name of the network
    network: String,
    /// The directory holding the network's records
    dir: PathBuf,
}

impl DeploymentStore {
    /// Create a store for the given network under the deployments directory
    pub fn new(deployments_dir: &Path, network: &str) -> Self {
        Self {
            network: network.to_string(),
            dir: deployments_dir.join(network),
        }
    }

    /// The directory holding the network's records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The path of the record for the given contract
    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{JSON_EXTENSION}"))
    }

    /// Read the record for the given contract, if it has been deployed
    pub fn read(&self, name: &str) -> Result<Option<DeploymentRecord>, ScriptError> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", path.display(), e)))?;
        let record = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", path.display(), e)))?;

        Ok(Some(record))
    }

    /// Write the record for the given contract, replacing any previous one
    pub fn write(&self, name: &str, record: &DeploymentRecord) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        let path = self.record_path(name);
        fs::write(&path, contents)
            .map_err(|e| ScriptError::WriteDeployments(format!("{}: {}", path.display(), e)))?;

        debug!("wrote deployment record {}", path.display());
        Ok(())
    }

    /// Check that the records of this network belong to the given chain.
    ///
    /// Passes when no chain ID has been recorded yet.
    pub fn check_chain_id(&self, chain_id: u64) -> Result<(), ScriptError> {
        match self.recorded_chain_id()? {
            Some(recorded) if recorded != chain_id => Err(ScriptError::ReadDeployments(format!(
                "deployments of `{}` were recorded on chain {}, connected to chain {}",
                self.network, recorded, chain_id
            ))),
            _ => Ok(()),
        }
    }

    /// Check that the records of this network belong to the given chain,
    /// recording the chain ID if none has been recorded yet
    pub fn ensure_chain_id(&self, chain_id: u64) -> Result<(), ScriptError> {
        self.check_chain_id(chain_id)?;
        let path = self.dir.join(CHAIN_ID_FILE);
        if path.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        fs::write(&path, chain_id.to_string())
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))
    }

    /// The chain ID recorded for this network, if any
    fn recorded_chain_id(&self) -> Result<Option<u64>, ScriptError> {
        let path = self.dir.join(CHAIN_ID_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let recorded =
            fs::read_to_string(&path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
        recorded
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ScriptError::ReadDeployments(format!("invalid {CHAIN_ID_FILE}")))
    }

    /// Read every record of this network, keyed by contract name
    pub fn all(&self) -> Result<BTreeMap<String, DeploymentRecord>, ScriptError> {
        let mut records = BTreeMap::new();
        if !self.dir.exists() {
            return Ok(records);
        }

        let entries =
            fs::read_dir(&self.dir).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
        for entry in entries {
            let path = entry
                .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }

            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                if let Some(record) = self.read(name)? {
                    records.insert(name.to_string(), record);
                }
            }
        }

        Ok(records)
    }

    /// The deployed address of every contract on this network
    pub fn export(&self) -> Result<BTreeMap<String, Address>, ScriptError> {
        Ok(self
            .all()?
            .into_iter()
            .map(|(name, record)| (name, record.address))
            .collect())
    }

    /// Delete every record of this network
    pub fn reset(&self) -> Result<(), ScriptError> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)
                .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        }
        Ok(())
    }
}
