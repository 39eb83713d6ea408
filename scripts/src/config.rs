//! The deploy configuration: compiler settings, project paths, named accounts
//! and networks.
//!
//! A [`DeployConfig`] is built once at startup and passed by reference to
//! everything that needs it. Network credentials are never stored in the
//! config itself; a network lists the *environment variables* holding its
//! private keys, and these are read when the signers are constructed.

use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    primitives::Address, signers::local::PrivateKeySigner, transports::http::reqwest::Url,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{
        ARTIFACTS_DIR, CACHE_DIR, DEFAULT_CREDENTIAL_ENV_VAR, DEFAULT_DEPLOYER_INDEX,
        DEFAULT_NETWORK, DEFAULT_NETWORK_URL, DEFAULT_OPTIMIZER_RUNS, DEFAULT_SOLC_VERSION,
        DEPLOYER_ROLE, DEPLOYMENTS_DIR, DEPLOY_DIR, IMPORTS_DIR, SOURCES_DIR, TESTS_DIR,
    },
    errors::ScriptError,
};

/// The full deploy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Solidity compiler settings
    pub solidity: SolidityConfig,
    /// Filesystem layout of the project
    pub paths: ProjectPaths,
    /// Logical account roles, keyed by role name
    pub named_accounts: BTreeMap<String, NamedAccount>,
    /// Networks that may be deployed to, keyed by network name
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// The Solidity compilers the project is built with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidityConfig {
    /// The compilers, in order of preference
    pub compilers: Vec<CompilerConfig>,
}

/// A single Solidity compiler version and its settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// The `solc` version string
    pub version: String,
    /// Optimizer settings
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

/// Optimizer settings for a compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Whether the optimizer is enabled
    pub enabled: bool,
    /// The number of optimizer runs
    pub runs: u32,
}

/// Directory conventions of the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPaths {
    /// Compilation artifacts
    pub artifacts: PathBuf,
    /// Compiler cache
    pub cache: PathBuf,
    /// Deploy scripts
    pub deploy: PathBuf,
    /// Deployment records
    pub deployments: PathBuf,
    /// External imports
    pub imports: PathBuf,
    /// Contract sources
    pub sources: PathBuf,
    /// Contract tests
    pub tests: PathBuf,
}

/// A logical account role, e.g. the deployer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAccount {
    /// The account used on networks without an override
    pub default: AccountRef,
    /// Per-network overrides, keyed by network name
    #[serde(flatten)]
    pub networks: BTreeMap<String, AccountRef>,
}

/// A reference to a concrete account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    /// An index into the accounts available on the network
    Index(usize),
    /// A literal address
    Address(Address),
}

/// A named chain endpoint and the credentials authorized to sign against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The JSON-RPC endpoint
    pub url: String,
    /// Names of the environment variables holding the network's private keys
    #[serde(default)]
    pub accounts: Vec<String>,
    /// The expected chain ID, checked against the node when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

// -----------
// | Loading |
// -----------

impl DeployConfig {
    /// Parse and validate a config from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self, ScriptError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ScriptError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file at the given path.
    ///
    /// Relative project paths are resolved against the directory containing
    /// the config file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.paths = config.paths.relative_to(dir);
        }

        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config file at the given path, falling back to the built-in
    /// config if no such file exists
    pub fn load_or_default(path: &Path) -> Result<Self, ScriptError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Render the config as TOML
    pub fn to_toml_string(&self) -> Result<String, ScriptError> {
        toml::to_string_pretty(self).map_err(|e| ScriptError::Config(e.to_string()))
    }

    /// Check the config for internal consistency
    pub fn validate(&self) -> Result<(), ScriptError> {
        if let Some(compiler) = self
            .solidity
            .compilers
            .iter()
            .find(|c| c.version.trim().is_empty())
        {
            return Err(ScriptError::Config(format!(
                "compiler with empty version: {:?}",
                compiler
            )));
        }

        for (name, network) in &self.networks {
            network
                .rpc_url()
                .map_err(|e| ScriptError::Config(format!("network `{name}`: {e}")))?;
        }

        for (role, account) in &self.named_accounts {
            if let Some(network) = account
                .networks
                .keys()
                .find(|network| !self.networks.contains_key(*network))
            {
                return Err(ScriptError::Config(format!(
                    "named account `{role}` overrides unknown network `{network}`"
                )));
            }
        }

        Ok(())
    }

    /// Look up a network by name
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ScriptError> {
        self.networks
            .get(name)
            .ok_or_else(|| ScriptError::Config(format!("unknown network `{name}`")))
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        let named_accounts = BTreeMap::from([(
            DEPLOYER_ROLE.to_string(),
            NamedAccount {
                default: AccountRef::Index(DEFAULT_DEPLOYER_INDEX),
                networks: BTreeMap::new(),
            },
        )]);

        let networks = BTreeMap::from([(
            DEFAULT_NETWORK.to_string(),
            NetworkConfig {
                url: DEFAULT_NETWORK_URL.to_string(),
                accounts: vec![DEFAULT_CREDENTIAL_ENV_VAR.to_string()],
                chain_id: None,
            },
        )]);

        Self {
            solidity: SolidityConfig::default(),
            paths: ProjectPaths::default(),
            named_accounts,
            networks,
        }
    }
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            compilers: vec![CompilerConfig {
                version: DEFAULT_SOLC_VERSION.to_string(),
                optimizer: OptimizerConfig {
                    enabled: true,
                    runs: DEFAULT_OPTIMIZER_RUNS,
                },
            }],
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from(ARTIFACTS_DIR),
            cache: PathBuf::from(CACHE_DIR),
            deploy: PathBuf::from(DEPLOY_DIR),
            deployments: PathBuf::from(DEPLOYMENTS_DIR),
            imports: PathBuf::from(IMPORTS_DIR),
            sources: PathBuf::from(SOURCES_DIR),
            tests: PathBuf::from(TESTS_DIR),
        }
    }
}

impl ProjectPaths {
    /// Resolve every relative path against the given root
    pub fn relative_to(&self, root: &Path) -> Self {
        Self {
            artifacts: root.join(&self.artifacts),
            cache: root.join(&self.cache),
            deploy: root.join(&self.deploy),
            deployments: root.join(&self.deployments),
            imports: root.join(&self.imports),
            sources: root.join(&self.sources),
            tests: root.join(&self.tests),
        }
    }
}

// ---------------
// | Credentials |
// ---------------

impl NetworkConfig {
    /// Parse the network's RPC URL
    pub fn rpc_url(&self) -> Result<Url, ScriptError> {
        Url::parse(&self.url).map_err(|e| ScriptError::Config(format!("{}: {}", self.url, e)))
    }

    /// Construct the network's signers from the process environment
    pub fn signers(&self) -> Result<Vec<PrivateKeySigner>, ScriptError> {
        self.signers_with(|var| env::var(var).ok())
    }

    /// Construct the network's signers, looking up each credential variable
    /// with the given function
    pub fn signers_with<F>(&self, lookup: F) -> Result<Vec<PrivateKeySigner>, ScriptError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.accounts
            .iter()
            .map(|var| {
                let key = lookup(var).ok_or_else(|| {
                    ScriptError::Config(format!("environment variable `{var}` is not set"))
                })?;

                PrivateKeySigner::from_str(key.trim()).map_err(|e| {
                    ScriptError::Config(format!("`{var}` does not hold a valid private key: {e}"))
                })
            })
            .collect()
    }
}
