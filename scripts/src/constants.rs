//! Constants used in the deploy scripts

/// The named account role that signs and pays for contract creation
pub const DEPLOYER_ROLE: &str = "deployer";

/// The name of the Web3Arena ERC1155 contract artifact
pub const WEB3_ARENA_CONTRACT_NAME: &str = "Web3Arena1155";

/// The tag under which the Web3Arena deploy script is registered
pub const AFFILIATE_TAG: &str = "Affiliate";

/// The default path of the deploy configuration file
pub const DEFAULT_CONFIG_PATH: &str = "deploy.toml";

/// The environment variable from which the config path may be read
pub const CONFIG_PATH_ENV_VAR: &str = "DEPLOY_CONFIG";

/// The environment variable from which the target network may be read
pub const NETWORK_ENV_VAR: &str = "NETWORK";

/// The default log filter, used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

// ------------------
// | Default config |
// ------------------

/// The default Solidity compiler version
pub const DEFAULT_SOLC_VERSION: &str = "0.8.17";

/// The default number of optimizer runs
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// The default network to deploy to
pub const DEFAULT_NETWORK: &str = "cronos-testnet";

/// The RPC URL of the Cronos testnet
pub const DEFAULT_NETWORK_URL: &str = "https://evm-t3.cronos.org/";

/// The environment variable holding the default network's deployer key
pub const DEFAULT_CREDENTIAL_ENV_VAR: &str = "PRIVATE_KEY";

/// The account index the deployer role maps to by default
pub const DEFAULT_DEPLOYER_INDEX: usize = 0;

// ----------------
// | Project path |
// ----------------

/// The default artifacts directory
pub const ARTIFACTS_DIR: &str = "artifacts";

/// The default cache directory
pub const CACHE_DIR: &str = "cache";

/// The default deploy scripts directory
pub const DEPLOY_DIR: &str = "deploy";

/// The default deployment records directory
pub const DEPLOYMENTS_DIR: &str = "deployments";

/// The default imports directory
pub const IMPORTS_DIR: &str = "imports";

/// The default contract sources directory
pub const SOURCES_DIR: &str = "contracts";

/// The default tests directory
pub const TESTS_DIR: &str = "test";

// ---------------
// | Deployments |
// ---------------

/// The file in a network's deployments directory recording its chain ID
pub const CHAIN_ID_FILE: &str = ".chainId";

/// The extension of artifact and deployment record files
pub const JSON_EXTENSION: &str = "json";
