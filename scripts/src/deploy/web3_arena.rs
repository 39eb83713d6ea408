//! Deploys the Web3Arena ERC1155 contract

use async_trait::async_trait;
use tracing::info;

use crate::{
    constants::{AFFILIATE_TAG, DEPLOYER_ROLE, WEB3_ARENA_CONTRACT_NAME},
    engine::DeployOptions,
    errors::ScriptError,
};

use super::{DeployEnv, DeployScript};

/// Deploys `Web3Arena1155` from the deployer account, with no constructor
/// arguments
pub struct Web3Arena1155;

#[async_trait]
impl DeployScript for Web3Arena1155 {
    fn id(&self) -> &'static str {
        "web3_arena_1155"
    }

    fn tags(&self) -> &'static [&'static str] {
        &[AFFILIATE_TAG]
    }

    async fn run(&self, env: &DeployEnv<'_>) -> Result<(), ScriptError> {
        let deployer = env.accounts.get_named_accounts().await?.get(DEPLOYER_ROLE)?;
        info!("{deployer}");

        env.deployments
            .deploy(
                WEB3_ARENA_CONTRACT_NAME,
                DeployOptions {
                    from: deployer,
                    args: vec![],
                },
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use alloy::primitives::{address, Address, B256};
    use async_trait::async_trait;

    use crate::{
        accounts::{AccountResolver, ConfiguredAccounts, NamedAccounts},
        config::DeployConfig,
        constants::DEFAULT_NETWORK,
        deploy::{DeployEnv, DeployScript},
        engine::{tests::MockChain, DeployOptions, DeployResult, DeploymentEngine},
        errors::ScriptError,
    };

    use super::Web3Arena1155;

    /// Resolves a fixed set of named accounts
    struct FixedAccounts(NamedAccounts);

    #[async_trait]
    impl AccountResolver for FixedAccounts {
        async fn get_named_accounts(&self) -> Result<NamedAccounts, ScriptError> {
            Ok(self.0.clone())
        }
    }

    /// Records deploy requests, failing them if configured to
    #[derive(Default)]
    struct RecordingEngine {
        /// Every request received, in order
        requests: Mutex<Vec<(String, DeployOptions)>>,
        /// The error to fail requests with
        error: Option<ScriptError>,
    }

    #[async_trait]
    impl DeploymentEngine for RecordingEngine {
        async fn deploy(
            &self,
            name: &str,
            options: DeployOptions,
        ) -> Result<DeployResult, ScriptError> {
            self.requests
                .lock()
                .unwrap()
                .push((name.to_string(), options));

            match &self.error {
                Some(err) => Err(err.clone()),
                None => Ok(DeployResult {
                    address: Address::repeat_byte(1),
                    transaction_hash: B256::ZERO,
                    newly_deployed: true,
                }),
            }
        }
    }

    /// The deployer address of the scenarios below
    const DEPLOYER: Address = address!("0000000000000000000000000000000000000abc");

    /// Named accounts binding the deployer role
    fn with_deployer() -> FixedAccounts {
        FixedAccounts(NamedAccounts::from_addresses(
            DEFAULT_NETWORK,
            [("deployer".to_string(), DEPLOYER)],
        ))
    }

    #[tokio::test]
    async fn test_deploys_from_deployer() {
        let accounts = with_deployer();
        let engine = RecordingEngine::default();
        let env = DeployEnv {
            accounts: &accounts,
            deployments: &engine,
        };

        Web3Arena1155.run(&env).await.unwrap();

        let requests = engine.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![(
                "Web3Arena1155".to_string(),
                DeployOptions {
                    from: DEPLOYER,
                    args: vec![],
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_missing_deployer() {
        let accounts = FixedAccounts(NamedAccounts::from_addresses(
            DEFAULT_NETWORK,
            [("treasury".to_string(), DEPLOYER)],
        ));
        let engine = RecordingEngine::default();
        let env = DeployEnv {
            accounts: &accounts,
            deployments: &engine,
        };

        let err = Web3Arena1155.run(&env).await.unwrap_err();
        assert!(err.is_resolution());
        assert!(engine.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deployment_error_propagated() {
        let accounts = with_deployer();
        let error = ScriptError::ContractDeployment("nonce too low".to_string());
        let engine = RecordingEngine {
            error: Some(error.clone()),
            ..Default::default()
        };
        let env = DeployEnv {
            accounts: &accounts,
            deployments: &engine,
        };

        assert_eq!(Web3Arena1155.run(&env).await.unwrap_err(), error);
        assert_eq!(engine.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deployer_from_chain_accounts() {
        let chain = MockChain {
            accounts: vec![DEPLOYER, Address::repeat_byte(2)],
            ..Default::default()
        };
        let config = DeployConfig::default();
        let accounts = ConfiguredAccounts::new(&config, DEFAULT_NETWORK, &chain);
        let engine = RecordingEngine::default();
        let env = DeployEnv {
            accounts: &accounts,
            deployments: &engine,
        };

        Web3Arena1155.run(&env).await.unwrap();
        assert_eq!(engine.requests.lock().unwrap()[0].1.from, DEPLOYER);
    }

    #[test]
    fn test_tags() {
        assert_eq!(Web3Arena1155.tags(), &["Affiliate"]);
    }
}
