//! Resolution of named account roles to concrete addresses

use std::collections::BTreeMap;

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::debug;

use crate::{
    client::ChainClient,
    config::{AccountRef, DeployConfig, NamedAccount},
    errors::ScriptError,
};

/// The named accounts of a network, resolved to addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedAccounts {
    /// The network the accounts were resolved for
    network: String,
    /// Resolved addresses, keyed by role
    accounts: BTreeMap<String, Address>,
}

impl NamedAccounts {
    /// Resolve every role for the given network against the accounts
    /// available on it.
    ///
    /// Roles whose reference cannot be satisfied on this network are left
    /// unresolved; looking them up fails.
    pub fn resolve(
        named_accounts: &BTreeMap<String, NamedAccount>,
        network: &str,
        available: &[Address],
    ) -> Self {
        let accounts = named_accounts
            .iter()
            .filter_map(|(role, named)| {
                let account_ref = named.networks.get(network).unwrap_or(&named.default);
                let address = match *account_ref {
                    AccountRef::Address(address) => Some(address),
                    AccountRef::Index(i) => available.get(i).copied(),
                };

                if address.is_none() {
                    debug!("`{role}` refers to {account_ref:?}, unavailable on `{network}`");
                }
                address.map(|address| (role.clone(), address))
            })
            .collect();

        Self {
            network: network.to_string(),
            accounts,
        }
    }

    /// Build from already-resolved addresses
    pub fn from_addresses<I>(network: &str, accounts: I) -> Self
    where
        I: IntoIterator<Item = (String, Address)>,
    {
        Self {
            network: network.to_string(),
            accounts: accounts.into_iter().collect(),
        }
    }

    /// The address bound to the given role
    pub fn get(&self, role: &str) -> Result<Address, ScriptError> {
        self.accounts.get(role).copied().ok_or_else(|| {
            ScriptError::Resolution(format!(
                "`{role}` is not defined for network `{}`",
                self.network
            ))
        })
    }

    /// Iterate over the resolved roles and their addresses
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.accounts.iter().map(|(role, addr)| (role.as_str(), *addr))
    }
}

/// Resolves named account roles on the active network
#[async_trait]
pub trait AccountResolver: Send + Sync {
    /// Resolve every named account
    async fn get_named_accounts(&self) -> Result<NamedAccounts, ScriptError>;
}

/// Resolves the roles declared in the config against the accounts exposed by
/// a chain client
pub struct ConfiguredAccounts<'a, C> {
    /// The deploy config
    config: &'a DeployConfig,
    /// The active network
    network: &'a str,
    /// The client of the active network
    client: &'a C,
}

impl<'a, C: ChainClient> ConfiguredAccounts<'a, C> {
    /// Constructor
    pub fn new(config: &'a DeployConfig, network: &'a str, client: &'a C) -> Self {
        Self {
            config,
            network,
            client,
        }
    }
}

#[async_trait]
impl<C: ChainClient> AccountResolver for ConfiguredAccounts<'_, C> {
    async fn get_named_accounts(&self) -> Result<NamedAccounts, ScriptError> {
        let available = self.client.accounts().await?;
        Ok(NamedAccounts::resolve(
            &self.config.named_accounts,
            self.network,
            &available,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use alloy::primitives::Address;

    use crate::config::{AccountRef, NamedAccount};

    use super::NamedAccounts;

    /// The named accounts used across these tests
    fn named_accounts() -> BTreeMap<String, NamedAccount> {
        BTreeMap::from([
            (
                "deployer".to_string(),
                NamedAccount {
                    default: AccountRef::Index(0),
                    networks: BTreeMap::from([(
                        "mainnet".to_string(),
                        AccountRef::Address(Address::repeat_byte(0xee)),
                    )]),
                },
            ),
            (
                "treasury".to_string(),
                NamedAccount {
                    default: AccountRef::Index(3),
                    networks: BTreeMap::new(),
                },
            ),
        ])
    }

    #[test]
    fn test_default_index() {
        let available = [Address::repeat_byte(1), Address::repeat_byte(2)];
        let accounts = NamedAccounts::resolve(&named_accounts(), "cronos-testnet", &available);

        assert_eq!(accounts.get("deployer").unwrap(), Address::repeat_byte(1));
    }

    #[test]
    fn test_network_override() {
        let accounts = NamedAccounts::resolve(&named_accounts(), "mainnet", &[]);
        assert_eq!(accounts.get("deployer").unwrap(), Address::repeat_byte(0xee));
    }

    #[test]
    fn test_index_out_of_range() {
        let available = [Address::repeat_byte(1)];
        let accounts = NamedAccounts::resolve(&named_accounts(), "cronos-testnet", &available);

        let err = accounts.get("treasury").unwrap_err();
        assert!(err.is_resolution());
        assert_eq!(accounts.iter().count(), 1);
    }

    #[test]
    fn test_undefined_role() {
        let accounts = NamedAccounts::resolve(&BTreeMap::new(), "cronos-testnet", &[]);
        assert!(accounts.get("deployer").unwrap_err().is_resolution());
    }
}
