//! The chain client used to query accounts and submit contract creations

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use tracing::debug;

use crate::{config::NetworkConfig, errors::ScriptError};

/// A contract created on chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedContract {
    /// The address of the new contract
    pub address: Address,
    /// The hash of the creation transaction
    pub transaction_hash: TxHash,
    /// The block the creation transaction was included in
    pub block_number: Option<u64>,
}

/// The chain operations the deploy scripts depend on
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The ID of the connected chain
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// The accounts available for signing, in order
    async fn accounts(&self) -> Result<Vec<Address>, ScriptError>;

    /// Submit a contract creation transaction from the given account and wait
    /// for it to be included
    async fn create_contract(
        &self,
        from: Address,
        init_code: Bytes,
    ) -> Result<CreatedContract, ScriptError>;
}

/// A [`ChainClient`] backed by a JSON-RPC provider
#[derive(Clone)]
pub struct RpcClient {
    /// The provider, with the network's signers attached
    provider: DynProvider,
    /// The addresses of the local signers, in config order
    signers: Vec<Address>,
}

/// Sets up the client for the given network, attaching a wallet holding the
/// network's signers.
///
/// If the network declares an expected chain ID, it is checked against the
/// node.
pub async fn setup_client(network: &NetworkConfig) -> Result<RpcClient, ScriptError> {
    let url = network
        .rpc_url()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signers = network.signers()?;
    let signer_addresses = signers.iter().map(|s| s.address()).collect::<Vec<_>>();

    let provider = match signers.split_first() {
        Some((first, rest)) => {
            let mut wallet = EthereumWallet::from(first.clone());
            for signer in rest {
                wallet.register_signer(signer.clone());
            }
            DynProvider::new(ProviderBuilder::new().wallet(wallet).connect_http(url))
        }
        None => DynProvider::new(ProviderBuilder::new().connect_http(url)),
    };

    let client = RpcClient {
        provider,
        signers: signer_addresses,
    };

    if let Some(expected) = network.chain_id {
        let chain_id = client.chain_id().await?;
        if chain_id != expected {
            return Err(ScriptError::ClientInitialization(format!(
                "expected chain {expected}, node reports chain {chain_id}"
            )));
        }
    }

    Ok(client)
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn accounts(&self) -> Result<Vec<Address>, ScriptError> {
        if !self.signers.is_empty() {
            return Ok(self.signers.clone());
        }

        // Without local keys, fall back to the accounts managed by the node
        self.provider
            .get_accounts()
            .await
            .map_err(|e| ScriptError::Resolution(e.to_string()))
    }

    async fn create_contract(
        &self,
        from: Address,
        init_code: Bytes,
    ) -> Result<CreatedContract, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(init_code);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        debug!("sent creation transaction {:#x}", pending_tx.tx_hash());

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "creation transaction {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt of {:#x} has no contract address",
                receipt.transaction_hash
            ))
        })?;

        Ok(CreatedContract {
            address,
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}
