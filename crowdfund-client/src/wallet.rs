use async_trait::async_trait;
use ethers::{
    abi::Abi,
    prelude::*,
    providers::{Http, Provider},
    signers::{LocalWallet, Signer},
};
use std::{str::FromStr, sync::Arc, time::Duration};

use crate::contract::{CrowdfundingContract, EthersCrowdfunding};
use crate::errors::{ClientError, Result};

const RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// The wallet collaborator: owns keys, exposes accounts, signs for the
/// contract clients it binds.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Asks the wallet for account access.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Builds a contract client at `address` that signs with this wallet.
    async fn bind_contract(&self, address: Address, abi: Abi) -> Result<Arc<dyn CrowdfundingContract>>;
}

/// Connection state of the wallet/contract session. The contract handle lives
/// here and nowhere else.
#[derive(Default)]
pub enum WalletSession {
    #[default]
    Disconnected,
    Connected {
        account: Address,
        contract: Arc<dyn CrowdfundingContract>,
    },
}

impl WalletSession {
    pub fn account(&self) -> Option<Address> {
        match self {
            Self::Disconnected => None,
            Self::Connected { account, .. } => Some(*account),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => f.write_str("Disconnected"),
            Self::Connected { account, .. } => {
                f.debug_struct("Connected").field("account", account).finish_non_exhaustive()
            }
        }
    }
}

/// A wallet backed by a local private key and a JSON-RPC node.
pub struct LocalKeyWallet {
    client: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
}

impl LocalKeyWallet {
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ClientError::Config(format!("Invalid RPC_URL {rpc_url}: {e}")))?
            .interval(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS));
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| ClientError::Contract(e.to_string()))?
            .as_u64();
        let wallet = LocalWallet::from_str(private_key)
            .map_err(|e| ClientError::Config(format!("Invalid PRIVATE_KEY: {e}")))?
            .with_chain_id(chain_id);
        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
        })
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }
}

#[async_trait]
impl Wallet for LocalKeyWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.client.address()])
    }

    async fn bind_contract(&self, address: Address, abi: Abi) -> Result<Arc<dyn CrowdfundingContract>> {
        Ok(Arc::new(EthersCrowdfunding::new(address, abi, Arc::clone(&self.client))))
    }
}
