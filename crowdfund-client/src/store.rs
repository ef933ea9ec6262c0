//! Wallet/contract session store.
//!
//! [`DAppStore`] is a cheap handle around the shared state. The query and
//! mutation facades are implemented on it in `projects.rs` and
//! `mutations.rs`. The lock is never held across a call to an external
//! collaborator, so concurrent actions interleave and the last write wins.

use ethers::types::Address;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::abi::AbiSource;
use crate::contract::CrowdfundingContract;
use crate::errors::{ClientError, Result};
use crate::models::PaginationState;
use crate::wallet::{Wallet, WalletSession};

/// What happened to a dispatched action. Failures are already logged and
/// recorded in [`DAppStore::last_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A precondition (connected contract, valid page) was not met. Nothing ran.
    Skipped,
    Completed,
    Failed,
}

#[derive(Debug, Default)]
pub struct DAppState {
    pub wallet: WalletSession,
    pub projects: PaginationState,
    pub last_error: Option<String>,
}

#[derive(Clone)]
pub struct DAppStore {
    pub(crate) state: Arc<RwLock<DAppState>>,
    wallet: Option<Arc<dyn Wallet>>,
    abi_source: Arc<dyn AbiSource>,
    page_size: usize,
}

impl DAppStore {
    /// `wallet` is `None` when no wallet collaborator is present.
    pub fn new(wallet: Option<Arc<dyn Wallet>>, abi_source: Arc<dyn AbiSource>, page_size: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(DAppState::default())),
            wallet,
            abi_source,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Connects the wallet and binds a contract client at `contract_address`.
    /// A repeated call replaces the previous session in one step. The page is
    /// dropped when the account changes.
    pub async fn connect_wallet(&self, contract_address: &str) -> ActionOutcome {
        match self.open_session(contract_address).await {
            Ok(session) => {
                let account = session.account();
                let mut state = self.state.write().await;
                if state.wallet.account() != account {
                    state.projects = PaginationState::default();
                }
                state.wallet = session;
                state.last_error = None;
                drop(state);
                info!(account = ?account, "wallet connected");
                ActionOutcome::Completed
            }
            Err(e) => {
                self.record_failure("Error connecting wallet", &e).await;
                ActionOutcome::Failed
            }
        }
    }

    async fn open_session(&self, contract_address: &str) -> Result<WalletSession> {
        let address: Address = contract_address.trim().parse().map_err(|_| {
            ClientError::InvalidInput(format!("invalid contract address {contract_address}"))
        })?;
        let wallet = self.wallet.as_ref().ok_or(ClientError::WalletUnavailable)?;
        let abi = self.abi_source.fetch_abi().await?;
        let account = wallet
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::NoAccounts)?;
        let contract = wallet.bind_contract(address, abi).await?;
        Ok(WalletSession::Connected { account, contract })
    }

    /// Drops the wallet session and the page it filled.
    pub async fn disconnect(&self) {
        let mut state = self.state.write().await;
        state.wallet = WalletSession::Disconnected;
        state.projects = PaginationState::default();
        info!("wallet disconnected");
    }

    pub async fn account(&self) -> Option<Address> {
        self.state.read().await.wallet.account()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.wallet.is_connected()
    }

    /// Snapshot of the current page for rendering.
    pub async fn projects(&self) -> PaginationState {
        self.state.read().await.projects.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.last_error = None;
    }

    pub(crate) async fn contract(&self) -> Option<Arc<dyn CrowdfundingContract>> {
        match &self.state.read().await.wallet {
            WalletSession::Connected { contract, .. } => Some(Arc::clone(contract)),
            WalletSession::Disconnected => None,
        }
    }

    pub(crate) async fn connected(&self) -> Option<(Address, Arc<dyn CrowdfundingContract>)> {
        match &self.state.read().await.wallet {
            WalletSession::Connected { account, contract } => Some((*account, Arc::clone(contract))),
            WalletSession::Disconnected => None,
        }
    }

    pub(crate) async fn record_failure(&self, context: &str, err: &ClientError) {
        match err {
            ClientError::InvalidInput(_) | ClientError::WalletUnavailable => {
                warn!("{context}: {err}")
            }
            _ => error!("{context}: {err}"),
        }
        self.state.write().await.last_error = Some(format!("{context}: {err}"));
    }
}
