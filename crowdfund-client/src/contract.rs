//! Access to the crowdfunding contract.
//!
//! The stores only talk to [`CrowdfundingContract`]. [`EthersCrowdfunding`]
//! implements it with a dynamic ethers `Contract` bound to the interface
//! description fetched at connect time.

use async_trait::async_trait;
use ethers::{
    abi::{Abi, Token},
    contract::{Contract, ContractError},
    prelude::*,
};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{ClientError, Result};
use crate::models::Project;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// A state-changing call, validated and converted to contract units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    CreateProject {
        name: String,
        description: String,
        goal: U256,
        duration_days: U256,
    },
    /// `value` is sent as the transaction value of the payable method.
    Contribute { project_id: U256, value: U256 },
    Refund { project_id: U256 },
    WithdrawFunds { project_id: U256 },
}

impl ContractCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::CreateProject { .. } => "createProject",
            Self::Contribute { .. } => "contribute",
            Self::Refund { .. } => "refund",
            Self::WithdrawFunds { .. } => "withdrawFunds",
        }
    }
}

#[async_trait]
pub trait CrowdfundingContract: Send + Sync {
    /// `getProjects(page, pageSize)`, with a 1-based page.
    async fn get_projects(&self, page: usize, page_size: usize) -> Result<Vec<Project>>;

    /// `getProjectsByOwner(owner, startIndex, pageSize)`.
    async fn get_projects_by_owner(
        &self,
        owner: Address,
        start_index: usize,
        page_size: usize,
    ) -> Result<Vec<Project>>;

    /// Signs and broadcasts the call. Resolves once the node accepted it.
    async fn submit(&self, call: ContractCall) -> Result<TxHash>;

    /// Waits for the transaction to be mined successfully.
    async fn confirm(&self, tx_hash: TxHash) -> Result<()>;
}

pub struct EthersCrowdfunding {
    client: Arc<SignerClient>,
    contract: Contract<SignerClient>,
}

impl EthersCrowdfunding {
    pub fn new(address: Address, abi: Abi, client: Arc<SignerClient>) -> Self {
        let contract = Contract::new(address, abi, Arc::clone(&client));
        Self { client, contract }
    }

    async fn read_projects<T: ethers::abi::Tokenize>(&self, method: &str, args: T) -> Result<Vec<Project>> {
        let token = self
            .contract
            .method::<_, Token>(method, args)
            .map_err(|e| ClientError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(describe_contract_error)?;
        Project::list_from_token(token)
    }
}

#[async_trait]
impl CrowdfundingContract for EthersCrowdfunding {
    async fn get_projects(&self, page: usize, page_size: usize) -> Result<Vec<Project>> {
        debug!(page, page_size, "getProjects");
        self.read_projects("getProjects", (U256::from(page), U256::from(page_size)))
            .await
    }

    async fn get_projects_by_owner(
        &self,
        owner: Address,
        start_index: usize,
        page_size: usize,
    ) -> Result<Vec<Project>> {
        debug!(%owner, start_index, page_size, "getProjectsByOwner");
        self.read_projects(
            "getProjectsByOwner",
            (owner, U256::from(start_index), U256::from(page_size)),
        )
        .await
    }

    async fn submit(&self, call: ContractCall) -> Result<TxHash> {
        let method = call.method();
        let abi_err = |e: ethers::contract::AbiError| ClientError::Abi(e.to_string());
        let tx = match call {
            ContractCall::CreateProject { name, description, goal, duration_days } => self
                .contract
                .method::<_, ()>(method, (name, description, goal, duration_days))
                .map_err(abi_err)?,
            ContractCall::Contribute { project_id, value } => self
                .contract
                .method::<_, ()>(method, project_id)
                .map_err(abi_err)?
                .value(value),
            ContractCall::Refund { project_id } | ContractCall::WithdrawFunds { project_id } => self
                .contract
                .method::<_, ()>(method, project_id)
                .map_err(abi_err)?,
        };
        let pending = tx.send().await.map_err(describe_contract_error)?;
        Ok(pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<()> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .await
            .map_err(|e| ClientError::Contract(e.to_string()))?
            .ok_or_else(|| ClientError::TransactionDropped(hex::encode(tx_hash)))?;
        if receipt.status == Some(U64::zero()) {
            return Err(ClientError::TransactionReverted(hex::encode(tx_hash)));
        }
        Ok(())
    }
}

fn describe_contract_error(e: ContractError<SignerClient>) -> ClientError {
    if let Some(reason) = e.decode_revert::<String>() {
        return ClientError::Contract(format!("Revert: {reason}"));
    }
    if let ContractError::Revert(data) = &e {
        return ClientError::Contract(format!("Unknown Custom Revert: 0x{}", hex::encode(data)));
    }
    ClientError::Contract(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_map_to_contract_methods() {
        let id = U256::from(3u8);
        assert_eq!(ContractCall::Refund { project_id: id }.method(), "refund");
        assert_eq!(ContractCall::WithdrawFunds { project_id: id }.method(), "withdrawFunds");
        assert_eq!(
            ContractCall::Contribute { project_id: id, value: U256::one() }.method(),
            "contribute"
        );
        let create = ContractCall::CreateProject {
            name: "Art".to_string(),
            description: "desc".to_string(),
            goal: U256::exp10(18),
            duration_days: U256::from(30u8),
        };
        assert_eq!(create.method(), "createProject");
    }
}
