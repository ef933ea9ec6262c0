//! In-process stand-ins for the contract, wallet and ABI source.

#![allow(dead_code)]

use async_trait::async_trait;
use crowdfund_client::{
    abi::{abi_from_artifact, AbiSource},
    contract::{ContractCall, CrowdfundingContract},
    errors::{ClientError, Result},
    models::{Project, ProjectStatus},
    wallet::Wallet,
    DAppStore,
};
use ethers::{
    abi::Abi,
    types::{Address, TxHash, U256},
};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use tokio::sync::Notify;

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const PAGE_SIZE: usize = 10;

pub fn alice() -> Address {
    Address::repeat_byte(0xa1)
}

pub fn bob() -> Address {
    Address::repeat_byte(0xb0)
}

pub fn project(id: u64, owner: Address, status: ProjectStatus) -> Project {
    Project {
        project_id: U256::from(id),
        owner,
        name: format!("Project {id}"),
        description: format!("Description {id}"),
        goal: U256::from(1000u64),
        funds_raised: U256::from(250u64),
        deadline: 1_700_000_000,
        token: Address::from_low_u64_be(0x1000 + id),
        status,
        exists: true,
    }
}

#[derive(Default)]
pub struct FakeContract {
    pub projects: Mutex<Vec<Project>>,
    /// Every call in arrival order, e.g. `getProjects:2:10`, `submit:refund`, `confirm`.
    pub log: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<ContractCall>>,
    pending: Mutex<HashMap<TxHash, ContractCall>>,
    pub fail_reads: AtomicBool,
    pub reject_submit: AtomicBool,
    pub drop_confirm: AtomicBool,
    /// Notified after each accepted submission.
    pub submitted: Notify,
    /// When set, confirmation waits for this to be notified.
    pub confirm_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeContract {
    pub fn with_projects(projects: Vec<Project>) -> Arc<Self> {
        let fake = Self::default();
        *fake.projects.lock().unwrap() = projects;
        Arc::new(fake)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn reads(&self) -> usize {
        self.log().iter().filter(|e| e.starts_with("get")).count()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn apply(&self, call: &ContractCall) {
        let mut projects = self.projects.lock().unwrap();
        match call {
            ContractCall::CreateProject { name, description, goal, .. } => {
                let id = projects.len() as u64;
                let mut created = project(id, alice(), ProjectStatus::Active);
                created.name = name.clone();
                created.description = description.clone();
                created.goal = *goal;
                created.funds_raised = U256::zero();
                projects.push(created);
            }
            ContractCall::Contribute { project_id, value } => {
                if let Some(p) = projects.iter_mut().find(|p| p.project_id == *project_id) {
                    p.funds_raised += *value;
                }
            }
            ContractCall::Refund { .. } => {}
            ContractCall::WithdrawFunds { project_id } => {
                if let Some(p) = projects.iter_mut().find(|p| p.project_id == *project_id) {
                    p.status = ProjectStatus::Withdrawn;
                }
            }
        }
    }
}

#[async_trait]
impl CrowdfundingContract for FakeContract {
    async fn get_projects(&self, page: usize, page_size: usize) -> Result<Vec<Project>> {
        self.record(format!("getProjects:{page}:{page_size}"));
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Contract("connection refused".to_string()));
        }
        let projects = self.projects.lock().unwrap();
        Ok(projects
            .iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect())
    }

    async fn get_projects_by_owner(
        &self,
        owner: Address,
        start_index: usize,
        page_size: usize,
    ) -> Result<Vec<Project>> {
        self.record(format!("getProjectsByOwner:{owner:#x}:{start_index}:{page_size}"));
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Contract("connection refused".to_string()));
        }
        let projects = self.projects.lock().unwrap();
        Ok(projects
            .iter()
            .filter(|p| p.owner == owner)
            .skip(start_index)
            .take(page_size)
            .cloned()
            .collect())
    }

    async fn submit(&self, call: ContractCall) -> Result<TxHash> {
        self.record(format!("submit:{}", call.method()));
        if self.reject_submit.load(Ordering::SeqCst) {
            return Err(ClientError::Contract("user rejected transaction".to_string()));
        }
        let tx_hash = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call.clone());
            TxHash::from_low_u64_be(calls.len() as u64)
        };
        self.pending.lock().unwrap().insert(tx_hash, call);
        self.submitted.notify_one();
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<()> {
        let gate = self.confirm_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("confirm".to_string());
        if self.drop_confirm.load(Ordering::SeqCst) {
            return Err(ClientError::TransactionDropped(hex_of(tx_hash)));
        }
        let call = self.pending.lock().unwrap().remove(&tx_hash);
        if let Some(call) = call {
            self.apply(&call);
        }
        Ok(())
    }
}

fn hex_of(tx_hash: TxHash) -> String {
    format!("{tx_hash:x}")
}

pub struct FakeWallet {
    pub accounts: Mutex<Vec<Address>>,
    pub reject: bool,
    pub contract: Arc<FakeContract>,
    pub bound_to: Mutex<Option<Address>>,
}

impl FakeWallet {
    pub fn new(account: Address, contract: Arc<FakeContract>) -> Arc<Self> {
        Arc::new(Self {
            accounts: Mutex::new(vec![account]),
            reject: false,
            contract,
            bound_to: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Wallet for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        if self.reject {
            return Err(ClientError::WalletRejected("User rejected the request.".to_string()));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn bind_contract(&self, address: Address, _abi: Abi) -> Result<Arc<dyn CrowdfundingContract>> {
        *self.bound_to.lock().unwrap() = Some(address);
        Ok(self.contract.clone())
    }
}

pub struct StaticAbi {
    pub reachable: bool,
}

#[async_trait]
impl AbiSource for StaticAbi {
    async fn fetch_abi(&self) -> Result<Abi> {
        if !self.reachable {
            return Err(ClientError::Abi("artifact unreachable".to_string()));
        }
        abi_from_artifact(&json!({ "abi": [] }))
    }
}

pub fn store_with(wallet: Option<Arc<FakeWallet>>) -> DAppStore {
    let wallet = wallet.map(|w| w as Arc<dyn Wallet>);
    DAppStore::new(wallet, Arc::new(StaticAbi { reachable: true }), PAGE_SIZE)
}

/// A store connected as alice to a contract holding `count` projects, the
/// first half owned by alice.
pub async fn connected_store(count: u64) -> (DAppStore, Arc<FakeContract>) {
    let projects = (0..count)
        .map(|id| {
            let owner = if id < count / 2 { alice() } else { bob() };
            project(id, owner, ProjectStatus::Active)
        })
        .collect();
    let contract = FakeContract::with_projects(projects);
    let store = store_with(Some(FakeWallet::new(alice(), contract.clone())));
    store.connect_wallet(CONTRACT).await;
    (store, contract)
}
