//! Mutation facade: validate, submit, wait for confirmation, then refresh.

use ethers::{types::U256, utils::parse_ether};
use std::sync::Arc;
use tracing::info;

use crate::contract::{ContractCall, CrowdfundingContract};
use crate::errors::{ClientError, Result};
use crate::store::{ActionOutcome, DAppStore};

const MAX_ETHER_DECIMALS: usize = 18;

impl DAppStore {
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
        goal: &str,
        duration_in_days: &str,
    ) -> ActionOutcome {
        let Some(contract) = self.contract().await else {
            return ActionOutcome::Skipped;
        };
        let call = create_project_call(name, description, goal, duration_in_days);
        self.execute(contract, call, "Error creating project").await
    }

    /// Sends `amount` ether to the project. Whether the project still accepts
    /// contributions is left to the contract.
    pub async fn contribute(&self, project_id: &str, amount: &str) -> ActionOutcome {
        let Some(contract) = self.contract().await else {
            return ActionOutcome::Skipped;
        };
        let call = parse_project_id(project_id).and_then(|project_id| {
            Ok(ContractCall::Contribute {
                project_id,
                value: parse_ether_amount("amount", amount)?,
            })
        });
        self.execute(contract, call, "Contribution error").await
    }

    pub async fn refund(&self, project_id: &str) -> ActionOutcome {
        let Some(contract) = self.contract().await else {
            return ActionOutcome::Skipped;
        };
        let call = parse_project_id(project_id).map(|project_id| ContractCall::Refund { project_id });
        self.execute(contract, call, "Refund error").await
    }

    pub async fn withdraw_funds(&self, project_id: &str) -> ActionOutcome {
        let Some(contract) = self.contract().await else {
            return ActionOutcome::Skipped;
        };
        let call =
            parse_project_id(project_id).map(|project_id| ContractCall::WithdrawFunds { project_id });
        self.execute(contract, call, "Withdraw error").await
    }

    async fn execute(
        &self,
        contract: Arc<dyn CrowdfundingContract>,
        call: Result<ContractCall>,
        context: &str,
    ) -> ActionOutcome {
        let call = match call {
            Ok(call) => call,
            Err(e) => {
                self.record_failure(context, &e).await;
                return ActionOutcome::Failed;
            }
        };
        let method = call.method();

        let tx_hash = match contract.submit(call).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                self.record_failure(context, &e).await;
                return ActionOutcome::Failed;
            }
        };
        info!(method, tx = ?tx_hash, "transaction sent, waiting for confirmation");

        if let Err(e) = contract.confirm(tx_hash).await {
            self.record_failure(context, &e).await;
            return ActionOutcome::Failed;
        }
        info!(method, tx = ?tx_hash, "transaction confirmed");

        let page = self.state.read().await.projects.current_page;
        self.load_all_projects(page).await;
        ActionOutcome::Completed
    }
}

fn create_project_call(
    name: &str,
    description: &str,
    goal: &str,
    duration_in_days: &str,
) -> Result<ContractCall> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::InvalidInput("name is required".to_string()));
    }
    Ok(ContractCall::CreateProject {
        name: name.to_string(),
        description: description.trim().to_string(),
        goal: parse_ether_amount("goal", goal)?,
        duration_days: parse_duration_days(duration_in_days)?,
    })
}

/// Converts a decimal ether string into wei. Signs, exponents and anything
/// finer than one wei are rejected, as is zero.
pub fn parse_ether_amount(field: &str, raw: &str) -> Result<U256> {
    let invalid = |why: &str| ClientError::InvalidInput(format!("{field} {why}: {raw:?}"));
    let value = raw.trim();
    if value.is_empty() {
        return Err(ClientError::InvalidInput(format!("{field} is required")));
    }
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.map_or(true, all_digits) {
        return Err(invalid("is not a decimal number"));
    }
    if whole.is_empty() && fraction.map_or(true, str::is_empty) {
        return Err(invalid("is not a decimal number"));
    }
    if fraction.map_or(0, str::len) > MAX_ETHER_DECIMALS {
        return Err(invalid("has more than 18 decimals"));
    }

    let normalized = match fraction {
        Some(fraction) if !fraction.is_empty() => {
            format!("{}.{}", if whole.is_empty() { "0" } else { whole }, fraction)
        }
        _ => whole.to_string(),
    };
    let wei = parse_ether(&normalized).map_err(|e| invalid(&e.to_string()))?;
    if wei.is_zero() {
        return Err(invalid("must be greater than zero"));
    }
    Ok(wei)
}

pub fn parse_duration_days(raw: &str) -> Result<U256> {
    let days: u64 = raw.trim().parse().map_err(|_| {
        ClientError::InvalidInput(format!("duration must be a whole number of days: {raw:?}"))
    })?;
    if days == 0 {
        return Err(ClientError::InvalidInput("duration must be at least one day".to_string()));
    }
    Ok(U256::from(days))
}

pub fn parse_project_id(raw: &str) -> Result<U256> {
    let value = raw.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::InvalidInput(format!("invalid project id: {raw:?}")));
    }
    U256::from_dec_str(value)
        .map_err(|_| ClientError::InvalidInput(format!("project id out of range: {raw:?}")))
}
