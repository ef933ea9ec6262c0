// --- Project Models ---

use ethers::abi::Token;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};

/// Lifecycle of a project as reported by the contract. The client never
/// derives a transition itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
#[repr(u8)]
pub enum ProjectStatus {
    Active = 0,
    Successful = 1,
    Failed = 2,
    Withdrawn = 3,
}

impl ProjectStatus {
    pub fn from_discriminant(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Active),
            1 => Some(Self::Successful),
            2 => Some(Self::Failed),
            3 => Some(Self::Withdrawn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Successful => "Successful",
            Self::Failed => "Failed",
            Self::Withdrawn => "Withdrawn",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub project_id: U256,
    pub owner: Address,
    pub name: String,
    pub description: String,
    pub goal: U256,         // wei
    pub funds_raised: U256, // wei
    pub deadline: u64,      // unix seconds
    pub token: Address,
    pub status: ProjectStatus,
    pub exists: bool,
}

impl Project {
    /// Decodes one `Project` struct as returned by the contract, i.e. a tuple of
    /// `(uint256, address, string, string, uint256, uint256, uint256, address, uint8, bool)`.
    pub fn from_token(token: Token) -> Result<Self> {
        let fields = token
            .into_tuple()
            .ok_or_else(|| ClientError::Decode("project is not a tuple".to_string()))?;
        if fields.len() != 10 {
            return Err(ClientError::Decode(format!(
                "project tuple has {} fields, expected 10",
                fields.len()
            )));
        }
        let mut fields = fields.into_iter();
        let mut next = |name: &str| {
            fields
                .next()
                .ok_or_else(|| ClientError::Decode(format!("missing field {name}")))
        };

        let project_id = uint(next("projectId")?, "projectId")?;
        let owner = address(next("owner")?, "owner")?;
        let name = string(next("name")?, "name")?;
        let description = string(next("description")?, "description")?;
        let goal = uint(next("goal")?, "goal")?;
        let funds_raised = uint(next("fundsRaised")?, "fundsRaised")?;
        let deadline = uint(next("deadline")?, "deadline")?;
        if deadline.bits() > 64 {
            return Err(ClientError::Decode(format!("deadline {deadline} out of range")));
        }
        let token = address(next("token")?, "token")?;
        let raw_status = uint(next("status")?, "status")?;
        let status = if raw_status.bits() <= 8 {
            ProjectStatus::from_discriminant(raw_status.as_u32() as u8)
        } else {
            None
        }
        .ok_or_else(|| ClientError::Decode(format!("unknown project status {raw_status}")))?;
        let exists = next("exists")?
            .into_bool()
            .ok_or_else(|| ClientError::Decode("field exists is not a bool".to_string()))?;

        Ok(Self {
            project_id,
            owner,
            name,
            description,
            goal,
            funds_raised,
            deadline: deadline.as_u64(),
            token,
            status,
            exists,
        })
    }

    /// Decodes a `Project[]` return value, skipping empty slots.
    pub fn list_from_token(token: Token) -> Result<Vec<Self>> {
        let entries = match token {
            Token::Array(entries) | Token::FixedArray(entries) => entries,
            other => {
                return Err(ClientError::Decode(format!(
                    "expected an array of projects, got {other:?}"
                )))
            }
        };
        let mut projects = Vec::with_capacity(entries.len());
        for entry in entries {
            let project = Self::from_token(entry)?;
            if project.exists {
                projects.push(project);
            }
        }
        Ok(projects)
    }

    pub fn to_token(&self) -> Token {
        Token::Tuple(vec![
            Token::Uint(self.project_id),
            Token::Address(self.owner),
            Token::String(self.name.clone()),
            Token::String(self.description.clone()),
            Token::Uint(self.goal),
            Token::Uint(self.funds_raised),
            Token::Uint(U256::from(self.deadline)),
            Token::Address(self.token),
            Token::Uint(U256::from(self.status as u8)),
            Token::Bool(self.exists),
        ])
    }
}

fn uint(token: Token, field: &str) -> Result<U256> {
    token
        .into_uint()
        .ok_or_else(|| ClientError::Decode(format!("field {field} is not a uint")))
}

fn address(token: Token, field: &str) -> Result<Address> {
    token
        .into_address()
        .ok_or_else(|| ClientError::Decode(format!("field {field} is not an address")))
}

fn string(token: Token, field: &str) -> Result<String> {
    token
        .into_string()
        .ok_or_else(|| ClientError::Decode(format!("field {field} is not a string")))
}

// --- Paging Models ---

/// Which query filled the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectScope {
    #[default]
    All,
    Mine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    pub current_page: usize,
    pub total_pages: usize,
    pub items: Vec<Project>,
    pub scope: ProjectScope,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            items: Vec::new(),
            scope: ProjectScope::All,
        }
    }
}

impl PaginationState {
    pub fn contains_page(&self, page: usize) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

// --- Auth Models ---

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn sample(id: u64, status: ProjectStatus) -> Project {
        Project {
            project_id: U256::from(id),
            owner: Address::repeat_byte(0x11),
            name: format!("Project {id}"),
            description: "desc".to_string(),
            goal: U256::from(1000u64),
            funds_raised: U256::from(250u64),
            deadline: 1_700_000_000,
            token: Address::repeat_byte(0x22),
            status,
            exists: true,
        }
    }

    #[test]
    fn decodes_contract_tuple() {
        let project = sample(7, ProjectStatus::Failed);
        let decoded = Project::from_token(project.to_token()).unwrap();
        assert_eq!(decoded, project);
    }

    #[test]
    fn rejects_unknown_status() {
        let mut token = sample(1, ProjectStatus::Active).to_token();
        if let Token::Tuple(fields) = &mut token {
            fields[8] = Token::Uint(U256::from(9u8));
        }
        assert!(matches!(Project::from_token(token), Err(ClientError::Decode(_))));
    }

    #[test]
    fn rejects_short_tuple() {
        let token = Token::Tuple(vec![Token::Uint(U256::one())]);
        assert!(Project::from_token(token).is_err());
    }

    #[test]
    fn list_skips_empty_slots() {
        let mut empty = sample(2, ProjectStatus::Active);
        empty.exists = false;
        let token = Token::Array(vec![
            sample(1, ProjectStatus::Active).to_token(),
            empty.to_token(),
        ]);
        let projects = Project::list_from_token(token).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project_id, U256::one());
    }

    #[test]
    fn page_bounds() {
        let state = PaginationState { total_pages: 3, ..Default::default() };
        assert!(!state.contains_page(0));
        assert!(state.contains_page(1));
        assert!(state.contains_page(3));
        assert!(!state.contains_page(4));
    }
}
