use std::env;

use crate::errors::{ClientError, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub contract_address: String,
    /// Base URL of the compiled contract artifacts.
    pub abi_url: String,
    pub backend_url: String,
    /// Absent means there is no wallet to connect.
    pub private_key: Option<String>,
    pub page_size: usize,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let page_size = parse_var("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ClientError::Config("PAGE_SIZE must be at least 1".to_string()));
        }
        Ok(Self {
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string()),
            contract_address: required("CONTRACT_ADDRESS")?,
            abi_url: required("ABI_URL")?,
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            private_key: env::var("PRIVATE_KEY").ok().filter(|k| !k.trim().is_empty()),
            page_size,
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| ClientError::Config(format!("{key} must be set")))
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClientError::Config(format!("Invalid {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}
