//! Runtime source of the contract interface description.

use async_trait::async_trait;
use ethers::abi::Abi;
use serde_json::Value;
use tracing::debug;

use crate::errors::{ClientError, Result};

const ARTIFACT_PATH: &str = "Crowdfunding.sol/Crowdfunding.json";

#[async_trait]
pub trait AbiSource: Send + Sync {
    async fn fetch_abi(&self) -> Result<Abi>;
}

/// Fetches the compiled contract artifact over HTTP and reads its `abi` field.
pub struct HttpAbiSource {
    client: reqwest::Client,
    url: String,
}

impl HttpAbiSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: artifact_url(base_url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AbiSource for HttpAbiSource {
    async fn fetch_abi(&self) -> Result<Abi> {
        debug!(url = %self.url, "fetching contract interface");
        let artifact = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        abi_from_artifact(&artifact)
    }
}

pub fn artifact_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), ARTIFACT_PATH)
}

/// Extracts the `abi` array from a compiled artifact document.
pub fn abi_from_artifact(artifact: &Value) -> Result<Abi> {
    let abi = artifact
        .get("abi")
        .ok_or_else(|| ClientError::Abi("artifact has no abi field".to_string()))?;
    serde_json::from_value(abi.clone()).map_err(|e| ClientError::Abi(e.to_string()))
}
