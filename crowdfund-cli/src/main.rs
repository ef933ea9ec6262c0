mod app;

use anyhow::Result;
use app::App;
use crowdfund_client::{
    abi::HttpAbiSource,
    auth::HttpAuthBackend,
    config::Config,
    wallet::{LocalKeyWallet, Wallet},
    DAppStore,
};
use std::{sync::Arc, time::Duration};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Load configuration
    let config = Config::from_env()?;
    println!("✅ Configuration loaded.");

    // 2. HTTP client shared by the auth backend and the artifact fetch
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;
    let abi_source = Arc::new(HttpAbiSource::new(http.clone(), &config.abi_url));
    let auth = Arc::new(HttpAuthBackend::new(http, &config.backend_url));

    // 3. Wallet, if a signing key is configured
    let wallet: Option<Arc<dyn Wallet>> = match &config.private_key {
        Some(private_key) => match LocalKeyWallet::connect(&config.rpc_url, private_key).await {
            Ok(wallet) => {
                println!("✅ Wallet ready: {:#x}", wallet.address());
                Some(Arc::new(wallet) as Arc<dyn Wallet>)
            }
            Err(e) => {
                warn!("wallet unavailable: {e}");
                None
            }
        },
        None => {
            println!("No PRIVATE_KEY set, running without a wallet.");
            None
        }
    };

    println!("-> Contract: {}", config.contract_address);
    println!("-> Backend: {}", config.backend_url);
    println!("-> Page size: {}", config.page_size);

    let store = DAppStore::new(wallet, abi_source, config.page_size);
    App::new(store, auth, config.contract_address.clone()).run().await
}
