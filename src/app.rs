use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use crate::core::{
    alerts::transport::DiscordWebhook,
    config::{ConfigManager, WatchConfig},
    coordinator::Coordinator,
    error::{Error, Result},
    rpc::JsonRpcLedger,
};

/// Directory holding `settings.json`.
const CONFIG_DIR_VAR: &str = "STAMINA_WATCHER_CONFIG_DIR";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stamina_watcher=info"));
    // A second init (e.g. from an embedding binary) is not an error.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config() -> Result<WatchConfig> {
    let config_dir = std::env::var(CONFIG_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let mut settings = ConfigManager::new(config_dir).load();
    settings.apply_env(|key| std::env::var(key).ok());
    settings.validate()
}

/// Poll forever. Returns only on startup failures and fatal errors.
pub async fn watch(config: WatchConfig) -> Result<()> {
    let client = Client::builder()
        .build()
        .map_err(|e| Error::Configuration(format!("Cannot build HTTP client: {e}")))?;
    let ledger = Arc::new(JsonRpcLedger::new(
        client.clone(),
        config.provider_url.clone(),
        config.contracts,
    ));
    let transport = Arc::new(DiscordWebhook::new(client, config.webhook_url.clone()));
    let wait_timeout = config.wait_timeout;

    log::info!(
        "Watching {} account(s) via {}",
        config.accounts.len(),
        config.provider_url
    );
    let mut coordinator = Coordinator::initialize(config, ledger, transport).await?;

    loop {
        log::info!("Checking for stamina at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        match coordinator.tick().await {
            Ok(output) if output.messages_sent > 0 => {
                log::info!("Sent {} notification(s)", output.messages_sent);
            }
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => log::error!("Stamina check failed: {e}"),
        }
        tokio::time::sleep(wait_timeout).await;
    }
}

pub fn run() -> Result<()> {
    init_logging();

    let config = load_config().map_err(|e| {
        log::error!("Invalid configuration: {e}");
        e
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch(config)).map_err(|e| {
        log::error!("Stopped: {e}");
        e
    })
}
