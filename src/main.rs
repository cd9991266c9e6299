use chrono::Utc;
use dotenv::dotenv;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use starknet_history::{
    utils::{validate_and_parse_address, ADDRESS_HEX_LENGTH},
    Config, HistoryError, HistoryManager,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if dotenv::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    info!(
        network = %config.network.name,
        chain_id = %config.network.chain_id,
        "Loaded configuration"
    );

    let to_address = dotenv::var("TO_ADDRESS")
        .map_err(|_| HistoryError::EnvVarNotFound("TO_ADDRESS".to_string()))?;
    let to_address = validate_and_parse_address(&to_address, ADDRESS_HEX_LENGTH)?;

    let contract_address = dotenv::var("CONTRACT_ADDRESS")
        .ok()
        .filter(|address| !address.is_empty());

    let lookback: Duration = dotenv::var("LOOKBACK")
        .unwrap_or_else(|_| "7d".to_string())
        .parse::<humantime::Duration>()?
        .into();
    let now_ms = Utc::now().timestamp_millis().max(0) as u64;
    let min_timestamp_ms = now_ms.saturating_sub(lookback.as_millis() as u64);

    let with_deploy_txn = dotenv::var("WITH_DEPLOY_TXN")
        .unwrap_or_else(|_| "true".to_string())
        .parse::<bool>()
        .map_err(|_| {
            HistoryError::InvalidEnvVar("WITH_DEPLOY_TXN must be true or false".to_string())
        })?;

    let network = config.network.clone();
    let page_size = config.page_size;
    let history_manager = HistoryManager::new(config);

    let txns = history_manager
        .get_massaged_transactions(
            &to_address,
            contract_address.as_deref(),
            page_size,
            min_timestamp_ms,
            with_deploy_txn,
            &network,
        )
        .await?;

    info!(
        address = %to_address,
        min_timestamp_ms,
        total = txns.len(),
        "Transaction history ready"
    );
    println!("{}", serde_json::to_string_pretty(&txns)?);

    Ok(())
}
