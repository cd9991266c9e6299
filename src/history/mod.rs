pub mod aggregator;
pub mod filter;
pub mod reshaper;

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{info, info_span, Span};

use crate::{
    client::{PageFetcher, StarknetRpcClient, TransactionSource, VoyagerClient},
    error::{HistoryError, Result},
    types::NormalizedTransaction,
    utils::parse_felt,
};

use self::{aggregator::Aggregator, filter::filter_transactions, reshaper::Reshaper};

/// Endpoints and identity of one Starknet network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub name: String,
    pub chain_id: String,
    /// JSON-RPC endpoint of a full node
    pub node_url: String,
    /// Voyager transactions endpoint, queried with `to`, `ps` and `p`
    pub voyager_url: String,
}

/// Configuration for history lookups loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Network used when the caller does not name one
    pub network: Network,
    /// Credential sent to the indexer, if any
    pub voyager_api_key: Option<String>,
    /// Upper bound on every single indexer or node call
    pub request_timeout: Duration,
    /// Default indexer page size
    pub page_size: u32,
}

fn required_var(name: &str) -> Result<String> {
    dotenv::var(name).map_err(|_| HistoryError::EnvVarNotFound(name.to_string()))
}

impl Config {
    /// Creates a new Config instance by loading values from environment variables.
    /// This should be called only once during startup.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let network = Network {
            name: dotenv::var("STARKNET_NETWORK_NAME").unwrap_or_else(|_| "mainnet".to_string()),
            chain_id: required_var("STARKNET_CHAIN_ID")?,
            node_url: required_var("STARKNET_NODE_URL")?,
            voyager_url: required_var("VOYAGER_TXNS_URL")?,
        };

        let voyager_api_key = dotenv::var("VOYAGER_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let request_timeout = dotenv::var("REQUEST_TIMEOUT")
            .unwrap_or_else(|_| "30s".to_string())
            .parse::<humantime::Duration>()
            .map_err(|_| {
                HistoryError::InvalidEnvVar(
                    "REQUEST_TIMEOUT must be a duration such as 30s".to_string(),
                )
            })?
            .into();

        let page_size = dotenv::var("PAGE_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| {
                HistoryError::InvalidEnvVar("PAGE_SIZE must be a positive number".to_string())
            })?;

        Ok(Self {
            network,
            voyager_api_key,
            request_timeout,
            page_size,
        })
    }
}

/// Runs `fut` with an upper bound, mapping expiry to [`HistoryError::Timeout`].
pub(crate) async fn with_timeout<T>(
    duration: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(duration, fut)
        .await
        .unwrap_or(Err(HistoryError::Timeout(duration)))
}

/// Entry point for building an address's normalized transaction history
pub struct HistoryManager {
    pub config: Config,
    aggregator: Aggregator,
    reshaper: Reshaper,
    span: Span,
}

impl HistoryManager {
    /// Creates a HistoryManager talking to Voyager and a Starknet node over HTTP
    pub fn new(config: Config) -> Self {
        let fetcher = Arc::new(VoyagerClient::new(config.voyager_api_key.clone()));
        let source = Arc::new(StarknetRpcClient::new());
        Self::with_clients(config, fetcher, source)
    }

    /// Creates a HistoryManager over the given collaborators
    pub fn with_clients(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        source: Arc<dyn TransactionSource>,
    ) -> Self {
        let span = info_span!("history", network = %config.network.name);
        let aggregator = Aggregator::new(fetcher, config.request_timeout, span.clone());
        let reshaper = Reshaper::new(source, config.request_timeout, span.clone());

        Self {
            config,
            aggregator,
            reshaper,
            span,
        }
    }

    /// Gets the normalized transactions sent to `to_address`.
    ///
    /// Indexer and node failures never fail the call; they degrade the result.
    /// Only an unparsable `contract_address` is returned as an error.
    ///
    /// # Arguments
    /// * `to_address` - Recipient address whose history is read
    /// * `contract_address` - If set, keep only transactions calling this contract (deploys always kept)
    /// * `page_size` - Indexer page size (10, 25 or 50)
    /// * `min_timestamp_ms` - Oldest timestamp to keep, in milliseconds
    /// * `with_deploy_txn` - Make sure deploy transactions are included even outside the window
    /// * `network` - Network to query
    pub async fn get_massaged_transactions(
        &self,
        to_address: &str,
        contract_address: Option<&str>,
        page_size: u32,
        min_timestamp_ms: u64,
        with_deploy_txn: bool,
        network: &Network,
    ) -> Result<Vec<NormalizedTransaction>> {
        let contract_address = contract_address.filter(|address| !address.is_empty());
        if let Some(address) = contract_address {
            parse_felt(address)?;
        }

        let aggregated = self
            .aggregator
            .aggregate(
                to_address,
                page_size,
                min_timestamp_ms,
                with_deploy_txn,
                network,
            )
            .await;

        let massaged = self.reshaper.reshape(&aggregated.txns, network).await;
        info!(parent: &self.span, total = massaged.len(), "Massaged transactions");

        Ok(filter_transactions(
            &massaged,
            &aggregated.deploy_txns,
            min_timestamp_ms,
            contract_address,
        ))
    }
}
