//! Collaborators the history pipeline reads from.
//!
//! [`PageFetcher`] lists transactions page by page from an indexer and
//! [`TransactionSource`] looks up a single transaction on a node. The HTTP
//! implementations live in [`voyager`] and [`rpc`].

pub mod rpc;
pub mod voyager;

use async_trait::async_trait;

use crate::{
    error::Result,
    history::Network,
    types::{IndexerPage, RawTransactionDetail, TransactionStatus},
};

pub use self::{rpc::StarknetRpcClient, voyager::VoyagerClient};

/// Fetches one page of an address's transaction history. Never retries.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// # Arguments
    /// * `to_address` - Recipient address filter, omitted from the query when empty
    /// * `page_size` - One of the indexer's supported sizes (10, 25, 50); not validated
    /// * `page_number` - 1-based page index
    /// * `network` - Network whose indexer endpoint is queried
    async fn fetch_page(
        &self,
        to_address: &str,
        page_size: u32,
        page_number: u32,
        network: &Network,
    ) -> Result<IndexerPage>;
}

/// Per-hash transaction lookups against a node.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn get_transaction(&self, hash: &str, network: &Network) -> Result<RawTransactionDetail>;

    async fn get_transaction_status(
        &self,
        hash: &str,
        network: &Network,
    ) -> Result<TransactionStatus>;
}
