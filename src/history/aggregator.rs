use std::{sync::Arc, time::Duration};

use tracing::{error, info, Span};

use crate::{
    client::PageFetcher,
    error::Result,
    types::{AggregatedTransactions, IndexerPage, RawTransactionSummary},
    utils::{is_deploy_type, same_hash},
};

use super::{with_timeout, Network};

/// Walks indexer pages until the time window is overshot or pages run out
pub struct Aggregator {
    fetcher: Arc<dyn PageFetcher>,
    request_timeout: Duration,
    span: Span,
}

impl Aggregator {
    /// Creates a new Aggregator logging under `span`
    pub fn new(fetcher: Arc<dyn PageFetcher>, request_timeout: Duration, span: Span) -> Self {
        Self {
            fetcher,
            request_timeout,
            span,
        }
    }

    async fn fetch_page(
        &self,
        to_address: &str,
        page_size: u32,
        page_number: u32,
        network: &Network,
    ) -> Result<IndexerPage> {
        with_timeout(
            self.request_timeout,
            self.fetcher
                .fetch_page(to_address, page_size, page_number, network),
        )
        .await
    }

    /// Collects the transactions of `to_address` down to `min_timestamp_ms`.
    ///
    /// Always fetches at least one page and stops once the last collected item
    /// falls before the window, so a few out-of-window items may be collected
    /// before the final trim. A failed page is logged and skipped; this never
    /// fails.
    pub async fn aggregate(
        &self,
        to_address: &str,
        page_size: u32,
        min_timestamp_ms: u64,
        include_deploys: bool,
        network: &Network,
    ) -> AggregatedTransactions {
        let mut txns: Vec<RawTransactionSummary> = Vec::new();
        let mut page_number = 1u32;
        let mut max_page = page_number;

        loop {
            match self
                .fetch_page(to_address, page_size, page_number, network)
                .await
            {
                Ok(page) => {
                    txns.extend(page.items);
                    max_page = page.last_page;
                }
                Err(e) => {
                    error!(parent: &self.span, page = page_number, error = %e, "Failed to fetch transaction page");
                }
            }
            page_number += 1;

            let last_in_window = txns
                .last()
                .is_some_and(|txn| txn.timestamp_ms() >= min_timestamp_ms);
            if page_number > max_page || !last_in_window {
                break;
            }
        }

        info!(
            parent: &self.span,
            min_timestamp_ms,
            next_page = page_number,
            max_page,
            total = txns.len(),
            "Fetched transaction pages"
        );

        let mut deploy_txns = Vec::new();
        if include_deploys {
            if page_number <= max_page {
                // the last page was never reached
                match self
                    .fetch_page(to_address, page_size, max_page, network)
                    .await
                {
                    Ok(page) => {
                        deploy_txns = page
                            .items
                            .into_iter()
                            .filter(|txn| is_deploy_type(&txn.txn_type))
                            .collect();
                        txns.extend(deploy_txns.iter().cloned());
                    }
                    Err(e) => {
                        error!(parent: &self.span, page = max_page, error = %e, "Failed to fetch last transaction page");
                    }
                }
            } else {
                deploy_txns = txns
                    .iter()
                    .filter(|txn| is_deploy_type(&txn.txn_type))
                    .cloned()
                    .collect();
            }
        }

        txns.retain(|txn| {
            txn.timestamp_ms() >= min_timestamp_ms
                || deploy_txns
                    .iter()
                    .any(|deploy| same_hash(&deploy.hash, &txn.hash))
        });

        AggregatedTransactions { txns, deploy_txns }
    }
}
