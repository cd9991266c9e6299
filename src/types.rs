//! Core type definitions for transaction history.
//!
//! This module contains the records read from the indexer and the node, and
//! the normalized transaction handed back to callers.

use serde::{Deserialize, Serialize};

/// One transaction as listed on an indexer page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionSummary {
    pub hash: String,
    #[serde(rename = "type")]
    pub txn_type: String,
    /// Block timestamp in seconds
    pub timestamp: u64,
    #[serde(default, alias = "contractAddress")]
    pub contract_address: Option<String>,
}

impl RawTransactionSummary {
    /// Timestamp converted to milliseconds, the unit of every time-window boundary.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp.saturating_mul(1000)
    }
}

/// A single page of transactions returned by the indexer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerPage {
    #[serde(default)]
    pub items: Vec<RawTransactionSummary>,
    #[serde(default)]
    pub last_page: u32,
}

/// Transaction detail as returned by the node.
///
/// The node answers with a different record per transaction type. Only the
/// fields read during normalization are kept, each optional. Address
/// precedence is `sender_address` over `contract_address`; see
/// [`RawTransactionDetail::sender`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionDetail {
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub calldata: Option<Vec<String>>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl RawTransactionDetail {
    pub fn hash(&self) -> Option<&str> {
        non_empty(self.transaction_hash.as_ref())
    }

    /// Sending account: `sender_address` (invoke v1+, declare), else
    /// `contract_address` (invoke v0, deploy, l1 handler).
    pub fn sender(&self) -> Option<&str> {
        non_empty(self.sender_address.as_ref()).or_else(|| self.contract())
    }

    pub fn contract(&self) -> Option<&str> {
        non_empty(self.contract_address.as_ref())
    }

    /// Calldata element at `index`, skipping empty strings.
    pub fn calldata_at(&self, index: usize) -> Option<&str> {
        non_empty(self.calldata.as_ref().and_then(|c| c.get(index)))
    }
}

/// Execution and finality status of a transaction, read from its receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    #[serde(default)]
    pub execution_status: Option<String>,
    #[serde(default)]
    pub finality_status: Option<String>,
}

/// Transactions gathered by the aggregator, plus the deploy transactions that
/// stay exempt from the time window further down the pipeline.
#[derive(Debug, Clone, Default)]
pub struct AggregatedTransactions {
    pub txns: Vec<RawTransactionSummary>,
    pub deploy_txns: Vec<RawTransactionSummary>,
}

/// The fixed-shape transaction handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub txn_hash: String,
    pub txn_type: String,
    pub chain_id: String,
    pub sender_address: String,
    pub contract_address: String,
    pub contract_func_name: String,
    pub contract_call_data: Vec<String>,
    /// Seconds
    pub timestamp: u64,
    pub finality_status: String,
    pub execution_status: String,
    pub event_ids: Vec<String>,
    pub failure_reason: String,
}
