use std::{sync::Arc, time::Duration};

use futures::future;
use tracing::{debug, error, info_span, Span};

use crate::{
    client::TransactionSource,
    types::{
        NormalizedTransaction, RawTransactionDetail, RawTransactionSummary, TransactionStatus,
    },
    utils::{parse_felt, transfer_selector},
};

use super::{with_timeout, Network};

/// Index of the called contract in invoke calldata
const CALLDATA_CONTRACT_INDEX: usize = 1;
/// Index of the entry point selector in invoke calldata
const CALLDATA_SELECTOR_INDEX: usize = 2;
/// Index where call arguments begin
const CALLDATA_ARGS_START: usize = 6;

pub const FUNC_NAME_TRANSFER: &str = "transfer";

/// Looks up detail and status for every collected transaction and normalizes them
pub struct Reshaper {
    source: Arc<dyn TransactionSource>,
    request_timeout: Duration,
    span: Span,
}

impl Reshaper {
    /// Creates a new Reshaper logging under `span`
    pub fn new(source: Arc<dyn TransactionSource>, request_timeout: Duration, span: Span) -> Self {
        Self {
            source,
            request_timeout,
            span,
        }
    }

    /// Normalizes all `txns` concurrently. Output order follows input order and
    /// every input yields exactly one output.
    pub async fn reshape(
        &self,
        txns: &[RawTransactionSummary],
        network: &Network,
    ) -> Vec<NormalizedTransaction> {
        let futures = txns
            .iter()
            .map(|txn| self.reshape_one(txn, network))
            .collect::<Vec<_>>();

        future::join_all(futures).await
    }

    async fn reshape_one(
        &self,
        txn: &RawTransactionSummary,
        network: &Network,
    ) -> NormalizedTransaction {
        let span = info_span!(parent: &self.span, "reshape", hash = %txn.hash);

        let (detail, status) = tokio::join!(
            with_timeout(
                self.request_timeout,
                self.source.get_transaction(&txn.hash, network)
            ),
            with_timeout(
                self.request_timeout,
                self.source.get_transaction_status(&txn.hash, network)
            ),
        );

        let detail = match detail {
            Ok(detail) => {
                debug!(parent: &span, ?detail, "Transaction detail");
                Some(detail)
            }
            Err(e) => {
                error!(parent: &span, error = %e, "Failed to get transaction detail");
                None
            }
        };

        let status = match status {
            Ok(status) => {
                debug!(parent: &span, ?status, "Transaction status");
                Some(status)
            }
            Err(e) => {
                error!(parent: &span, error = %e, "Failed to get transaction status");
                None
            }
        };

        normalize(txn, detail.as_ref(), status.as_ref(), &network.chain_id)
    }
}

/// Builds the normalized record for `summary` from whatever lookups succeeded.
///
/// # Arguments
/// * `summary` - Indexer record, always present
/// * `detail` - Node transaction, `None` if the lookup failed
/// * `status` - Receipt status, `None` if the lookup failed
/// * `chain_id` - Chain the transaction belongs to
pub fn normalize(
    summary: &RawTransactionSummary,
    detail: Option<&RawTransactionDetail>,
    status: Option<&TransactionStatus>,
    chain_id: &str,
) -> NormalizedTransaction {
    let summary_contract = summary
        .contract_address
        .as_deref()
        .filter(|address| !address.is_empty());

    let sender_address = detail
        .and_then(RawTransactionDetail::sender)
        .or(summary_contract)
        .unwrap_or_default();

    let contract_address = detail
        .and_then(|d| {
            d.calldata_at(CALLDATA_CONTRACT_INDEX)
                .or_else(|| d.contract())
        })
        .or(summary_contract)
        .unwrap_or_default();

    let selector = detail
        .and_then(|d| d.calldata_at(CALLDATA_SELECTOR_INDEX))
        .unwrap_or_default();
    let contract_func_name = match parse_felt(selector) {
        Ok(value) if value == transfer_selector() => FUNC_NAME_TRANSFER,
        _ => "",
    };

    let contract_call_data = detail
        .and_then(|d| d.calldata.as_deref())
        .and_then(|calldata| calldata.get(CALLDATA_ARGS_START..))
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    NormalizedTransaction {
        txn_hash: detail
            .and_then(RawTransactionDetail::hash)
            .unwrap_or(&summary.hash)
            .to_string(),
        txn_type: summary.txn_type.to_lowercase(),
        chain_id: chain_id.to_string(),
        sender_address: sender_address.to_string(),
        contract_address: contract_address.to_string(),
        contract_func_name: contract_func_name.to_string(),
        contract_call_data,
        timestamp: summary.timestamp,
        finality_status: status
            .and_then(|s| s.finality_status.clone())
            .unwrap_or_default(),
        execution_status: status
            .and_then(|s| s.execution_status.clone())
            .unwrap_or_default(),
        event_ids: Vec::new(),
        failure_reason: String::new(),
    }
}
