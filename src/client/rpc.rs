//! Starknet node JSON-RPC client for per-transaction lookups.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{HistoryError, Result},
    history::Network,
    types::{RawTransactionDetail, TransactionStatus},
};

use super::TransactionSource;

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct HashParams<'a> {
    transaction_hash: &'a str,
}

/// JSON-RPC client for a Starknet full node.
#[derive(Debug)]
pub struct StarknetRpcClient {
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl Default for StarknetRpcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StarknetRpcClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        network: &Network,
        method: &str,
        params: P,
    ) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let resp = self
            .client
            .post(&network.node_url)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(HistoryError::ServerError {
                status_code: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let parsed: RpcResponse<T> = serde_json::from_str(&text)?;

        if let Some(error) = parsed.error {
            return Err(HistoryError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        parsed.result.ok_or(HistoryError::EmptyRpcResult)
    }
}

#[async_trait]
impl TransactionSource for StarknetRpcClient {
    async fn get_transaction(&self, hash: &str, network: &Network) -> Result<RawTransactionDetail> {
        self.call(
            network,
            "starknet_getTransactionByHash",
            HashParams {
                transaction_hash: hash,
            },
        )
        .await
    }

    /// Status is read off the transaction receipt.
    async fn get_transaction_status(
        &self,
        hash: &str,
        network: &Network,
    ) -> Result<TransactionStatus> {
        self.call(
            network,
            "starknet_getTransactionReceipt",
            HashParams {
                transaction_hash: hash,
            },
        )
        .await
    }
}
