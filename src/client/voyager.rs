//! Voyager indexer client for paginated transaction history.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::{
    error::{HistoryError, Result},
    history::Network,
    types::{IndexerPage, RawTransactionSummary},
    utils::{parse_felt, to_hex},
};

use super::PageFetcher;

/// HTTP client for the Voyager transactions API.
#[derive(Debug, Clone)]
pub struct VoyagerClient {
    /// Sent as `x-api-key` when present
    api_key: Option<String>,
    client: reqwest::Client,
}

impl VoyagerClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Gets a single transaction record from the indexer by hash.
    ///
    /// Library-only helper; the history pipeline reads whole pages instead.
    pub async fn fetch_transaction(
        &self,
        hash: &str,
        network: &Network,
    ) -> Result<RawTransactionSummary> {
        let hash = to_hex(parse_felt(hash)?);
        let url = format!("{}/{}", network.voyager_url.trim_end_matches('/'), hash);
        self.do_request(&url, &[]).await
    }

    async fn do_request<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .headers(self.build_headers())
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
        Ok(serde_json::from_str(&text)?)
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(ref key) = self.api_key {
            if let Ok(val) = HeaderValue::from_str(key) {
                headers.insert("x-api-key", val);
            }
        }

        headers
    }
}

#[async_trait]
impl PageFetcher for VoyagerClient {
    async fn fetch_page(
        &self,
        to_address: &str,
        page_size: u32,
        page_number: u32,
        network: &Network,
    ) -> Result<IndexerPage> {
        let mut query = Vec::with_capacity(3);
        if !to_address.is_empty() {
            query.push(("to", to_hex(parse_felt(to_address)?)));
        }
        query.push(("ps", page_size.to_string()));
        query.push(("p", page_number.to_string()));

        self.do_request(&network.voyager_url, &query).await
    }
}
