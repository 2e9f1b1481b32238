//! HTTP list store
//!
//! Talks to a JSON blob service: `GET <base>/<id>` returns the document,
//! `PUT <base>/<id>` replaces it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use super::RemoteStore;
use crate::config::Config;
use crate::error::RemoteError;
use crate::models::{decode_items, encode_items, Item};

const USER_AGENT: &str = concat!("tabdo/", env!("CARGO_PKG_VERSION"));

/// Remote store backed by a JSON blob HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    /// Base URL without trailing slash
    base_url: String,
}

impl HttpStore {
    /// Create a store for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create the store described by `config`
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Self::new(&config.store_url, config.request_timeout())
    }

    /// Create a store that uses an existing client
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the document for `store_id`
    pub fn document_url(&self, store_id: &str) -> String {
        format!("{}/{}", self.base_url, store_id)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn load(&self, store_id: &str) -> Result<Vec<Item>, RemoteError> {
        let url = self.document_url(store_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                store_id: store_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(decode_items(&body))
    }

    async fn save(&self, store_id: &str, items: &[Item]) -> Result<(), RemoteError> {
        let url = self.document_url(store_id);
        let body = encode_items(items)?;
        debug!("PUT {} ({} items, {} bytes)", url, items.len(), body.len());

        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                store_id: store_id.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
