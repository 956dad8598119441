//! REST binding for the cart and transaction collections.
//!
//! The remote API wraps every payload in a `{"data": ...}` envelope:
//!
//! - `GET    /api/carts?filters[user_name][$eq]=<user>&_limit=<n>`
//! - `DELETE /api/carts/<documentId>`
//! - `POST   /api/transactions`

use std::time::Duration;

use async_trait::async_trait;
use common::{CartItem, DocumentId, NewTransaction, TransactionRecord, UserIdentity};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ResourceError, Result,
    resource::{CartResource, TransactionResource},
};

const CARTS_PATH: &str = "api/carts";
const TRANSACTIONS_PATH: &str = "api/transactions";

/// Connection settings for [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the API, e.g. `http://localhost:1337`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1337".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// HTTP client implementing both [`CartResource`] and [`TransactionResource`].
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Creates a client from configuration.
    pub fn new(config: &RestConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ResourceError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// URL of one cart document, with the ID percent-encoded as a single
    /// path segment.
    fn document_url(&self, document_id: &DocumentId) -> Result<Url> {
        let mut url = Url::parse(&self.url(CARTS_PATH))
            .map_err(|e| ResourceError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ResourceError::InvalidUrl(self.base_url.clone()))?
            .push(document_id.as_str());
        Ok(url)
    }

    /// Turns non-success statuses into [`ResourceError::Status`].
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ResourceError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = Self::check_status(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CartResource for RestClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list(&self, user: &UserIdentity, limit: usize) -> Result<Vec<CartItem>> {
        let response = self
            .client
            .get(self.url(CARTS_PATH))
            .query(&[
                ("filters[user_name][$eq]", user.name().to_string()),
                ("_limit", limit.to_string()),
            ])
            .send()
            .await?;

        let envelope: Envelope<Vec<serde_json::Value>> = Self::decode(response).await?;

        // One malformed record must not hide the rest of the cart.
        let mut items = Vec::with_capacity(envelope.data.len());
        for raw in envelope.data {
            match serde_json::from_value::<CartItem>(raw) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!(error = %e, "skipping undecodable cart record"),
            }
        }
        tracing::debug!(count = items.len(), "listed cart items");
        Ok(items)
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn delete(&self, document_id: &DocumentId) -> Result<()> {
        let url = self.document_url(document_id)?;
        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await?;
        tracing::debug!(%document_id, "deleted cart item");
        Ok(())
    }
}

#[async_trait]
impl TransactionResource for RestClient {
    #[tracing::instrument(skip(self, transaction), fields(product = %transaction.product_name))]
    async fn create(&self, transaction: NewTransaction) -> Result<TransactionRecord> {
        let response = self
            .client
            .post(self.url(TRANSACTIONS_PATH))
            .json(&Envelope { data: transaction })
            .send()
            .await?;

        let envelope: Envelope<TransactionRecord> = Self::decode(response).await?;
        tracing::debug!(id = envelope.data.id, "created transaction record");
        Ok(envelope.data)
    }
}
