//! Hub transport
//!
//! `HubClient` is the handle the rest of the crate publishes through. It is
//! bound to one hub URL and one publish-scoped token. `HubConnector` builds
//! those handles; the authority calls it once per principal and caches the
//! result.
//!
//! `HttpConnector` is the production connector. All `HttpHub` handles it
//! creates share one `reqwest::Client` and therefore one connection pool.
//! Publishing is a single form-encoded POST with the token as bearer
//! credentials; the response body is the id the hub assigned to the update.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::token::{TokenError, TokenProvider};
use crate::update::Update;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to send an update: {0}")]
    Request(#[from] reqwest::Error),

    #[error("hub rejected the update with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Token(#[from] TokenError),
}

#[async_trait]
pub trait HubClient: Send + Sync {
    fn url(&self) -> &str;

    fn token_provider(&self) -> &TokenProvider;

    /// Publishes `update` and returns the message id assigned by the hub.
    async fn publish(&self, update: &Update) -> Result<String, TransportError>;
}

pub trait HubConnector: Send + Sync {
    fn connect(&self, url: &str, token: TokenProvider) -> Arc<dyn HubClient>;
}

#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HubConnector for HttpConnector {
    fn connect(&self, url: &str, token: TokenProvider) -> Arc<dyn HubClient> {
        Arc::new(HttpHub {
            client: self.client.clone(),
            url: url.to_string(),
            token,
        })
    }
}

#[derive(Debug)]
pub struct HttpHub {
    client: Client,
    url: String,
    token: TokenProvider,
}

#[async_trait]
impl HubClient for HttpHub {
    fn url(&self) -> &str {
        &self.url
    }

    fn token_provider(&self) -> &TokenProvider {
        &self.token
    }

    async fn publish(&self, update: &Update) -> Result<String, TransportError> {
        let token = self.token.token()?;
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .form(&update.form_fields())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("hub {} accepted update {body}", self.url);
        Ok(body)
    }
}
