//! Publishing on behalf of the acting principal
//!
//! A topic is published as private when it is one of the acting customer's
//! private topics. Guests never publish private updates.
//!
//! Transport failures are logged at critical level with their full detail
//! and surfaced to the caller as `PublishError::Failed`, which carries no
//! transport information. Token signing and serialization errors are
//! returned unchanged. Nothing is retried.

use std::sync::Arc;

use hubgate_topics::{Principal, TopicAggregator};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::authority::HubProvider;
use crate::identity::IdentitySource;
use crate::token::TokenError;
use crate::transport::TransportError;
use crate::update::Update;

pub const PUBLISH_FAILED: &str = "Something went wrong during update request.";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{}", PUBLISH_FAILED)]
    Failed,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("failed to serialize update data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Sink for failures that need operator attention.
pub trait CriticalLog: Send + Sync {
    fn critical(&self, message: &str);
}

/// Forwards critical messages to `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl CriticalLog for TracingLog {
    fn critical(&self, message: &str) {
        error!(critical = true, "{message}");
    }
}

pub struct Publisher {
    hubs: Arc<dyn HubProvider>,
    identity: Arc<dyn IdentitySource>,
    topics: Arc<TopicAggregator>,
    log: Arc<dyn CriticalLog>,
}

impl Publisher {
    pub fn new(
        hubs: Arc<dyn HubProvider>,
        identity: Arc<dyn IdentitySource>,
        topics: Arc<TopicAggregator>,
    ) -> Self {
        Self {
            hubs,
            identity,
            topics,
            log: Arc::new(TracingLog),
        }
    }

    pub fn with_log(mut self, log: Arc<dyn CriticalLog>) -> Self {
        self.log = log;
        self
    }

    /// Publishes `data` as JSON to `topic` and returns the hub's message id.
    pub async fn execute<T>(&self, topic: &str, data: &T) -> Result<String, PublishError>
    where
        T: Serialize + ?Sized,
    {
        let principal = self.identity.current_principal();
        let hub = self.hubs.hub(principal)?;

        let update = Update::new(
            topic,
            serde_json::to_string(data)?,
            self.is_private(principal, topic),
        );

        match hub.publish(&update).await {
            Ok(message_id) => {
                debug!("{principal} published {message_id} to {topic}");
                Ok(message_id)
            }
            Err(TransportError::Token(e)) => Err(PublishError::Token(e)),
            Err(e) => {
                self.log.critical(&format!("[hubgate]: {PUBLISH_FAILED} {e}"));
                Err(PublishError::Failed)
            }
        }
    }

    fn is_private(&self, principal: Principal, topic: &str) -> bool {
        if principal.is_guest() {
            return false;
        }
        self.topics
            .private_topics(principal)
            .iter()
            .any(|private| private == topic)
    }
}
