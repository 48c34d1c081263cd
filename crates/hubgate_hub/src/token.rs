//! Scoped hub tokens
//!
//! Tokens are HS256 JWTs carrying a `mercure` claim that lists the topics
//! the bearer may publish to or subscribe to:
//!
//! ```json
//! {"mercure": {"publish": ["https://example.com/books/1"]}, "exp": 1700000000}
//! ```
//!
//! Only the scope a token was created for is present in the claim. `exp` is
//! added when the factory has a lifetime.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hubgate_topics::Topic;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign hub token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Publish,
    Subscribe,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Publish => write!(f, "publish"),
            Scope::Subscribe => write!(f, "subscribe"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MercureClaim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<Vec<Topic>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<Vec<Topic>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub mercure: MercureClaim,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Signs scoped tokens with one secret.
#[derive(Clone)]
pub struct TokenFactory {
    key: EncodingKey,
    lifetime: Option<Duration>,
}

impl TokenFactory {
    /// An empty secret is accepted and produces tokens signed with an empty key.
    pub fn new(secret: &str, lifetime_secs: Option<u64>) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            lifetime: lifetime_secs
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(Duration::try_seconds),
        }
    }

    /// Signs a first token for `scope` and returns a provider that re-signs
    /// it with this factory once it has expired.
    pub fn create(&self, scope: Scope, topics: Vec<Topic>) -> Result<TokenProvider, TokenError> {
        let signed = self.sign(scope, &topics)?;

        Ok(TokenProvider {
            factory: self.clone(),
            scope,
            topics,
            signed: Mutex::new(signed),
        })
    }

    fn sign(&self, scope: Scope, topics: &[Topic]) -> Result<SignedToken, TokenError> {
        let mercure = match scope {
            Scope::Publish => MercureClaim {
                publish: Some(topics.to_vec()),
                subscribe: None,
            },
            Scope::Subscribe => MercureClaim {
                publish: None,
                subscribe: Some(topics.to_vec()),
            },
        };
        let expires_at = self
            .lifetime
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .map(|at| at.timestamp());
        let claims = Claims {
            mercure,
            exp: expires_at,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key)?;

        Ok(SignedToken { token, expires_at })
    }
}

impl fmt::Debug for TokenFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenFactory")
            .field("key", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

#[derive(Clone)]
struct SignedToken {
    token: String,
    expires_at: Option<i64>,
}

impl SignedToken {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now().timestamp() >= exp)
    }
}

/// A signed token for one scope and topic set.
///
/// Tokens without `exp` are signed once. Tokens with `exp` are signed again
/// on the first `token()` call after they expire, so a provider held in a
/// long-lived cache never hands out an expired token.
pub struct TokenProvider {
    factory: TokenFactory,
    scope: Scope,
    topics: Vec<Topic>,
    signed: Mutex<SignedToken>,
}

impl TokenProvider {
    /// The compact JWT, `header.payload.signature`.
    pub fn token(&self) -> Result<String, TokenError> {
        let mut signed = self.lock();
        if signed.is_expired() {
            *signed = self.factory.sign(self.scope, &self.topics)?;
            debug!("re-signed expired {} token", self.scope);
        }
        Ok(signed.token.clone())
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Unix timestamp of the current token's `exp` claim, if any.
    pub fn expires_at(&self) -> Option<i64> {
        self.lock().expires_at
    }

    fn lock(&self) -> MutexGuard<'_, SignedToken> {
        self.signed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for TokenProvider {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            scope: self.scope,
            topics: self.topics.clone(),
            signed: Mutex::new(self.lock().clone()),
        }
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("token", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("topics", &self.topics)
            .field("expires_at", &self.expires_at())
            .finish()
    }
}
