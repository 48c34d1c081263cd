//! Per-principal hubs and subscriber tokens
//!
//! `HubAuthority` keeps two independent caches keyed by `Principal`:
//! - hub handles, bound to a token scoped for publishing
//! - token providers, scoped for subscribing
//!
//! The two scopes are signed with different secrets and are requested
//! independently (a page that only subscribes never needs a hub handle), so
//! they never share a cache entry.
//!
//! Entries are created on first use and kept for the lifetime of the
//! authority. A token with `exp` is re-signed inside its cached entry once it
//! expires, so the `Arc` handed out stays the same. The cache lock is held while an entry is built, so concurrent
//! callers asking for the same principal all receive the one handle that was
//! built first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hubgate_config::HubConfig;
use hubgate_topics::{AuthorizationResolver, Principal};
use thiserror::Error;
use tracing::debug;

use crate::cookie::{CookieError, CookieMetadata, CookieWriter, SameSite};
use crate::identity::IdentitySource;
use crate::token::{Scope, TokenError, TokenFactory, TokenProvider};
use crate::transport::{HubClient, HubConnector};

/// Cookie the hub reads subscriber credentials from.
pub const AUTHORIZATION_COOKIE: &str = "mercureAuthorization";

#[derive(Debug, Error)]
pub enum AuthorizationHeaderError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Cookie(#[from] CookieError),
}

/// Hands out the hub handle to publish through for a principal.
pub trait HubProvider: Send + Sync {
    fn hub(&self, principal: Principal) -> Result<Arc<dyn HubClient>, TokenError>;
}

type Cache<T> = Mutex<HashMap<Principal, Arc<T>>>;

pub struct HubAuthority {
    config: Arc<dyn HubConfig>,
    authorization: AuthorizationResolver,
    connector: Arc<dyn HubConnector>,
    identity: Arc<dyn IdentitySource>,
    cookies: Arc<dyn CookieWriter>,
    hubs: Cache<dyn HubClient>,
    token_providers: Cache<TokenProvider>,
}

impl HubAuthority {
    pub fn new(
        config: Arc<dyn HubConfig>,
        authorization: AuthorizationResolver,
        connector: Arc<dyn HubConnector>,
        identity: Arc<dyn IdentitySource>,
        cookies: Arc<dyn CookieWriter>,
    ) -> Self {
        Self {
            config,
            authorization,
            connector,
            identity,
            cookies,
            hubs: Mutex::new(HashMap::new()),
            token_providers: Mutex::new(HashMap::new()),
        }
    }

    /// Hub handle for `principal`, built on first request.
    ///
    /// Repeated calls for the same principal return the same `Arc`.
    pub fn hub(&self, principal: Principal) -> Result<Arc<dyn HubClient>, TokenError> {
        let mut hubs = lock(&self.hubs);
        if let Some(hub) = hubs.get(&principal) {
            return Ok(Arc::clone(hub));
        }

        let token = self.sign(Scope::Publish, principal)?;
        let hub = self.connector.connect(self.config.hub_url(), token);
        hubs.insert(principal, Arc::clone(&hub));
        debug!("created hub handle for {principal}");

        Ok(hub)
    }

    /// Subscriber token provider for `principal`, built on first request.
    pub fn token_provider(&self, principal: Principal) -> Result<Arc<TokenProvider>, TokenError> {
        let mut providers = lock(&self.token_providers);
        if let Some(provider) = providers.get(&principal) {
            return Ok(Arc::clone(provider));
        }

        let provider = Arc::new(self.sign(Scope::Subscribe, principal)?);
        providers.insert(principal, Arc::clone(&provider));
        debug!("created subscriber token for {principal}");

        Ok(provider)
    }

    /// Writes the current principal's subscriber token into the
    /// `mercureAuthorization` cookie.
    pub fn set_authorization_header(&self) -> Result<(), AuthorizationHeaderError> {
        let principal = self.identity.current_principal();
        let token = self.token_provider(principal)?.token()?;

        let metadata = CookieMetadata::new()
            .with_path("/")
            .with_secure(true)
            .with_same_site(SameSite::Lax);

        self.cookies
            .set_public_cookie(AUTHORIZATION_COOKIE, &token, &metadata)?;

        Ok(())
    }

    pub fn cached_hubs(&self) -> usize {
        lock(&self.hubs).len()
    }

    pub fn cached_token_providers(&self) -> usize {
        lock(&self.token_providers).len()
    }

    fn sign(&self, scope: Scope, principal: Principal) -> Result<TokenProvider, TokenError> {
        let secret = match scope {
            Scope::Publish => self.config.publisher_secret(),
            Scope::Subscribe => self.config.subscriber_secret(),
        };
        let topics = self.authorization.allowed_topics(principal);

        TokenFactory::new(secret, self.config.jwt_lifetime_secs()).create(scope, topics)
    }
}

impl HubProvider for HubAuthority {
    fn hub(&self, principal: Principal) -> Result<Arc<dyn HubClient>, TokenError> {
        HubAuthority::hub(self, principal)
    }
}

fn lock<T>(cache: &Cache<T>) -> MutexGuard<'_, HashMap<Principal, Arc<T>>>
where
    T: ?Sized,
{
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
