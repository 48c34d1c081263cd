//! hubgate_hub
//!
//! Hub access for authenticated and guest principals.
//!
//! Public types:
//! - `HubAuthority`: per-principal caches of hub handles (publish scope) and
//!   token providers (subscribe scope); writes the subscriber cookie
//! - `Publisher`: publishes JSON updates for the acting principal
//! - `TokenFactory` / `TokenProvider`: scoped HS256 tokens
//! - `HubClient` / `HubConnector`: transport seam, `HttpConnector` in production
//! - `IdentitySource`, `CookieWriter`, `CriticalLog`: collaborators supplied by
//!   the embedding application

pub mod authority;
pub mod cookie;
pub mod identity;
pub mod publisher;
pub mod token;
pub mod transport;
pub mod update;

pub use authority::{AUTHORIZATION_COOKIE, AuthorizationHeaderError, HubAuthority, HubProvider};
pub use cookie::{CookieError, CookieMetadata, CookieWriter, HeaderCookieJar, SameSite};
pub use identity::{IdentitySource, StaticIdentity};
pub use publisher::{CriticalLog, PublishError, Publisher, TracingLog};
pub use token::{Scope, TokenError, TokenFactory, TokenProvider};
pub use transport::{HttpConnector, HttpHub, HubClient, HubConnector, TransportError};
pub use update::Update;
