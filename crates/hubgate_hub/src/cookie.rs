//! Cookie writing
//!
//! The authority hands the subscriber token to a `CookieWriter`. The writer
//! owns every limit on cookies; its errors are returned to the caller of
//! `set_authorization_header` as they are.
//!
//! `HeaderCookieJar` renders `Set-Cookie` header values for whatever
//! response the embedding application is about to send. Limits:
//! - name must be non-empty and free of separators and whitespace
//! - value must only contain cookie-octets
//! - `name=value` must not exceed `MAX_COOKIE_SIZE` bytes
//! - at most `MAX_NUM_COOKIES` distinct cookies per jar

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

pub const MAX_COOKIE_SIZE: usize = 4096;
pub const MAX_NUM_COOKIES: usize = 50;

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie '{name}' is {size} bytes, over the {limit} byte limit")]
    SizeLimitReached {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("unable to send the cookie: {0}")]
    FailureToSend(String),

    #[error("invalid cookie: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Attributes of a public (script-readable) cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieMetadata {
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age: Option<u64>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl CookieMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}

pub trait CookieWriter: Send + Sync {
    fn set_public_cookie(
        &self,
        name: &str,
        value: &str,
        metadata: &CookieMetadata,
    ) -> Result<(), CookieError>;
}

#[derive(Debug, Default)]
pub struct HeaderCookieJar {
    cookies: Mutex<Vec<(String, String)>>,
}

impl HeaderCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered `Set-Cookie` values in the order the cookies were first set.
    pub fn headers(&self) -> Vec<String> {
        self.lock().iter().map(|(_, header)| header.clone()).collect()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.lock()
            .iter()
            .find(|(cookie, _)| cookie == name)
            .map(|(_, header)| header.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, String)>> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieWriter for HeaderCookieJar {
    fn set_public_cookie(
        &self,
        name: &str,
        value: &str,
        metadata: &CookieMetadata,
    ) -> Result<(), CookieError> {
        validate_name(name)?;
        validate_value(value)?;
        if metadata.same_site == Some(SameSite::None) && !metadata.secure {
            return Err(CookieError::InvalidInput(format!(
                "cookie '{name}' uses SameSite=None without Secure"
            )));
        }

        let size = name.len() + 1 + value.len();
        if size > MAX_COOKIE_SIZE {
            return Err(CookieError::SizeLimitReached {
                name: name.to_string(),
                size,
                limit: MAX_COOKIE_SIZE,
            });
        }

        let header = render(name, value, metadata);
        let mut cookies = self.lock();
        if let Some(existing) = cookies.iter_mut().find(|(cookie, _)| cookie == name) {
            existing.1 = header;
            return Ok(());
        }
        if cookies.len() >= MAX_NUM_COOKIES {
            return Err(CookieError::FailureToSend(format!(
                "maximum number of cookies ({MAX_NUM_COOKIES}) would be exceeded"
            )));
        }
        cookies.push((name.to_string(), header));

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), CookieError> {
    if name.is_empty() {
        return Err(CookieError::InvalidInput("cookie name is empty".to_string()));
    }
    if name
        .chars()
        .any(|c| matches!(c, '=' | ',' | ';' | ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c'))
    {
        return Err(CookieError::InvalidInput(format!(
            "cookie name '{name}' contains a forbidden character"
        )));
    }
    Ok(())
}

fn validate_value(value: &str) -> Result<(), CookieError> {
    // RFC 6265 cookie-octet
    let valid = value.bytes().all(|b| {
        matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
    });
    if !valid {
        return Err(CookieError::InvalidInput(
            "cookie value contains a forbidden character".to_string(),
        ));
    }
    Ok(())
}

fn render(name: &str, value: &str, metadata: &CookieMetadata) -> String {
    let mut header = format!("{name}={value}");
    if let Some(path) = &metadata.path {
        header.push_str(&format!("; Path={path}"));
    }
    if let Some(domain) = &metadata.domain {
        header.push_str(&format!("; Domain={domain}"));
    }
    if let Some(max_age) = metadata.max_age {
        header.push_str(&format!("; Max-Age={max_age}"));
    }
    if metadata.secure {
        header.push_str("; Secure");
    }
    if let Some(same_site) = metadata.same_site {
        header.push_str(&format!("; SameSite={same_site}"));
    }
    header
}
