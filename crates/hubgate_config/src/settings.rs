use std::fmt;

use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub hub: HubSettings,
    pub topics: TopicSettings,
    pub log: LogSettings,
}

/// Where the hub lives and how tokens for it are signed.
///
/// Secrets are plain values here; an empty string means "not configured"
/// and is still used for signing.
#[derive(Deserialize, Clone)]
pub struct HubSettings {
    pub url: String,
    pub publisher_jwt_secret: String,
    pub subscriber_jwt_secret: String,
    /// Adds an `exp` claim this many seconds after signing when set.
    pub jwt_lifetime_secs: Option<u64>,
    pub request_timeout_secs: u64,
}

/// Topic IRIs served by the config-driven topic sources.
///
/// `private` entries are templates; `{customer_id}` is replaced with the
/// acting customer's id.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TopicSettings {
    pub public: Vec<String>,
    pub private: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Read access to the hub settings consumed by the authority.
pub trait HubConfig: Send + Sync {
    fn hub_url(&self) -> &str;
    fn publisher_secret(&self) -> &str;
    fn subscriber_secret(&self) -> &str;

    /// Token lifetime in seconds; `None` signs tokens without `exp`.
    fn jwt_lifetime_secs(&self) -> Option<u64> {
        None
    }
}

impl HubConfig for HubSettings {
    fn hub_url(&self) -> &str {
        &self.url
    }

    fn publisher_secret(&self) -> &str {
        &self.publisher_jwt_secret
    }

    fn subscriber_secret(&self) -> &str {
        &self.subscriber_jwt_secret
    }

    fn jwt_lifetime_secs(&self) -> Option<u64> {
        self.jwt_lifetime_secs
    }
}

impl fmt::Debug for HubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSettings")
            .field("url", &self.url)
            .field("publisher_jwt_secret", &"[REDACTED]")
            .field("subscriber_jwt_secret", &"[REDACTED]")
            .field("jwt_lifetime_secs", &self.jwt_lifetime_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Partial configuration settings loaded from files or environment.
///
/// Every key is optional; missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub hub: Option<PartialHubSettings>,
    pub topics: Option<PartialTopicSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialHubSettings {
    pub url: Option<String>,
    pub publisher_jwt_secret: Option<String>,
    pub subscriber_jwt_secret: Option<String>,
    pub jwt_lifetime_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialTopicSettings {
    pub public: Option<TopicList>,
    pub private: Option<TopicList>,
}

/// A topic list as written in a file (an array) or in the environment
/// (one comma-separated string).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TopicList {
    Items(Vec<String>),
    Joined(String),
}

impl TopicList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TopicList::Items(items) => items,
            TopicList::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|topic| !topic.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            publisher_jwt_secret: String::new(),
            subscriber_jwt_secret: String::new(),
            jwt_lifetime_secs: None,
            request_timeout_secs: 10,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PartialSettings {
    /// Merge with defaults.
    pub fn into_settings(self) -> Settings {
        let default = Settings::default();
        let hub = self.hub.unwrap_or_default();
        let topics = self.topics.unwrap_or_default();
        let log = self.log.unwrap_or_default();

        Settings {
            hub: HubSettings {
                url: hub.url.unwrap_or(default.hub.url),
                publisher_jwt_secret: hub
                    .publisher_jwt_secret
                    .unwrap_or(default.hub.publisher_jwt_secret),
                subscriber_jwt_secret: hub
                    .subscriber_jwt_secret
                    .unwrap_or(default.hub.subscriber_jwt_secret),
                jwt_lifetime_secs: hub.jwt_lifetime_secs.or(default.hub.jwt_lifetime_secs),
                request_timeout_secs: hub
                    .request_timeout_secs
                    .unwrap_or(default.hub.request_timeout_secs),
            },
            topics: TopicSettings {
                public: topics
                    .public
                    .map(TopicList::into_vec)
                    .unwrap_or(default.topics.public),
                private: topics
                    .private
                    .map(TopicList::into_vec)
                    .unwrap_or(default.topics.private),
            },
            log: LogSettings {
                level: log.level.unwrap_or(default.log.level),
            },
        }
    }
}
