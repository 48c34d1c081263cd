//! Topic sources
//!
//! A `TopicSource` returns the topic IRIs it is responsible for. Whether a
//! source is public or private is not a property of the source itself: it is
//! the `Visibility` tag chosen when the source is registered with the
//! aggregator.

use std::fmt;

use crate::Topic;
use crate::principal::Principal;

pub const CUSTOMER_ID_PLACEHOLDER: &str = "{customer_id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Same topics for everyone, guests included.
    Public,
    /// Topics that depend on the customer.
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

pub trait TopicSource: Send + Sync {
    /// Ordered topics for `principal`. Order is preserved by the aggregator.
    fn topics(&self, principal: Principal) -> Vec<Topic>;
}

/// A fixed list of topics, identical for every principal.
#[derive(Debug, Clone, Default)]
pub struct StaticTopics {
    iris: Vec<Topic>,
}

impl StaticTopics {
    pub fn new<I, S>(iris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Topic>,
    {
        Self {
            iris: iris.into_iter().map(Into::into).collect(),
        }
    }
}

impl TopicSource for StaticTopics {
    fn topics(&self, _principal: Principal) -> Vec<Topic> {
        self.iris.clone()
    }
}

/// Per-customer topics built by substituting the customer id into
/// templates, e.g. `https://example.com/customers/{customer_id}/orders`.
///
/// Guests get nothing.
#[derive(Debug, Clone, Default)]
pub struct TemplateTopics {
    templates: Vec<String>,
}

impl TemplateTopics {
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
        }
    }
}

impl TopicSource for TemplateTopics {
    fn topics(&self, principal: Principal) -> Vec<Topic> {
        let Some(id) = principal.id() else {
            return Vec::new();
        };
        let id = id.to_string();

        self.templates
            .iter()
            .map(|template| template.replace(CUSTOMER_ID_PLACEHOLDER, &id))
            .collect()
    }
}

/// Adapts a closure into a `TopicSource`.
pub struct FnTopics<F>(F);

impl<F> FnTopics<F>
where
    F: Fn(Principal) -> Vec<Topic> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TopicSource for FnTopics<F>
where
    F: Fn(Principal) -> Vec<Topic> + Send + Sync,
{
    fn topics(&self, principal: Principal) -> Vec<Topic> {
        (self.0)(principal)
    }
}

impl<F> fmt::Debug for FnTopics<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTopics(..)")
    }
}
