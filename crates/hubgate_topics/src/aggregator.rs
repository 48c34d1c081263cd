//! Topic aggregation
//!
//! `TopicAggregator` holds the registered sources together with their
//! visibility tag and derives two views from them:
//! - public topics: outputs of public sources
//! - private topics: outputs of private sources
//!
//! Both views concatenate source outputs in registration order and keep
//! duplicates. A source is only ever called for the view matching its tag.

use std::fmt;
use std::sync::Arc;

use hubgate_config::TopicSettings;
use tracing::debug;

use crate::Topic;
use crate::principal::Principal;
use crate::source::{StaticTopics, TemplateTopics, TopicSource, Visibility};

#[derive(Clone)]
struct RegisteredSource {
    visibility: Visibility,
    source: Arc<dyn TopicSource>,
}

#[derive(Clone, Default)]
pub struct TopicAggregator {
    sources: Vec<RegisteredSource>,
}

impl TopicAggregator {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Registers the configured public IRIs, then the private templates.
    pub fn from_settings(settings: &TopicSettings) -> Self {
        Self::new()
            .with_public(StaticTopics::new(settings.public.iter().cloned()))
            .with_private(TemplateTopics::new(settings.private.iter().cloned()))
    }

    pub fn register(&mut self, visibility: Visibility, source: Arc<dyn TopicSource>) {
        self.sources.push(RegisteredSource { visibility, source });
    }

    pub fn with_public(mut self, source: impl TopicSource + 'static) -> Self {
        self.register(Visibility::Public, Arc::new(source));
        self
    }

    pub fn with_private(mut self, source: impl TopicSource + 'static) -> Self {
        self.register(Visibility::Private, Arc::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn public_topics(&self, principal: Principal) -> Vec<Topic> {
        self.collect(Visibility::Public, principal)
    }

    pub fn private_topics(&self, principal: Principal) -> Vec<Topic> {
        self.collect(Visibility::Private, principal)
    }

    fn collect(&self, visibility: Visibility, principal: Principal) -> Vec<Topic> {
        let topics: Vec<Topic> = self
            .sources
            .iter()
            .filter(|registered| registered.visibility == visibility)
            .flat_map(|registered| registered.source.topics(principal))
            .collect();

        debug!("resolved {} {visibility} topics for {principal}", topics.len());
        topics
    }
}

impl fmt::Debug for TopicAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<Visibility> = self.sources.iter().map(|s| s.visibility).collect();
        f.debug_struct("TopicAggregator")
            .field("sources", &tags)
            .finish()
    }
}
