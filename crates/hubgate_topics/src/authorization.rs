//! Allowed topics per principal
//!
//! Guests are allowed the public topics only. Customers are allowed the
//! public topics followed by their private topics.

use std::sync::Arc;

use crate::Topic;
use crate::aggregator::TopicAggregator;
use crate::principal::Principal;

#[derive(Debug, Clone)]
pub struct AuthorizationResolver {
    topics: Arc<TopicAggregator>,
}

impl AuthorizationResolver {
    pub fn new(topics: Arc<TopicAggregator>) -> Self {
        Self { topics }
    }

    pub fn allowed_topics(&self, principal: Principal) -> Vec<Topic> {
        let mut topics = self.topics.public_topics(principal);
        if !principal.is_guest() {
            topics.extend(self.topics.private_topics(principal));
        }
        topics
    }
}
