//! hubgate_topics
//!
//! Resolves which hub topics a principal may publish or subscribe to.
//!
//! Public types:
//! - `Principal`: guest or customer, the key every lookup is made with
//! - `TopicSource`: pluggable resolver, tagged public or private on registration
//! - `TopicAggregator`: ordered, duplicate-preserving public/private views
//! - `AuthorizationResolver`: public topics, plus private ones for customers

pub mod aggregator;
pub mod authorization;
pub mod principal;
pub mod source;

pub use aggregator::TopicAggregator;
pub use authorization::AuthorizationResolver;
pub use principal::Principal;
pub use source::{FnTopics, StaticTopics, TemplateTopics, TopicSource, Visibility};

/// A topic IRI. Only compared by string equality.
pub type Topic = String;
