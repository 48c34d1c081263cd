//! Updates sent to the hub
//!
//! An `Update` is built once per publish call and dropped afterwards. Its
//! fields map one-to-one onto the hub's form-encoded publish request:
//! - `topic`: repeated once per topic, the first one is the canonical topic
//! - `data`: serialized payload
//! - `private`: `on` when the update must only reach authorized subscribers
//! - `id`, `type`, `retry`: optional SSE event fields

use hubgate_topics::Topic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    topics: Vec<Topic>,
    data: String,
    private: bool,
    id: Option<String>,
    event_type: Option<String>,
    retry: Option<u64>,
}

impl Update {
    pub fn new(topic: impl Into<Topic>, data: impl Into<String>, private: bool) -> Self {
        Self {
            topics: vec![topic.into()],
            data: data.into(),
            private,
            id: None,
            event_type: None,
            retry: None,
        }
    }

    /// Adds an alternate topic the update is also dispatched to.
    pub fn with_topic(mut self, topic: impl Into<Topic>) -> Self {
        self.topics.push(topic.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_retry(mut self, retry: u64) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    pub fn retry(&self) -> Option<u64> {
        self.retry
    }

    /// Key/value pairs of the publish request body, unset fields omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields: Vec<(&'static str, String)> = self
            .topics
            .iter()
            .map(|topic| ("topic", topic.clone()))
            .collect();

        fields.push(("data", self.data.clone()));
        if self.private {
            fields.push(("private", "on".to_string()));
        }
        if let Some(id) = &self.id {
            fields.push(("id", id.clone()));
        }
        if let Some(event_type) = &self.event_type {
            fields.push(("type", event_type.clone()));
        }
        if let Some(retry) = self.retry {
            fields.push(("retry", retry.to_string()));
        }

        fields
    }
}
