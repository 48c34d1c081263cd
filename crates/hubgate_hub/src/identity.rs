//! Acting principal lookup.

use hubgate_topics::Principal;

/// Where the id of the principal behind the current request comes from.
pub trait IdentitySource: Send + Sync {
    /// `None` or `Some(0)` for an anonymous caller.
    fn current_principal_id(&self) -> Option<u64>;

    fn current_principal(&self) -> Principal {
        Principal::from_id(self.current_principal_id())
    }
}

/// Always reports the same principal. Used by the CLI and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity {
    id: Option<u64>,
}

impl StaticIdentity {
    pub fn new(id: Option<u64>) -> Self {
        Self { id }
    }

    pub fn guest() -> Self {
        Self { id: None }
    }

    pub fn customer(id: u64) -> Self {
        Self { id: Some(id) }
    }
}

impl IdentitySource for StaticIdentity {
    fn current_principal_id(&self) -> Option<u64> {
        self.id
    }
}
