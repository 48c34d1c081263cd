//! Principal identity
//!
//! A `Principal` is either a guest or an authenticated customer. It is the
//! key of every per-principal cache and the argument passed to every topic
//! source.
//!
//! Callers usually hold an optional integer id coming from the user context.
//! `Principal::from_id` is the only place where that id is interpreted:
//! `None` and `Some(0)` both mean "guest". A real customer id of `0` cannot be
//! represented and is silently treated as a guest.

use std::fmt;
use std::num::NonZeroU64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Principal {
    #[default]
    Guest,
    Customer(NonZeroU64),
}

impl Principal {
    pub fn from_id(id: Option<u64>) -> Self {
        match id.and_then(NonZeroU64::new) {
            Some(id) => Principal::Customer(id),
            None => Principal::Guest,
        }
    }

    /// Customer id, `None` for a guest.
    pub fn id(&self) -> Option<u64> {
        match self {
            Principal::Guest => None,
            Principal::Customer(id) => Some(id.get()),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Principal::Guest)
    }
}

impl From<Option<u64>> for Principal {
    fn from(id: Option<u64>) -> Self {
        Principal::from_id(id)
    }
}

impl From<u64> for Principal {
    fn from(id: u64) -> Self {
        Principal::from_id(Some(id))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Guest => write!(f, "guest"),
            Principal::Customer(id) => write!(f, "customer:{id}"),
        }
    }
}
