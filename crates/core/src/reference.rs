//! Tagged references to company/role records.
//!
//! A reference is either a canonical id handed out by the backend or a
//! human-readable name typed by an operator. The tag is decided once, where
//! the value enters the system; nothing downstream re-inspects strings to
//! guess which of the two it holds.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Reference to an entity by canonical id or by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reference<I> {
    ById(I),
    ByName(String),
}

impl<I> Reference<I> {
    pub fn by_id(id: I) -> Self {
        Self::ById(id)
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    /// Canonical id, if this reference already carries one.
    pub fn id(&self) -> Option<&I> {
        match self {
            Reference::ById(id) => Some(id),
            Reference::ByName(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::ById(_) => None,
            Reference::ByName(name) => Some(name),
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Reference::ById(_))
    }
}

impl<I: FromStr> Reference<I> {
    /// Tag a raw boundary value (legacy form input, query parameter).
    ///
    /// Values that parse as a canonical id become `ById`; anything else non-blank
    /// becomes `ByName`. Blank input is no reference at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<I>() {
            Ok(id) => Some(Reference::ById(id)),
            Err(_) => Some(Reference::ByName(raw.to_string())),
        }
    }
}

impl<I: core::fmt::Display> core::fmt::Display for Reference<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Reference::ById(id) => write!(f, "id:{id}"),
            Reference::ByName(name) => write!(f, "name:{name}"),
        }
    }
}
