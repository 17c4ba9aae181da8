//! `opsconsole-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O, no collaborators).

pub mod entity;
pub mod error;
pub mod id;
pub mod reference;

pub use entity::{Entity, find_unique_by_name};
pub use error::{DomainError, DomainResult};
pub use id::{CompanyId, RoleId, UserId};
pub use reference::Reference;

/// Reference to a company as held by a draft.
pub type CompanyRef = Reference<CompanyId>;

/// Reference to a role as held by a draft.
pub type RoleRef = Reference<RoleId>;
