//! Node registry orchestrator.
//!
//! Scopes partition the node space; the table itself lives in the private
//! `core` module.

mod core;

pub use self::core::{ActionHandler, NavNode, NodeRegistry, OwnerToken, RegisterOutcome};
