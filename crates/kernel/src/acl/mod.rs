//! Access control: role inheritance plus ordered allow/deny rules.
//!
//! The ACL is built once from site configuration and is read-only
//! afterwards, so a single instance can be shared across every request.
//! - [`RoleGraph`] answers "does role R include role Q"
//! - [`AccessControlList`] answers `is_allowed(role, resource, privilege)`

mod error;
mod list;
mod role_graph;

pub use error::AclError;
pub use list::{AccessControlList, Decision, Effect, Rule};
pub use role_graph::RoleGraph;
