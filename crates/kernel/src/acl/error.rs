//! ACL error types.
//!
//! Build-time variants are fatal configuration errors. The same variants
//! surface from `is_allowed` when a caller passes an unregistered role or
//! resource; renderers treat those as a deny.

use thiserror::Error;

/// Errors raised while building or querying an [`AccessControlList`](super::AccessControlList).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    /// A role with this identifier is already registered.
    #[error("role '{role}' is already registered")]
    DuplicateRole { role: String },

    /// The role (or the parent being attached) is not registered.
    #[error("role '{role}' is not registered")]
    UnknownRole { role: String },

    /// A resource with this identifier is already registered.
    #[error("resource '{resource}' is already registered")]
    DuplicateResource { resource: String },

    /// The resource is not registered.
    #[error("resource '{resource}' is not registered")]
    UnknownResource { resource: String },

    /// Walking the parent chain of `role` did not reach a root.
    #[error("role inheritance cycle detected starting at '{role}' after {steps} steps")]
    CycleDetected { role: String, steps: usize },
}

impl AclError {
    pub fn duplicate_role(role: impl Into<String>) -> Self {
        Self::DuplicateRole { role: role.into() }
    }

    pub fn unknown_role(role: impl Into<String>) -> Self {
        Self::UnknownRole { role: role.into() }
    }

    pub fn duplicate_resource(resource: impl Into<String>) -> Self {
        Self::DuplicateResource {
            resource: resource.into(),
        }
    }

    pub fn unknown_resource(resource: impl Into<String>) -> Self {
        Self::UnknownResource {
            resource: resource.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        assert!(
            AclError::unknown_role("root")
                .to_string()
                .contains("'root'")
        );
        assert!(
            AclError::duplicate_resource("page:home")
                .to_string()
                .contains("page:home")
        );
    }

    #[test]
    fn cycle_message_reports_steps() {
        let err = AclError::CycleDetected {
            role: "a".to_string(),
            steps: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("cycle"));
        assert!(msg.contains("3 steps"));
    }
}
