//! Viewer role selection.
//!
//! Resolution order: request override → session value → default role.
//! Every candidate is validated against a fixed allow-list; a stale or
//! corrupted session value is replaced with the default.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::acl::RoleGraph;

/// Session key for storing the selected role.
pub const SESSION_USER_ROLE: &str = "user_role";

/// Key/value session storage consumed by [`RoleSelector::resolve`].
pub trait RoleSession {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl RoleSession for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

/// Errors building a [`RoleSelector`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleSelectorError {
    #[error("role selector needs at least one allowed role")]
    NoRoles,

    #[error("default role '{role}' is not in the allowed roles")]
    DefaultNotAllowed { role: String },
}

/// Role picked for a request, and whether the session must be updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChoice {
    pub role: String,
    pub persist: bool,
}

/// Picks the effective viewer role for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSelector {
    allowed: Vec<String>,
    default_role: String,
    session_key: String,
}

impl RoleSelector {
    pub fn new<I, S>(allowed: I, default_role: impl Into<String>) -> Result<Self, RoleSelectorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        let default_role = default_role.into();

        if allowed.is_empty() {
            return Err(RoleSelectorError::NoRoles);
        }
        if !allowed.contains(&default_role) {
            return Err(RoleSelectorError::DefaultNotAllowed { role: default_role });
        }

        Ok(Self {
            allowed,
            default_role,
            session_key: SESSION_USER_ROLE.to_string(),
        })
    }

    /// Allow every role in `graph`, defaulting to its first root.
    pub fn from_roles(graph: &RoleGraph) -> Result<Self, RoleSelectorError> {
        let default_role = graph.first_root().ok_or(RoleSelectorError::NoRoles)?;
        Self::new(graph.roles(), default_role)
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn is_allowed_role(&self, role: &str) -> bool {
        self.allowed.iter().any(|r| r == role)
    }

    pub fn allowed_roles(&self) -> &[String] {
        &self.allowed
    }

    pub fn default_role(&self) -> &str {
        &self.default_role
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Pick the role from an override and the stored session value (sync, testable).
    pub fn choose(&self, override_role: Option<&str>, stored: Option<&str>) -> RoleChoice {
        if let Some(role) = override_role {
            if self.is_allowed_role(role) {
                return RoleChoice {
                    role: role.to_string(),
                    persist: true,
                };
            }
            debug!(override_role = %role, "ignoring role override outside the allow-list");
        }

        match stored {
            None => RoleChoice {
                role: self.default_role.clone(),
                persist: false,
            },
            Some(role) if self.is_allowed_role(role) => RoleChoice {
                role: role.to_string(),
                persist: false,
            },
            Some(role) => {
                warn!(
                    session_role = %role,
                    default_role = %self.default_role,
                    "session contains unknown role, resetting to default"
                );
                RoleChoice {
                    role: self.default_role.clone(),
                    persist: true,
                }
            }
        }
    }

    /// Resolve the role for a request, writing changes back to `session`.
    pub fn resolve<S>(&self, override_role: Option<&str>, session: &mut S) -> String
    where
        S: RoleSession + ?Sized,
    {
        let stored = session.get(&self.session_key);
        let choice = self.choose(override_role, stored.as_deref());
        if choice.persist {
            session.set(&self.session_key, &choice.role);
        }
        choice.role
    }
}
