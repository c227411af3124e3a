//! Site composition errors.

use thiserror::Error;

use crate::acl::AclError;
use crate::menu::RouteError;
use crate::role::RoleSelectorError;

/// Errors that prevent a [`Site`](crate::site::Site) from being built.
///
/// All of these are fatal at startup; request-time problems degrade
/// instead of surfacing here.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("invalid access control configuration: {0}")]
    Acl(#[from] AclError),

    #[error("invalid route table: {0}")]
    Route(#[from] RouteError),

    #[error("invalid role selection: {0}")]
    RoleSelector(#[from] RoleSelectorError),

    /// A navigation page points at a resource the ACL does not know.
    #[error("page '{label}' references unregistered resource '{resource}'")]
    UnknownPageResource { label: String, resource: String },

    /// A page names a privilege without a resource to apply it to.
    #[error("page '{label}' sets privilege '{privilege}' without a resource")]
    PrivilegeWithoutResource { label: String, privilege: String },

    /// The site file could not be parsed.
    #[error("failed to parse site config {path}: {details}")]
    Parse { path: String, details: String },
}

impl SiteError {
    pub fn parse(path: impl Into<String>, details: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            details: details.to_string(),
        }
    }
}
