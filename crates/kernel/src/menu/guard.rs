//! Page access checks shared by the menu renderer and page handlers.

use serde::Serialize;
use tracing::warn;

use super::resolver::{ActiveRoute, breadcrumb_path};
use super::tree::NavigationTree;
use crate::acl::AccessControlList;

/// Whether the page for a request may be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum PageAccess {
    /// The page is public or the role is allowed.
    Granted,
    /// The ACL denies the role; handlers answer with 403.
    Forbidden {
        role: String,
        resource: String,
        privilege: Option<String>,
    },
    /// No page in the navigation carries the current route.
    Unlisted,
}

impl PageAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Evaluate an ACL query, treating evaluation errors as a deny.
pub(crate) fn permits(
    acl: &AccessControlList,
    role: &str,
    resource: &str,
    privilege: Option<&str>,
) -> bool {
    match acl.is_allowed(role, resource, privilege) {
        Ok(allowed) => allowed,
        Err(e) => {
            warn!(
                role,
                resource,
                ?privilege,
                error = %e,
                "access evaluation failed, treating as deny"
            );
            false
        }
    }
}

/// Check a page guarded by an explicit resource and privilege.
pub fn authorize_resource(
    acl: &AccessControlList,
    role: &str,
    resource: Option<&str>,
    privilege: Option<&str>,
) -> PageAccess {
    let Some(resource) = resource else {
        return PageAccess::Granted;
    };
    if permits(acl, role, resource, privilege) {
        PageAccess::Granted
    } else {
        PageAccess::Forbidden {
            role: role.to_string(),
            resource: resource.to_string(),
            privilege: privilege.map(str::to_string),
        }
    }
}

/// Check the page the navigation tree lists for `route`.
pub fn authorize_route(
    tree: &NavigationTree,
    acl: &AccessControlList,
    role: &str,
    route: &ActiveRoute,
) -> PageAccess {
    let path = breadcrumb_path(tree, route);
    let Some(&id) = path.last() else {
        return PageAccess::Unlisted;
    };
    let node = tree.node(id);
    authorize_resource(acl, role, node.resource(), node.privilege())
}
