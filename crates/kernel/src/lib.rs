//! Sitenav Kernel Library
//!
//! Role-gated navigation menus: an ACL with role inheritance, a page tree
//! built from configuration, and a renderer that merges both per request.
//! The `sitenav` binary is a thin CLI over this library.

pub mod acl;
pub mod config;
pub mod error;
pub mod menu;
pub mod role;
pub mod session;
pub mod site;

pub use acl::{AccessControlList, AclError, RoleGraph};
pub use config::Config;
pub use error::SiteError;
pub use menu::{ActiveRoute, MenuView, NavigationTree, PageAccess, PageSpec, RouteTable};
pub use role::{RoleSelector, RoleSession};
pub use site::{Site, SiteConfig};
