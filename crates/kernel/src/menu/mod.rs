//! Navigation menu: page tree, route table, active state and rendering.
//!
//! The tree is built once from page specs and a [`RouteResolver`], then
//! rendered per request:
//! - [`mark_active`] / [`breadcrumb_path`] locate the current page
//! - [`PermissionRenderer`] merges that with ACL decisions for a role
//! - [`authorize_route`] answers whether the current page may be served

mod error;
mod guard;
mod registry;
mod render;
mod resolver;
mod tree;

pub use error::RouteError;
pub use guard::{PageAccess, authorize_resource, authorize_route};
pub use registry::{RouteDefinition, RouteMatch, RouteTable};
pub use render::{Breadcrumb, MenuView, PermissionRenderer, RenderOptions, RenderedNode};
pub use resolver::{ActiveRoute, ActiveSet, breadcrumb_path, mark_active};
pub use tree::{
    NavigationNode, NavigationTree, NodeId, PLACEHOLDER_URL, PageSpec, RouteParams, RouteResolver,
};
