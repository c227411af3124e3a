//! Permission-aware menu rendering.
//!
//! Combines ACL decisions for a viewer role with the active path for the
//! current route into a fresh presentation tree. The shared navigation tree
//! and ACL are only read.

use serde::Serialize;

use super::guard::permits;
use super::resolver::{ActiveRoute, ActiveSet, breadcrumb_path, mark_active};
use super::tree::{NavigationTree, NodeId};
use crate::acl::AccessControlList;

/// A menu entry ready for templating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNode {
    pub label: String,
    pub url: String,
    pub active: bool,
    /// Listed but not navigable for this role.
    pub restricted: bool,
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    /// The navigable link, or `None` for restricted entries.
    pub fn link(&self) -> Option<&str> {
        (!self.restricted).then_some(self.url.as_str())
    }
}

/// One step of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub url: String,
    /// The final entry: the current page, rendered without a link.
    pub is_current: bool,
}

impl Breadcrumb {
    pub fn link(&self) -> Option<&str> {
        (!self.is_current).then_some(self.url.as_str())
    }
}

/// Menu plus breadcrumbs for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub role: String,
    pub items: Vec<RenderedNode>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Rendering knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Deepest level to render; roots are depth 0.
    pub max_depth: Option<usize>,
    /// Include pages marked `visible = false`.
    pub render_invisible: bool,
}

/// Renders a navigation tree for a viewer role.
#[derive(Debug, Clone, Copy)]
pub struct PermissionRenderer<'a> {
    tree: &'a NavigationTree,
    acl: &'a AccessControlList,
    options: RenderOptions,
}

impl<'a> PermissionRenderer<'a> {
    pub fn new(tree: &'a NavigationTree, acl: &'a AccessControlList) -> Self {
        Self {
            tree,
            acl,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render the menu for `role` with the page for `route` marked active.
    ///
    /// Denied pages stay in the output flagged `restricted`; their children
    /// are evaluated on their own.
    pub fn render(&self, role: &str, route: &ActiveRoute) -> Vec<RenderedNode> {
        let active = mark_active(self.tree, route);
        self.render_level(self.tree.roots(), role, &active)
    }

    fn render_level(&self, ids: &[NodeId], role: &str, active: &ActiveSet) -> Vec<RenderedNode> {
        ids.iter()
            .filter_map(|&id| self.render_node(id, role, active))
            .collect()
    }

    fn render_node(&self, id: NodeId, role: &str, active: &ActiveSet) -> Option<RenderedNode> {
        let node = self.tree.node(id);
        if !node.is_visible() && !self.options.render_invisible {
            return None;
        }
        if self.options.max_depth.is_some_and(|max| node.depth() > max) {
            return None;
        }

        Some(RenderedNode {
            label: node.label().to_string(),
            url: node.url().to_string(),
            active: active.contains(id),
            restricted: !self.is_allowed(id, role),
            children: self.render_level(node.children(), role, active),
        })
    }

    /// Whether `role` may open the page at `id`. Pages without a resource are public.
    pub fn is_allowed(&self, id: NodeId, role: &str) -> bool {
        let node = self.tree.node(id);
        match node.resource() {
            Some(resource) => permits(self.acl, role, resource, node.privilege()),
            None => true,
        }
    }

    /// Breadcrumb trail for `route`; the last entry is the current page.
    pub fn breadcrumbs(&self, route: &ActiveRoute) -> Vec<Breadcrumb> {
        let path = breadcrumb_path(self.tree, route);
        let last = path.len().saturating_sub(1);
        path.iter()
            .enumerate()
            .map(|(i, &id)| {
                let node = self.tree.node(id);
                Breadcrumb {
                    label: node.label().to_string(),
                    url: node.url().to_string(),
                    is_current: i == last,
                }
            })
            .collect()
    }

    /// Menu and breadcrumbs in one view.
    pub fn render_menu(&self, role: &str, route: &ActiveRoute) -> MenuView {
        MenuView {
            role: role.to_string(),
            items: self.render(role, route),
            breadcrumbs: self.breadcrumbs(route),
        }
    }
}
