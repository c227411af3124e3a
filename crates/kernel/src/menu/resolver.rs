//! Active-page and breadcrumb computation for the current request.

use super::registry::RouteMatch;
use super::tree::{NavigationNode, NavigationTree, NodeId, RouteParams};

/// The route matched for the current request.
///
/// An empty name means the request matched no route, and no page is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveRoute {
    name: String,
    params: RouteParams,
}

impl ActiveRoute {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: RouteParams::new(),
        }
    }

    /// A request that matched no route.
    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn is_unmatched(&self) -> bool {
        self.name.is_empty()
    }

    /// Whether `node` is the page for this route.
    ///
    /// The names must be equal and every param the page declares must be
    /// present with the same value among the matched params.
    pub fn matches(&self, node: &NavigationNode) -> bool {
        !self.is_unmatched()
            && node.route() == Some(self.name.as_str())
            && node
                .params()
                .iter()
                .all(|(k, v)| self.params.get(k) == Some(v))
    }
}

impl From<RouteMatch> for ActiveRoute {
    fn from(m: RouteMatch) -> Self {
        Self {
            name: m.name,
            params: m.params,
        }
    }
}

impl From<Option<&str>> for ActiveRoute {
    fn from(name: Option<&str>) -> Self {
        name.map(Self::named).unwrap_or_default()
    }
}

/// Per-request set of active nodes, sized to the tree it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSet {
    flags: Vec<bool>,
}

impl ActiveSet {
    pub fn contains(&self, id: NodeId) -> bool {
        self.flags.get(id.index()).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|f| *f)
    }
}

/// Mark every page matching `route`, plus all of its ancestors, as active.
pub fn mark_active(tree: &NavigationTree, route: &ActiveRoute) -> ActiveSet {
    let mut flags = vec![false; tree.len()];
    if !route.is_unmatched() {
        for &root in tree.roots() {
            visit(tree, root, route, &mut flags);
        }
    }
    ActiveSet { flags }
}

fn visit(tree: &NavigationTree, id: NodeId, route: &ActiveRoute, flags: &mut [bool]) -> bool {
    let node = tree.node(id);
    let mut active = route.matches(node);
    for &child in node.children() {
        // no short-circuit: every branch gets its own flags
        if visit(tree, child, route, flags) {
            active = true;
        }
    }
    flags[id.index()] = active;
    active
}

/// Root-to-page path for the first page (in declaration order) matching `route`.
///
/// Empty when no page matches.
pub fn breadcrumb_path(tree: &NavigationTree, route: &ActiveRoute) -> Vec<NodeId> {
    let mut path = Vec::new();
    if route.is_unmatched() {
        return path;
    }
    for &root in tree.roots() {
        if find_path(tree, root, route, &mut path) {
            return path;
        }
    }
    path
}

fn find_path(
    tree: &NavigationTree,
    id: NodeId,
    route: &ActiveRoute,
    path: &mut Vec<NodeId>,
) -> bool {
    path.push(id);
    let node = tree.node(id);
    if route.matches(node) {
        return true;
    }
    for &child in node.children() {
        if find_path(tree, child, route, path) {
            return true;
        }
    }
    path.pop();
    false
}
