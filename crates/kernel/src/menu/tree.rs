//! Navigation tree built once from declarative page specs.
//!
//! Nodes live in an arena in declaration (pre-)order and are addressed by
//! [`NodeId`]. The tree never changes after [`NavigationTree::build`]; any
//! per-request state (active, restricted) lives in separate structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::RouteError;

/// Route parameters, ordered by name.
pub type RouteParams = BTreeMap<String, String>;

/// URL used when a page has no resolvable link.
pub const PLACEHOLDER_URL: &str = "#";

/// Turns a route name (plus params) into a URL.
pub trait RouteResolver {
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError>;
}

/// Declarative page specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Menu label
    pub label: String,
    /// Route name the page links to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Route parameters; also narrow which requests make the page active
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: RouteParams,
    /// Query string appended to the generated URL
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: RouteParams,
    /// Fragment appended to the generated URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    /// Literal URI, used when no route is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// ACL resource guarding the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// ACL privilege required on `resource`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege: Option<String>,
    /// Whether the page appears in rendered menus
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Child pages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PageSpec>,
}

fn default_true() -> bool {
    true
}

impl PageSpec {
    /// A visible page with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            route: None,
            params: RouteParams::new(),
            query: RouteParams::new(),
            fragment: None,
            uri: None,
            resource: None,
            privilege: None,
            visible: true,
            pages: Vec::new(),
        }
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn privilege(mut self, privilege: impl Into<String>) -> Self {
        self.privilege = Some(privilege.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn child(mut self, page: PageSpec) -> Self {
        self.pages.push(page);
        self
    }
}

/// Index of a node in a [`NavigationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A built navigation node with its URL already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationNode {
    label: String,
    route: Option<String>,
    params: RouteParams,
    resource: Option<String>,
    privilege: Option<String>,
    visible: bool,
    url: String,
    depth: usize,
    children: Vec<NodeId>,
}

impl NavigationNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn privilege(&self) -> Option<&str> {
        self.privilege.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Distance from the top level (roots are depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Immutable page hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationTree {
    nodes: Vec<NavigationNode>,
    roots: Vec<NodeId>,
}

impl NavigationTree {
    /// Build the tree depth-first in declaration order, resolving URLs.
    ///
    /// A route that fails to resolve is logged and the page links to
    /// [`PLACEHOLDER_URL`]; the rest of the tree still builds.
    pub fn build<R>(pages: &[PageSpec], resolver: &R) -> Self
    where
        R: RouteResolver + ?Sized,
    {
        let mut tree = Self::default();
        let roots = pages
            .iter()
            .map(|page| tree.insert(page, 0, resolver))
            .collect();
        tree.roots = roots;

        debug!(
            pages = tree.nodes.len(),
            roots = tree.roots.len(),
            "built navigation tree"
        );
        tree
    }

    fn insert<R>(&mut self, page: &PageSpec, depth: usize, resolver: &R) -> NodeId
    where
        R: RouteResolver + ?Sized,
    {
        let id = NodeId(self.nodes.len());
        let route = page.route.clone().filter(|r| !r.is_empty());
        let url = resolve_url(page, resolver);

        self.nodes.push(NavigationNode {
            label: page.label.clone(),
            route,
            params: page.params.clone(),
            resource: page.resource.clone(),
            privilege: page.privilege.clone(),
            visible: page.visible,
            url,
            depth,
            children: Vec::new(),
        });

        let children = page
            .pages
            .iter()
            .map(|child| self.insert(child, depth + 1, resolver))
            .collect();
        self.nodes[id.0].children = children;

        id
    }

    /// The node at `id`.
    ///
    /// `NodeId`s are only meaningful for the tree that handed them out;
    /// an id from another tree may panic. Use [`get`](Self::get) when the
    /// id's origin is not known.
    pub fn node(&self, id: NodeId) -> &NavigationNode {
        &self.nodes[id.0]
    }

    /// The node at `id`, or `None` if this tree has no such node.
    pub fn get(&self, id: NodeId) -> Option<&NavigationNode> {
        self.nodes.get(id.0)
    }

    /// Top-level nodes in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Every node in declaration (pre-)order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NavigationNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn resolve_url<R>(page: &PageSpec, resolver: &R) -> String
where
    R: RouteResolver + ?Sized,
{
    let base = match (page.route.as_deref(), page.uri.as_deref()) {
        (Some(""), _) => Err(RouteError::EmptyRouteName),
        (Some(route), _) => resolver.resolve(route, &page.params),
        (None, Some(uri)) => return uri.to_string(),
        (None, None) => return PLACEHOLDER_URL.to_string(),
    };

    match base {
        Ok(url) => with_query_and_fragment(url, page),
        Err(e) => {
            warn!(
                label = %page.label,
                route = ?page.route,
                error = %e,
                "route resolution failed, using placeholder link"
            );
            PLACEHOLDER_URL.to_string()
        }
    }
}

fn with_query_and_fragment(mut url: String, page: &PageSpec) -> String {
    if !page.query.is_empty() {
        let query = page
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }
    if let Some(fragment) = &page.fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
