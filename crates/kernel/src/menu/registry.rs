//! Route registry - maps route names to path patterns.
//!
//! This is the name → URL collaborator consumed by the navigation build,
//! and the path → route-name matcher that yields the current route for a
//! request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::RouteError;
use super::tree::{RouteParams, RouteResolver};

/// A named route and its path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Route name (e.g., "company.investors")
    pub name: String,
    /// URL path pattern (e.g., "/company/investors", "/blog/:slug")
    pub path: String,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Result of matching a path against registered routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the matched route.
    pub name: String,
    /// Path parameters extracted (e.g., {"slug": "my-post"})
    pub params: RouteParams,
}

/// Registry of named routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Route definitions, indexed by name
    routes: HashMap<String, RouteDefinition>,
    /// Route names in registration order
    names: Vec<String>,
    /// Route names in match order (most specific first)
    match_order: Vec<String>,
}

impl RouteTable {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a route table from definitions, rejecting duplicate names.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = RouteDefinition>,
    ) -> Result<Self, RouteError> {
        let mut table = Self::new();
        for definition in definitions {
            table.register(definition)?;
        }
        Ok(table)
    }

    /// Register a route definition.
    pub fn register(&mut self, definition: RouteDefinition) -> Result<(), RouteError> {
        if definition.name.is_empty() {
            return Err(RouteError::EmptyRouteName);
        }
        if self.routes.contains_key(&definition.name) {
            return Err(RouteError::DuplicateRoute {
                route: definition.name,
            });
        }

        self.names.push(definition.name.clone());
        self.routes.insert(definition.name.clone(), definition);
        self.build_match_order();
        Ok(())
    }

    /// Rebuild the match order.
    fn build_match_order(&mut self) {
        self.match_order = self.names.clone();

        // Fewer params = more specific = first; ties keep registration order
        let routes = &self.routes;
        self.match_order.sort_by_key(|name| {
            let path = routes
                .get(name)
                .map(|r| r.path.as_str())
                .unwrap_or_default();
            let param_count = path.matches(':').count();
            let segment_count = path.matches('/').count();
            (param_count, -(segment_count as i32))
        });

        debug!(routes = self.match_order.len(), "built route table");
    }

    /// Generate the URL for a named route.
    pub fn generate(&self, name: &str, params: &RouteParams) -> Result<String, RouteError> {
        if name.is_empty() {
            return Err(RouteError::EmptyRouteName);
        }
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| RouteError::unknown(name))?;

        let segments = route
            .path
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(param) => params
                    .get(param)
                    .map(|value| urlencoding::encode(value).into_owned())
                    .ok_or_else(|| RouteError::missing_param(name, param)),
                None => Ok(segment.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(segments.join("/"))
    }

    /// Match a request path against registered routes.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.match_order.iter().find_map(|name| {
            let route = self.routes.get(name)?;
            let params = match_pattern(&route.path, path)?;
            Some(RouteMatch {
                name: name.clone(),
                params,
            })
        })
    }

    /// Get a route by name.
    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.get(name)
    }

    /// All routes in registration order.
    pub fn all(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.names.iter().filter_map(|name| self.routes.get(name))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError> {
        self.generate(route, params)
    }
}

/// Match a route pattern against a path, extracting parameters.
///
/// Pattern: "/blog/:slug/edit"
/// Path: "/blog/my-post/edit"
/// Result: Some({"slug": "my-post"})
fn match_pattern(pattern: &str, path: &str) -> Option<RouteParams> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = RouteParams::new();

    for (pat, actual) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pat.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            let value = urlencoding::decode(actual)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| actual.to_string());
            params.insert(param_name.to_string(), value);
        } else if pat != actual {
            return None;
        }
    }

    Some(params)
}
