//! Site composition: ACL, route table, navigation tree and role selector.
//!
//! A [`Site`] is built once from a [`SiteConfig`] and then shared read-only
//! (typically behind an `Arc`) by every request. Construction either fully
//! succeeds or returns an error; there is no partially built site.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::acl::{AccessControlList, Effect};
use crate::error::SiteError;
use crate::menu::{
    ActiveRoute, MenuView, NavigationTree, PageAccess, PageSpec, PermissionRenderer, RenderOptions,
    RouteDefinition, RouteTable, authorize_route,
};
use crate::role::{RoleSelector, RoleSession};

/// A role and its optional parent. Parents must be listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// An allow/deny rule as written in the site file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub role: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege: Option<String>,
    pub effect: Effect,
}

/// Declarative site description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
    #[serde(default)]
    pub resources: Vec<String>,
    /// Applied in order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
    #[serde(default)]
    pub navigation: Vec<PageSpec>,
}

/// Site file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// `.yml` / `.yaml` are YAML; anything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

impl SiteConfig {
    /// Read and parse a site file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read site config: {}", path.display()))?;

        let config = Self::parse_str(
            &content,
            ConfigFormat::from_path(path),
            &path.display().to_string(),
        )?;
        Ok(config)
    }

    /// Parse a site description. `origin` names the source in errors.
    pub fn parse_str(content: &str, format: ConfigFormat, origin: &str) -> Result<Self, SiteError> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| SiteError::parse(origin, e)),
            ConfigFormat::Yaml => {
                serde_yml::from_str(content).map_err(|e| SiteError::parse(origin, e))
            }
        }
    }
}

/// Everything needed to render menus, immutable after construction.
#[derive(Debug)]
pub struct Site {
    acl: AccessControlList,
    routes: RouteTable,
    tree: NavigationTree,
    selector: RoleSelector,
}

impl Site {
    /// Compose a site. Any configuration error aborts the whole build.
    pub fn from_config(config: &SiteConfig) -> Result<Self, SiteError> {
        let acl = build_acl(config)?;
        let routes = RouteTable::from_definitions(config.routes.iter().cloned())?;
        validate_pages(&config.navigation, &acl)?;
        let tree = NavigationTree::build(&config.navigation, &routes);
        let selector = RoleSelector::from_roles(acl.roles())?;

        info!(
            roles = acl.roles().len(),
            resources = acl.resource_count(),
            rules = acl.rule_count(),
            routes = routes.len(),
            pages = tree.len(),
            "site composed"
        );

        Ok(Self {
            acl,
            routes,
            tree,
            selector,
        })
    }

    /// Store the selected role under a different session key.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.selector = self.selector.with_session_key(key);
        self
    }

    pub fn acl(&self) -> &AccessControlList {
        &self.acl
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    pub fn selector(&self) -> &RoleSelector {
        &self.selector
    }

    pub fn renderer(&self) -> PermissionRenderer<'_> {
        PermissionRenderer::new(&self.tree, &self.acl)
    }

    /// The current route for a request path; unmatched when no route fits.
    pub fn current_route(&self, path: &str) -> ActiveRoute {
        self.routes
            .match_path(path)
            .map(ActiveRoute::from)
            .unwrap_or_default()
    }

    /// Pick the viewer role for a request.
    pub fn select_role<S>(&self, override_role: Option<&str>, session: &mut S) -> String
    where
        S: RoleSession + ?Sized,
    {
        self.selector.resolve(override_role, session)
    }

    /// Menu and breadcrumbs for `role` on `route`.
    pub fn render(&self, role: &str, route: &ActiveRoute) -> MenuView {
        self.renderer().render_menu(role, route)
    }

    pub fn render_with(&self, role: &str, route: &ActiveRoute, options: RenderOptions) -> MenuView {
        self.renderer().with_options(options).render_menu(role, route)
    }

    /// Whether `role` may open the page for `route`.
    pub fn authorize(&self, role: &str, route: &ActiveRoute) -> PageAccess {
        authorize_route(&self.tree, &self.acl, role, route)
    }
}

fn build_acl(config: &SiteConfig) -> Result<AccessControlList, SiteError> {
    let mut acl = AccessControlList::new();
    for role in &config.roles {
        acl.add_role(&role.id, role.parent.as_deref())?;
    }
    for resource in &config.resources {
        acl.add_resource(resource)?;
    }
    for rule in &config.rules {
        acl.add_rule(
            &rule.role,
            &rule.resource,
            rule.privilege.as_deref(),
            rule.effect,
        )?;
    }
    Ok(acl)
}

fn validate_pages(pages: &[PageSpec], acl: &AccessControlList) -> Result<(), SiteError> {
    for page in pages {
        match (&page.resource, &page.privilege) {
            (Some(resource), _) if !acl.has_resource(resource) => {
                return Err(SiteError::UnknownPageResource {
                    label: page.label.clone(),
                    resource: resource.clone(),
                });
            }
            (None, Some(privilege)) => {
                return Err(SiteError::PrivilegeWithoutResource {
                    label: page.label.clone(),
                    privilege: privilege.clone(),
                });
            }
            _ => {}
        }
        validate_pages(&page.pages, acl)?;
    }
    Ok(())
}
