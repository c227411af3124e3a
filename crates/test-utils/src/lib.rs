//! Sitenav test utilities.
//!
//! Fixtures for integration testing: the sample site, a small page tree
//! builder, and a session double that records writes.

use std::collections::HashMap;

use sitenav_kernel::menu::{RouteDefinition, RouteTable};
use sitenav_kernel::site::ConfigFormat;
use sitenav_kernel::{RoleSession, Site, SiteConfig};

/// The sample site shipped in `config/site.toml`.
pub const SAMPLE_SITE_TOML: &str = include_str!("../../../config/site.toml");

/// Parse the sample site description.
pub fn sample_config() -> SiteConfig {
    SiteConfig::parse_str(SAMPLE_SITE_TOML, ConfigFormat::Toml, "config/site.toml")
        .unwrap_or_else(|e| panic!("sample site config must parse: {e}"))
}

/// Compose the sample site.
pub fn sample_site() -> Site {
    Site::from_config(&sample_config())
        .unwrap_or_else(|e| panic!("sample site must compose: {e}"))
}

/// A route table where each name maps to `/` + the name with dots as slashes.
pub fn dotted_routes<'a>(names: impl IntoIterator<Item = &'a str>) -> RouteTable {
    let definitions = names
        .into_iter()
        .map(|name| RouteDefinition::new(name, format!("/{}", name.replace('.', "/"))));
    RouteTable::from_definitions(definitions)
        .unwrap_or_else(|e| panic!("test routes must be unique: {e}"))
}

/// In-memory session that records every write.
#[derive(Debug, Clone, Default)]
pub struct TestSession {
    pub values: HashMap<String, String>,
    pub writes: Vec<(String, String)>,
}

impl TestSession {
    /// An empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already holding `key = value`.
    pub fn with(key: &str, value: &str) -> Self {
        let mut session = Self::new();
        session.values.insert(key.to_string(), value.to_string());
        session
    }

    /// Number of writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }
}

impl RoleSession for TestSession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.writes.push((key.to_string(), value.to_string()));
    }
}
