//! Sitenav CLI
//!
//! Loads a site file and renders role-gated menus as JSON.
//!
//! Usage:
//!   sitenav render --role member --path /company/investors
//!   sitenav check --role guest --resource page:admin --privilege access
//!   sitenav routes company.investors

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sitenav_kernel::menu::{ActiveRoute, RenderOptions};
use sitenav_kernel::{Config, Site, SiteConfig};

/// Role-gated navigation menus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Site file, TOML or YAML (overrides SITENAV_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the menu and breadcrumbs for one request as JSON.
    Render {
        /// Viewer role; unknown roles fall back to the default.
        #[arg(long)]
        role: Option<String>,

        /// Current route name.
        #[arg(long, conflicts_with = "path")]
        route: Option<String>,

        /// Request path, matched against the route table.
        #[arg(long)]
        path: Option<String>,

        /// Route parameter as name=value (repeatable, with --route).
        #[arg(long = "param", value_parser = parse_param, requires = "route")]
        params: Vec<(String, String)>,

        /// Deepest menu level to render (0 = top level only).
        #[arg(long)]
        max_depth: Option<usize>,

        /// Include pages marked invisible.
        #[arg(long)]
        show_hidden: bool,
    },

    /// Evaluate a single access control query.
    Check {
        #[arg(long)]
        role: String,

        #[arg(long)]
        resource: String,

        #[arg(long)]
        privilege: Option<String>,
    },

    /// List the route table, or show one route.
    Routes {
        /// Route name to look up.
        name: Option<String>,
    },

    /// List roles and the role each one inherits from.
    Roles,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(path) = args.config {
        config.site_config = path;
    }

    let site_config = SiteConfig::load(&config.site_config)?;
    let site = Site::from_config(&site_config)
        .with_context(|| format!("invalid site config {}", config.site_config.display()))?
        .with_session_key(config.session_key.clone());
    info!(path = %config.site_config.display(), "site loaded");

    match args.command {
        Command::Render {
            role,
            route,
            path,
            params,
            max_depth,
            show_hidden,
        } => {
            let current = match (route, path) {
                (Some(name), _) => params
                    .into_iter()
                    .fold(ActiveRoute::named(name), |r, (k, v)| r.with_param(k, v)),
                (None, Some(path)) => site.current_route(&path),
                (None, None) => ActiveRoute::unmatched(),
            };

            // The CLI has no persistent session; start from an empty one.
            let mut session: HashMap<String, String> = HashMap::new();
            let role = site.select_role(role.as_deref(), &mut session);

            let options = RenderOptions {
                max_depth,
                render_invisible: show_hidden,
            };
            let output = serde_json::json!({
                "route": current.name(),
                "access": site.authorize(&role, &current),
                "menu": site.render_with(&role, &current, options),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Check {
            role,
            resource,
            privilege,
        } => {
            let decision = site
                .acl()
                .evaluate(&role, &resource, privilege.as_deref())
                .context("access query failed")?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Command::Routes { name: Some(name) } => {
            let route = site
                .routes()
                .get(&name)
                .with_context(|| format!("unknown route '{name}'"))?;
            println!("{}", serde_json::to_string_pretty(route)?);
        }
        Command::Routes { name: None } => {
            if site.routes().is_empty() {
                bail!("no routes defined in {}", config.site_config.display());
            }
            println!("{:<32} PATH", "ROUTE");
            println!("{}", "-".repeat(60));
            for route in site.routes().all() {
                println!("{:<32} {}", route.name, route.path);
            }
        }
        Command::Roles => {
            let roles = site.acl().roles();
            println!("{:<16} INHERITS", "ROLE");
            println!("{}", "-".repeat(32));
            for role in roles.roles() {
                let parent = roles.parent_of(role)?.unwrap_or("-");
                println!("{role:<16} {parent}");
            }
        }
    }

    Ok(())
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn params_require_a_route_name() {
        let with_path = ["sitenav", "render", "--path", "/blog", "--param", "tag=go"];
        assert!(Args::try_parse_from(with_path).is_err());

        let with_route = ["sitenav", "render", "--route", "blog", "--param", "tag=go"];
        let args = Args::try_parse_from(with_route).unwrap();
        let Command::Render { route, params, .. } = args.command else {
            panic!("expected render");
        };
        assert_eq!(route.as_deref(), Some("blog"));
        assert_eq!(params, vec![("tag".to_string(), "go".to_string())]);
    }

    #[test]
    fn route_and_path_are_exclusive() {
        let both = ["sitenav", "render", "--route", "home", "--path", "/"];
        assert!(Args::try_parse_from(both).is_err());
    }

    #[test]
    fn routes_takes_an_optional_name() {
        let args = Args::try_parse_from(["sitenav", "routes", "admin"]).unwrap();
        assert!(matches!(args.command, Command::Routes { name: Some(n) } if n == "admin"));

        let args = Args::try_parse_from(["sitenav", "routes"]).unwrap();
        assert!(matches!(args.command, Command::Routes { name: None }));
    }

    #[test]
    fn param_parsing() {
        let (name, value) = parse_param("id=7").unwrap();
        assert_eq!((name.as_str(), value.as_str()), ("id", "7"));
        assert!(parse_param("=7").is_err());
        assert!(parse_param("id").is_err());
    }
}
