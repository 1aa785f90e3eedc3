//! Route tables loaded from TOML.
//!
//! ```toml
//! [[routes]]
//! name = "list_users"
//! options = ["GET", "/users", "users.list"]
//!
//! [[routes]]
//! name = "show_user"
//! options = ["GET", "HEAD", "/users/{id}", "users.show"]
//! ```
//!
//! Every option is text, so the last one always names a handler. Register the
//! handlers on the [`Routes`] that [`RouteConfig::into_routes`] returns:
//!
//! ```rust
//! use switchyard::{BoxedHandler, Request, RouteConfig};
//!
//! fn list(_req: Request) -> &'static str { "[]" }
//!
//! let config: RouteConfig = r#"
//!     [[routes]]
//!     name = "list_users"
//!     options = ["GET", "/users", "users.list"]
//! "#.parse()?;
//!
//! let routes = config.into_routes::<BoxedHandler>().handler("users.list", list);
//! assert_eq!(routes.len(), 1);
//! # Ok::<(), switchyard::ConfigError>(())
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::route::{RouteDefinition, RouteOption, Routes};

/// A route table as written in a config file. Order is file order.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// One `[[routes]]` block.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    /// Unique route name.
    pub name: String,
    /// `methods..., path, handler name`.
    pub options: Vec<String>,
}

impl RouteConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), routes = config.routes.len(), "route config loaded");
        Ok(config)
    }

    /// Converts every entry into a route whose handler is referred to by
    /// name. Shape is checked when the router is built.
    pub fn into_routes<H>(self) -> Routes<H> {
        self.routes.into_iter().fold(Routes::new(), |routes, entry| {
            let options = entry.options.into_iter().map(RouteOption::Text).collect();
            routes.route(entry.name, RouteDefinition::from_options(options))
        })
    }
}

impl FromStr for RouteConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml(s)
    }
}
