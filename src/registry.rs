//! Turns a route table into a compiled matcher table plus a name → handler map.

use std::collections::HashMap;

use http::Method;
use tracing::{debug, info};

use crate::error::{InvalidRouteOptions, RouteOptionsError};
use crate::matcher::{Matcher, RouteCollector};
use crate::route::{RouteOption, RouteProvider};

/// Everything a build produces. Read-only once built; a rebuild makes a new
/// one.
pub(crate) struct RouteRegistry<H, T> {
    handlers: HashMap<String, H>,
    table: T,
}

impl<H, T> RouteRegistry<H, T> {
    pub(crate) fn handler(&self, name: &str) -> Option<&H> {
        self.handlers.get(name)
    }

    pub(crate) fn table(&self) -> &T {
        &self.table
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Enumerates `provider` once and registers every route with a fresh
    /// collector from `matcher`. Stops at the first invalid route.
    pub(crate) fn build<M>(
        provider: &dyn RouteProvider<H>,
        matcher: &M,
    ) -> Result<Self, InvalidRouteOptions>
    where
        M: Matcher<Table = T>,
    {
        let mut collector = matcher.collector();
        let mut handlers = HashMap::new();

        for (name, definition) in provider.routes() {
            if handlers.contains_key(&name) {
                return Err(InvalidRouteOptions::new(name, RouteOptionsError::DuplicateName));
            }

            let mut options = definition.into_options();
            let found = options.len();
            let (Some(handler), Some(path)) = (options.pop(), options.pop()) else {
                return Err(InvalidRouteOptions::new(name, RouteOptionsError::TooFewOptions(found)));
            };
            if options.is_empty() {
                return Err(InvalidRouteOptions::new(name, RouteOptionsError::TooFewOptions(found)));
            }

            // Names bind now, not per request.
            let handler = match handler {
                RouteOption::Handler(h) => h,
                RouteOption::Text(symbol) => match provider.handler(&symbol) {
                    Some(h) => h,
                    None => {
                        return Err(InvalidRouteOptions::new(
                            name,
                            RouteOptionsError::UnknownHandler(symbol),
                        ));
                    }
                },
            };

            let RouteOption::Text(path) = path else {
                return Err(InvalidRouteOptions::new(name, RouteOptionsError::PathNotText));
            };

            let methods = match parse_methods(options) {
                Ok(methods) => methods,
                Err(reason) => return Err(InvalidRouteOptions::new(name, reason)),
            };

            if let Err(e) = collector.add_route(&methods, &path, &name) {
                return Err(InvalidRouteOptions::new(name, e.into()));
            }

            debug!(route = %name, path = %path, methods = ?methods, "route registered");
            handlers.insert(name, handler);
        }

        info!(routes = handlers.len(), "routes built");
        Ok(Self { handlers, table: collector.finish() })
    }
}

fn parse_methods<H>(options: Vec<RouteOption<H>>) -> Result<Vec<Method>, RouteOptionsError> {
    options.into_iter()
        .enumerate()
        .map(|(i, option)| match option {
            RouteOption::Text(s) => {
                Method::from_bytes(s.as_bytes()).map_err(|_| RouteOptionsError::InvalidMethod(s))
            }
            RouteOption::Handler(_) => Err(RouteOptionsError::MisplacedHandler(i)),
        })
        .collect()
}
