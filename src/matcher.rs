//! Path matching.
//!
//! The router never matches paths itself. It feeds `(methods, path, name)`
//! triples to a [`RouteCollector`], keeps the table the collector produces,
//! and asks the [`Matcher`] for a [`MatchOutcome`] per request.
//!
//! [`TreeMatcher`] is the default: one [`matchit`] radix tree per HTTP method,
//! O(path-length) lookup.

use std::collections::HashSet;

use http::Method;
use matchit::Router as MatchitRouter;
use thiserror::Error;

use crate::request::Params;

/// Result of matching one method + path against a compiled table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchOutcome {
    Found { name: String, params: Params },
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

/// A pattern the matcher refused to register.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("cannot register two routes matching {path:?} for method \"{method}\"")]
    Duplicate { method: Method, path: String },

    #[error("cannot register {path:?}: {reason}")]
    Rejected { path: String, reason: String },
}

/// Accumulates routes into a compiled table.
pub trait RouteCollector {
    type Table;

    fn add_route(&mut self, methods: &[Method], path: &str, name: &str) -> Result<(), PatternError>;

    fn finish(self) -> Self::Table;
}

/// A route-matching engine.
///
/// `collector` is called once per build; the table it produces is owned by
/// the router and only ever handed back to `dispatch` by shared reference.
pub trait Matcher: Send + Sync + 'static {
    type Table: Send + Sync + 'static;
    type Collector: RouteCollector<Table = Self::Table>;

    fn collector(&self) -> Self::Collector;

    fn dispatch(&self, table: &Self::Table, method: &Method, path: &str) -> MatchOutcome;
}

// ── Default matcher ───────────────────────────────────────────────────────────

/// One radix tree per HTTP method.
///
/// Path parameters use `{name}` syntax, catch-alls `{*name}`. A `HEAD` request
/// with no `HEAD` route for its path is answered by the `GET` route.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeMatcher;

/// Compiled table of a [`TreeMatcher`]. Trees are kept in the order their
/// method was first registered, which is the order allowed methods are
/// reported in.
pub struct TreeTable {
    trees: Vec<(Method, MatchitRouter<String>)>,
}

impl TreeTable {
    fn tree(&self, method: &Method) -> Option<&MatchitRouter<String>> {
        self.trees.iter()
            .find(|(m, _)| m == method)
            .map(|(_, tree)| tree)
    }

    fn find(&self, method: &Method, path: &str) -> Option<MatchOutcome> {
        let matched = self.tree(method)?.at(path).ok()?;
        let params = matched.params.iter().collect();
        Some(MatchOutcome::Found { name: matched.value.clone(), params })
    }

    /// Methods with at least one route, in first-registration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.trees.iter().map(|(m, _)| m)
    }
}

#[derive(Default)]
pub struct TreeCollector {
    trees: Vec<(Method, MatchitRouter<String>)>,
    seen: HashSet<(Method, String)>,
}

impl RouteCollector for TreeCollector {
    type Table = TreeTable;

    fn add_route(&mut self, methods: &[Method], path: &str, name: &str) -> Result<(), PatternError> {
        for method in methods {
            if !self.seen.insert((method.clone(), path.to_owned())) {
                return Err(PatternError::Duplicate { method: method.clone(), path: path.to_owned() });
            }

            let i = match self.trees.iter().position(|(m, _)| m == method) {
                Some(i) => i,
                None => {
                    self.trees.push((method.clone(), MatchitRouter::new()));
                    self.trees.len() - 1
                }
            };

            self.trees[i].1.insert(path, name.to_owned())
                .map_err(|e| PatternError::Rejected { path: path.to_owned(), reason: e.to_string() })?;
        }
        Ok(())
    }

    fn finish(self) -> TreeTable {
        TreeTable { trees: self.trees }
    }
}

impl Matcher for TreeMatcher {
    type Table = TreeTable;
    type Collector = TreeCollector;

    fn collector(&self) -> TreeCollector {
        TreeCollector::default()
    }

    fn dispatch(&self, table: &TreeTable, method: &Method, path: &str) -> MatchOutcome {
        if let Some(found) = table.find(method, path) {
            return found;
        }
        if method == Method::HEAD {
            if let Some(found) = table.find(&Method::GET, path) {
                return found;
            }
        }

        let allowed: Vec<Method> = table.trees.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();

        if allowed.is_empty() {
            MatchOutcome::NotFound
        } else {
            MatchOutcome::MethodNotAllowed { allowed }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(routes: &[(&[Method], &str, &str)]) -> TreeTable {
        let mut collector = TreeMatcher.collector();
        for (methods, path, name) in routes {
            collector.add_route(methods, path, name).unwrap();
        }
        collector.finish()
    }

    #[test]
    fn found_carries_name_and_params_in_order() {
        let t = table(&[(&[Method::GET], "/users/{id}/posts/{post}", "post")]);
        let outcome = TreeMatcher.dispatch(&t, &Method::GET, "/users/7/posts/3");
        assert_eq!(
            outcome,
            MatchOutcome::Found {
                name: "post".to_owned(),
                params: [("id", "7"), ("post", "3")].into_iter().collect(),
            },
        );
    }

    #[test]
    fn allowed_methods_follow_first_registration_order() {
        let t = table(&[
            (&[Method::PUT, Method::POST], "/", "bar"),
            (&[Method::GET], "/", "foo"),
            (&[Method::DELETE], "/other", "baz"),
        ]);
        let outcome = TreeMatcher.dispatch(&t, &Method::PATCH, "/");
        assert_eq!(
            outcome,
            MatchOutcome::MethodNotAllowed { allowed: vec![Method::PUT, Method::POST, Method::GET] },
        );
        assert_eq!(t.methods().count(), 4);
    }

    #[test]
    fn unknown_path_is_not_found() {
        let t = table(&[(&[Method::GET], "/", "foo")]);
        assert_eq!(TreeMatcher.dispatch(&t, &Method::GET, "/missing"), MatchOutcome::NotFound);
    }

    #[test]
    fn head_falls_back_to_get() {
        let t = table(&[(&[Method::GET], "/", "foo")]);
        let outcome = TreeMatcher.dispatch(&t, &Method::HEAD, "/");
        assert!(matches!(outcome, MatchOutcome::Found { name, .. } if name == "foo"));
    }

    #[test]
    fn explicit_head_route_wins_over_get() {
        let t = table(&[(&[Method::GET], "/", "get"), (&[Method::HEAD], "/", "head")]);
        let outcome = TreeMatcher.dispatch(&t, &Method::HEAD, "/");
        assert!(matches!(outcome, MatchOutcome::Found { name, .. } if name == "head"));
    }

    #[test]
    fn duplicate_method_and_path_is_rejected() {
        let mut collector = TreeMatcher.collector();
        collector.add_route(&[Method::GET], "/", "foo").unwrap();
        let err = collector.add_route(&[Method::POST, Method::GET], "/", "bar").unwrap_err();
        assert!(matches!(err, PatternError::Duplicate { ref method, ref path } if *method == Method::GET && path == "/"));
    }

    #[test]
    fn conflicting_parameters_are_rejected() {
        let mut collector = TreeMatcher.collector();
        collector.add_route(&[Method::GET], "/users/{id}", "a").unwrap();
        let err = collector.add_route(&[Method::GET], "/users/{name}", "b").unwrap_err();
        assert!(matches!(err, PatternError::Rejected { .. }));
    }

    #[test]
    fn same_path_different_methods_is_fine() {
        let mut collector = TreeMatcher.collector();
        collector.add_route(&[Method::GET], "/users/{id}", "show").unwrap();
        collector.add_route(&[Method::DELETE], "/users/{id}", "delete").unwrap();
    }
}
