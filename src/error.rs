//! Error types.
//!
//! Build-time problems ([`InvalidRouteOptions`]) are fatal to the build call
//! that hit them. Dispatch-time problems ([`RouteError`]) are recoverable: the
//! direct entry point returns them, the middleware entry points turn them into
//! fallback responses. Both dispatch errors give the request back.

use std::fmt;

use http::Method;
use thiserror::Error;

use crate::matcher::PatternError;
use crate::request::Request;

// ── Build time ────────────────────────────────────────────────────────────────

/// A route definition the router could not register.
#[derive(Debug)]
pub struct InvalidRouteOptions {
    route: String,
    reason: RouteOptionsError,
}

impl InvalidRouteOptions {
    pub(crate) fn new(route: impl Into<String>, reason: RouteOptionsError) -> Self {
        Self { route: route.into(), reason }
    }

    /// Name of the offending route.
    pub fn route(&self) -> &str { &self.route }

    pub fn reason(&self) -> &RouteOptionsError { &self.reason }
}

impl fmt::Display for InvalidRouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            RouteOptionsError::Pattern(e) => write!(f, "error for route \"{}\": {e}", self.route),
            _ => write!(f, "invalid options specified for route \"{}\"", self.route),
        }
    }
}

impl std::error::Error for InvalidRouteOptions {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

/// Why a route definition was rejected.
#[derive(Debug, Error)]
pub enum RouteOptionsError {
    #[error("expected at least one method, a path and a handler, found {0} options")]
    TooFewOptions(usize),

    #[error("path pattern must be text")]
    PathNotText,

    #[error("handler given at position {0}, only the last option may be a handler")]
    MisplacedHandler(usize),

    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    #[error("route provider has no handler named {0:?}")]
    UnknownHandler(String),

    #[error("route name is already registered")]
    DuplicateName,

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

// ── Dispatch time ─────────────────────────────────────────────────────────────

/// No registered path pattern matches the request path.
#[derive(Debug, Error)]
#[error("no route matches {} {}", .request.method(), .request.path())]
pub struct RouteNotFound {
    request: Request,
}

impl RouteNotFound {
    pub(crate) fn new(request: Request) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &Request { &self.request }
    pub fn into_request(self) -> Request { self.request }
}

/// The path matches a route, but not for the request method.
#[derive(Debug, Error)]
#[error("method {} not allowed for {}", .request.method(), .request.path())]
pub struct RouteMethodNotAllowed {
    request: Request,
    allowed: Vec<Method>,
}

impl RouteMethodNotAllowed {
    pub(crate) fn new(request: Request, allowed: Vec<Method>) -> Self {
        Self { request, allowed }
    }

    pub fn request(&self) -> &Request { &self.request }

    /// Methods the path is registered for, in the order the matcher reported.
    pub fn allowed_methods(&self) -> &[Method] { &self.allowed }

    pub fn into_parts(self) -> (Request, Vec<Method>) {
        (self.request, self.allowed)
    }
}

/// A request the router could not resolve to a handler.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    NotFound(#[from] RouteNotFound),

    #[error(transparent)]
    MethodNotAllowed(#[from] RouteMethodNotAllowed),
}

impl RouteError {
    pub fn request(&self) -> &Request {
        match self {
            Self::NotFound(e) => e.request(),
            Self::MethodNotAllowed(e) => e.request(),
        }
    }

    pub fn into_request(self) -> Request {
        match self {
            Self::NotFound(e) => e.into_request(),
            Self::MethodNotAllowed(e) => e.request,
        }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Failure to load a route configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read route config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse route config: {0}")]
    Parse(#[from] toml::de::Error),
}
