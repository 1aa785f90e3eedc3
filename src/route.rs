//! Route definitions and the route table they come from.
//!
//! A route definition is an ordered list of options read back to front: the
//! last option is the handler, the one before it the path pattern, and every
//! option before that an HTTP method.
//!
//! ```text
//! ["GET", "HEAD", "/users/{id}", show_user]
//!  └─ methods ──┘ └── path ───┘ └ handler ┘
//! ```
//!
//! The handler is either a handler value or the name of one. Names are bound
//! against the [`RouteProvider`] that listed the route, once, when the router
//! is built.

use std::collections::HashMap;

use http::Method;

use crate::handler::Handler;

/// One element of a raw route definition.
#[derive(Clone, Debug)]
pub enum RouteOption<H> {
    /// A method, a path pattern, or (in last position) a handler name.
    Text(String),
    /// A handler value. Only valid in last position.
    Handler(H),
}

impl<H> RouteOption<H> {
    pub fn handler(handler: impl Handler<H>) -> Self {
        Self::Handler(handler.into_boxed_handler())
    }
}

impl<H> From<&str> for RouteOption<H> {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl<H> From<String> for RouteOption<H> {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<H> From<Method> for RouteOption<H> {
    fn from(m: Method) -> Self {
        Self::Text(m.as_str().to_owned())
    }
}

/// How a route refers to its handler.
#[derive(Clone, Debug)]
pub enum HandlerRef<H> {
    /// The handler itself.
    Direct(H),
    /// The name of a handler owned by the route provider.
    Named(String),
}

impl<H> HandlerRef<H> {
    pub fn direct(handler: impl Handler<H>) -> Self {
        Self::Direct(handler.into_boxed_handler())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl<H> From<HandlerRef<H>> for RouteOption<H> {
    fn from(handler: HandlerRef<H>) -> Self {
        match handler {
            HandlerRef::Direct(h) => Self::Handler(h),
            HandlerRef::Named(name) => Self::Text(name),
        }
    }
}

/// A raw route definition. Shape is validated when the router is built, not
/// here, so malformed definitions can be expressed and rejected with a proper
/// error naming the route.
#[derive(Clone, Debug)]
pub struct RouteDefinition<H> {
    options: Vec<RouteOption<H>>,
}

impl<H> RouteDefinition<H> {
    /// A well-formed definition: `methods..., path, handler`.
    pub fn new(
        methods: impl IntoIterator<Item = Method>,
        path: &str,
        handler: HandlerRef<H>,
    ) -> Self {
        let mut options: Vec<RouteOption<H>> = methods.into_iter().map(Into::into).collect();
        options.push(path.into());
        options.push(handler.into());
        Self { options }
    }

    pub fn from_options(options: Vec<RouteOption<H>>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[RouteOption<H>] {
        &self.options
    }

    pub(crate) fn into_options(self) -> Vec<RouteOption<H>> {
        self.options
    }
}

/// The owner of a route table.
///
/// `routes` is called exactly once per build. Its order is the registration
/// order: when two routes collide, the later one is reported.
pub trait RouteProvider<H>: Send + Sync {
    fn routes(&self) -> Vec<(String, RouteDefinition<H>)>;

    /// Looks up a handler the provider owns by name. Used to bind routes whose
    /// handler option is a name rather than a value.
    fn handler(&self, name: &str) -> Option<H> {
        let _ = name;
        None
    }
}

/// An in-memory route table together with the named handlers it refers to.
///
/// ```rust
/// use http::Method;
/// use switchyard::{BoxedHandler, HandlerRef, Request, RouteDefinition, Routes};
///
/// fn list_users(_req: Request) -> &'static str { "[]" }
///
/// let routes: Routes<BoxedHandler> = Routes::new()
///     .route("users", RouteDefinition::new([Method::GET], "/users", HandlerRef::named("list")))
///     .handler("list", list_users);
/// ```
#[derive(Clone, Debug)]
pub struct Routes<H> {
    routes: Vec<(String, RouteDefinition<H>)>,
    handlers: HashMap<String, H>,
}

impl<H> Routes<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new(), handlers: HashMap::new() }
    }

    /// Appends a route. Returns `self` for chaining.
    pub fn route(mut self, name: impl Into<String>, definition: RouteDefinition<H>) -> Self {
        self.routes.push((name.into(), definition));
        self
    }

    /// Registers a handler that routes can refer to by `name`.
    pub fn handler(mut self, name: impl Into<String>, handler: impl Handler<H>) -> Self {
        self.handlers.insert(name.into(), handler.into_boxed_handler());
        self
    }

    pub fn len(&self) -> usize { self.routes.len() }
    pub fn is_empty(&self) -> bool { self.routes.is_empty() }
}

impl<H> Default for Routes<H> {
    fn default() -> Self { Self::new() }
}

impl<H> RouteProvider<H> for Routes<H>
where
    H: Clone + Send + Sync,
{
    fn routes(&self) -> Vec<(String, RouteDefinition<H>)> {
        self.routes.clone()
    }

    fn handler(&self, name: &str) -> Option<H> {
        self.handlers.get(name).cloned()
    }
}
