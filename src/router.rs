//! The routing facade.
//!
//! Build it once at startup from a [`RouteProvider`], wrap it in an `Arc`,
//! and dispatch from as many tasks or threads as you like. The compiled table
//! and the handler map are read-only after a build; the only way to change
//! them is [`Router::rebuild`], which needs `&mut self` and therefore cannot
//! race with dispatch.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{InvalidRouteOptions, RouteError, RouteMethodNotAllowed, RouteNotFound};
use crate::fallback::{DefaultRouteHandler, RouteHandler};
use crate::invoke::{Blocking, Eventual, Invoke};
use crate::matcher::{MatchOutcome, Matcher, TreeMatcher};
use crate::registry::RouteRegistry;
use crate::request::Request;
use crate::response::Response;
use crate::route::RouteProvider;

/// A router whose handlers return a [`Response`].
pub type SyncRouter<M = TreeMatcher> = Router<Blocking, M>;

/// A router whose handlers return a [`ResponseFuture`](crate::ResponseFuture).
pub type AsyncRouter<M = TreeMatcher> = Router<Eventual, M>;

/// Resolves requests to handlers and invokes them.
///
/// `I` is the invocation flavour ([`Blocking`] or [`Eventual`]), `M` the
/// path matcher.
pub struct Router<I: Invoke, M: Matcher = TreeMatcher> {
    provider: Arc<dyn RouteProvider<I::Handler>>,
    route_handler: Arc<dyn RouteHandler<I>>,
    matcher: M,
    registry: RouteRegistry<I::Handler, M::Table>,
}

/// Collects construction options for a [`Router`].
pub struct RouterBuilder<I: Invoke, M: Matcher = TreeMatcher> {
    provider: Arc<dyn RouteProvider<I::Handler>>,
    route_handler: Arc<dyn RouteHandler<I>>,
    matcher: M,
}

impl<I: Invoke> Router<I> {
    /// Starts a router over `provider` with the default matcher and
    /// [`DefaultRouteHandler`].
    pub fn builder(provider: impl RouteProvider<I::Handler> + 'static) -> RouterBuilder<I> {
        RouterBuilder {
            provider: Arc::new(provider),
            route_handler: Arc::new(DefaultRouteHandler),
            matcher: TreeMatcher,
        }
    }

    /// Shorthand for `Router::builder(provider).build()`.
    pub fn new(provider: impl RouteProvider<I::Handler> + 'static) -> Result<Self, InvalidRouteOptions> {
        Self::builder(provider).build()
    }
}

impl<I: Invoke, M: Matcher> RouterBuilder<I, M> {
    /// Replaces the route and fallback handling.
    pub fn route_handler(mut self, handler: impl RouteHandler<I> + 'static) -> Self {
        self.route_handler = Arc::new(handler);
        self
    }

    /// Replaces the path matcher.
    pub fn matcher<M2: Matcher>(self, matcher: M2) -> RouterBuilder<I, M2> {
        RouterBuilder {
            provider: self.provider,
            route_handler: self.route_handler,
            matcher,
        }
    }

    /// Enumerates the provider's routes and compiles them.
    pub fn build(self) -> Result<Router<I, M>, InvalidRouteOptions> {
        let registry = RouteRegistry::build(self.provider.as_ref(), &self.matcher)?;
        Ok(Router {
            provider: self.provider,
            route_handler: self.route_handler,
            matcher: self.matcher,
            registry,
        })
    }
}

impl<I: Invoke, M: Matcher> Router<I, M> {
    /// Re-enumerates the provider and recompiles from scratch.
    ///
    /// On error the previous routes stay in effect.
    pub fn rebuild(&mut self) -> Result<(), InvalidRouteOptions> {
        self.registry = RouteRegistry::build(self.provider.as_ref(), &self.matcher)?;
        Ok(())
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Finds the handler for the request's method and path.
    ///
    /// On success the request comes back annotated with the route name and
    /// path parameters. On failure it comes back inside the error.
    ///
    /// # Panics
    ///
    /// Panics if the matcher reports a route name the registry never saw,
    /// which means the matcher is broken.
    pub fn resolve(&self, request: Request) -> Result<(I::Handler, Request), RouteError> {
        let outcome = self.matcher.dispatch(self.registry.table(), request.method(), request.path());

        match outcome {
            MatchOutcome::Found { name, params } => {
                let Some(handler) = self.registry.handler(&name) else {
                    error!(route = %name, "matcher returned a route with no registered handler");
                    panic!("route `{name}` matched but has no registered handler");
                };
                debug!(method = %request.method(), path = request.path(), route = %name, "route found");
                Ok((handler.clone(), request.with_route(name, params)))
            }
            MatchOutcome::MethodNotAllowed { allowed } => {
                debug!(method = %request.method(), path = request.path(), ?allowed, "method not allowed");
                Err(RouteMethodNotAllowed::new(request, allowed).into())
            }
            MatchOutcome::NotFound => {
                debug!(method = %request.method(), path = request.path(), "route not found");
                Err(RouteNotFound::new(request).into())
            }
        }
    }

    /// Resolves and invokes the handler. Resolution failures are returned,
    /// not turned into responses; fallbacks are not consulted.
    pub fn handle_request(&self, request: Request) -> Result<I::Output, RouteError> {
        let (handler, request) = self.resolve(request)?;
        Ok(I::invoke(&handler, request))
    }

    /// Middleware entry point: always produces a response (or, for
    /// [`Eventual`], a future of one). The result of the handler or fallback
    /// is returned unmodified.
    pub fn dispatch(&self, request: Request, response: Response) -> I::Output {
        self.route(request, response, |_| ()).1
    }

    /// Like [`dispatch`](Self::dispatch), then hands the request and the
    /// produced response to `next` and returns what it returns.
    ///
    /// `next` sees the annotated request when a route matched, the original
    /// one otherwise. With [`Eventual`] it runs once the handler's future has
    /// resolved, and not at all if the handler rejects.
    pub fn dispatch_then<N>(&self, request: Request, response: Response, next: N) -> I::Output
    where
        N: FnOnce(Request, Response) -> Response + Send + 'static,
    {
        let (request, output) = self.route(request, response, Request::clone);
        I::then(output, request, next)
    }

    /// Resolution plus handler or fallback. `keep` sees the request that the
    /// handler or fallback is about to receive.
    fn route<K>(
        &self,
        request: Request,
        response: Response,
        keep: impl FnOnce(&Request) -> K,
    ) -> (K, I::Output) {
        match self.resolve(request) {
            Ok((handler, request)) => {
                let kept = keep(&request);
                (kept, self.route_handler.handle_route(request, response, &handler))
            }
            Err(RouteError::MethodNotAllowed(e)) => {
                let kept = keep(e.request());
                let (request, allowed) = e.into_parts();
                (kept, self.route_handler.handle_method_not_allowed(request, response, &allowed))
            }
            Err(RouteError::NotFound(e)) => {
                let kept = keep(e.request());
                (kept, self.route_handler.handle_not_found(e.into_request(), response))
            }
        }
    }
}
