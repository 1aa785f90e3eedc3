//! # switchyard
//!
//! Route resolution and dispatch in front of a path matcher.
//!
//! ## The contract
//!
//! switchyard does one thing: given a request's method and path, find the
//! handler registered for them and call it. When nothing matches it says
//! exactly why: the path is unknown ([`RouteNotFound`]), or the path is known
//! but not for that method ([`RouteMethodNotAllowed`], with the methods that
//! would have worked).
//!
//! What it leaves to others:
//!
//! - **Path matching**: [`matchit`] radix trees by default, or any [`Matcher`]
//! - **Connections and HTTP framing**: convert from `http::Request` and into
//!   `http::Response` at the edge
//! - **Handler bodies**: opaque callables
//!
//! ## Two flavours, one algorithm
//!
//! [`SyncRouter`] handlers return a [`Response`]. [`AsyncRouter`] handlers
//! return a future of `Result<Response, _>`. Both resolve and fall back
//! identically; only invocation differs (see [`Invoke`]).
//!
//! Each router has two ways in:
//!
//! - [`Router::handle_request`]: resolve and call, or return the
//!   [`RouteError`].
//! - [`Router::dispatch`] / [`Router::dispatch_then`]: middleware style. A
//!   resolution failure goes to the configured [`RouteHandler`] fallback, so a
//!   response always comes out, optionally passed on to a `next` step.
//!
//! ## Quick start
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use switchyard::{
//!     BoxedHandler, HandlerRef, Request, Response, RouteDefinition, Routes, SyncRouter,
//! };
//!
//! fn show_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//!
//! let routes: Routes<BoxedHandler> = Routes::new().route(
//!     "show_user",
//!     RouteDefinition::new([Method::GET], "/users/{id}", HandlerRef::direct(show_user)),
//! );
//! let router = SyncRouter::new(routes)?;
//!
//! let res = router.dispatch(Request::new(Method::GET, "/users/42"), Response::new());
//! assert_eq!(res.body().as_ref(), br#"{"id":"42"}"#);
//!
//! let res = router.dispatch(Request::new(Method::POST, "/users/42"), Response::new());
//! assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
//! # Ok::<(), switchyard::InvalidRouteOptions>(())
//! ```

mod config;
mod error;
mod fallback;
mod handler;
mod invoke;
mod matcher;
mod registry;
mod request;
mod response;
mod route;
mod router;

pub use config::{RouteConfig, RouteEntry};
pub use error::{
    ConfigError, InvalidRouteOptions, RouteError, RouteMethodNotAllowed, RouteNotFound,
    RouteOptionsError,
};
pub use fallback::{DefaultRouteHandler, RouteHandler};
pub use handler::{
    BoxError, BoxedAsyncHandler, BoxedHandler, ErasedAsyncHandler, ErasedHandler, Handler,
    ResponseFuture,
};
pub use invoke::{Blocking, Eventual, Invoke};
pub use matcher::{
    MatchOutcome, Matcher, PatternError, RouteCollector, TreeCollector, TreeMatcher, TreeTable,
};
pub use request::{Params, Request};
pub use response::{IntoResponse, Response};
pub use route::{HandlerRef, RouteDefinition, RouteOption, RouteProvider, Routes};
pub use router::{AsyncRouter, Router, RouterBuilder, SyncRouter};
