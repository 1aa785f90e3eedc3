//! Invocation flavours.
//!
//! The router resolves and falls back the same way whether handlers answer
//! immediately or eventually. What differs is what a handler invocation
//! returns and how a continuation is chained onto it; [`Invoke`] captures
//! exactly that, and [`Router`](crate::Router) is generic over it.
//!
//! | Flavour      | Handler                | Output           | Continuation                  |
//! |--------------|------------------------|------------------|-------------------------------|
//! | [`Blocking`] | [`BoxedHandler`]       | [`Response`]     | called right away             |
//! | [`Eventual`] | [`BoxedAsyncHandler`]  | [`ResponseFuture`] | mapped onto the future      |

use futures_util::future::{self, FutureExt, TryFutureExt};

use crate::handler::{BoxedAsyncHandler, BoxedHandler, ResponseFuture};
use crate::request::Request;
use crate::response::Response;

/// How a resolved handler is invoked and how its result composes.
pub trait Invoke: 'static {
    /// Handler type stored in the registry.
    type Handler: Clone + Send + Sync + 'static;

    /// Result of a handler or fallback invocation.
    type Output;

    fn invoke(handler: &Self::Handler, request: Request) -> Self::Output;

    /// Lifts an already computed response into `Output`.
    fn ready(response: Response) -> Self::Output;

    /// Runs `next` once `output` is available and makes its return value the
    /// result.
    fn then<N>(output: Self::Output, request: Request, next: N) -> Self::Output
    where
        N: FnOnce(Request, Response) -> Response + Send + 'static;
}

/// Handlers return a [`Response`] directly.
#[derive(Clone, Copy, Debug)]
pub enum Blocking {}

impl Invoke for Blocking {
    type Handler = BoxedHandler;
    type Output = Response;

    fn invoke(handler: &BoxedHandler, request: Request) -> Response {
        handler.call(request)
    }

    fn ready(response: Response) -> Response {
        response
    }

    fn then<N>(output: Response, request: Request, next: N) -> Response
    where
        N: FnOnce(Request, Response) -> Response + Send + 'static,
    {
        next(request, output)
    }
}

/// Handlers return a [`ResponseFuture`].
#[derive(Clone, Copy, Debug)]
pub enum Eventual {}

impl Invoke for Eventual {
    type Handler = BoxedAsyncHandler;
    type Output = ResponseFuture;

    fn invoke(handler: &BoxedAsyncHandler, request: Request) -> ResponseFuture {
        handler.call(request)
    }

    fn ready(response: Response) -> ResponseFuture {
        future::ready(Ok(response)).boxed()
    }

    /// `next` runs after `output` resolves `Ok`, exactly once. A rejection
    /// skips it and passes through.
    fn then<N>(output: ResponseFuture, request: Request, next: N) -> ResponseFuture
    where
        N: FnOnce(Request, Response) -> Response + Send + 'static,
    {
        output.map_ok(move |response| next(request, response)).boxed()
    }
}
