//! Handler traits and type erasure.
//!
//! # How handlers are stored
//!
//! The registry holds handlers of *different* concrete types in a single
//! `HashMap<String, _>`. Each closure or `fn` item is wrapped and stored as a
//! trait object behind an `Arc`, so every route shares one uniform handler
//! type per invocation flavour:
//!
//! ```text
//! fn show(req: Request) -> Response { … }           ← blocking
//! async fn show(req: Request) -> Result<Response, E> ← eventual
//!        ↓ HandlerRef::direct(show)
//! show.into_boxed_handler()                           ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(show))   /   Arc::new(AsyncFnHandler(show))
//!        ↓  stored as BoxedHandler / BoxedAsyncHandler
//! handler.call(req)  at request time                  ← one vtable dispatch
//! ```
//!
//! The marker type parameter on [`Handler`] picks the flavour: a function
//! returning `impl IntoResponse` becomes a [`BoxedHandler`], a function
//! returning a future of `Result<impl IntoResponse, E>` becomes a
//! [`BoxedAsyncHandler`].

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Error an asynchronous handler rejects with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The eventual response of an asynchronous handler or fallback.
///
/// Resolves exactly once: `Ok` with the response, or `Err` if the handler
/// rejected.
pub type ResponseFuture = BoxFuture<'static, Result<Response, BoxError>>;

// ── Erased interfaces ─────────────────────────────────────────────────────────

/// Internal dispatch interface for blocking handlers.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// public `BoxedHandler` alias.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> Response;
}

/// Internal dispatch interface for asynchronous handlers.
#[doc(hidden)]
pub trait ErasedAsyncHandler {
    fn call(&self, req: Request) -> ResponseFuture;
}

/// A type-erased blocking handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// A type-erased asynchronous handler shared across concurrent requests.
pub type BoxedAsyncHandler = Arc<dyn ErasedAsyncHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler of flavour `H`.
///
/// You never implement this yourself. It is automatically satisfied for
///
/// ```text
/// fn name(req: Request) -> impl IntoResponse                              (H = BoxedHandler)
/// async fn name(req: Request) -> Result<impl IntoResponse, impl Into<BoxError>>  (H = BoxedAsyncHandler)
/// ```
///
/// The trait is **sealed**: only the blanket impls below can satisfy it.
pub trait Handler<H>: private::Sealed<H> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> H;
}

mod private {
    pub trait Sealed<H> {}
}

// ── Blocking ──────────────────────────────────────────────────────────────────

impl<F, R> private::Sealed<BoxedHandler> for F
where
    F: Fn(Request) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
}

impl<F, R> Handler<BoxedHandler> for F
where
    F: Fn(Request) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete blocking handler `F` to [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> R + Send + Sync,
    R: IntoResponse,
{
    fn call(&self, req: Request) -> Response {
        (self.0)(req).into_response()
    }
}

// ── Eventual ──────────────────────────────────────────────────────────────────

impl<F, Fut, R, E> private::Sealed<BoxedAsyncHandler> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
}

impl<F, Fut, R, E> Handler<BoxedAsyncHandler> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedAsyncHandler {
        Arc::new(AsyncFnHandler(self))
    }
}

/// Bridges a concrete asynchronous handler `F` to [`ErasedAsyncHandler`].
struct AsyncFnHandler<F>(F);

impl<F, Fut, R, E> ErasedAsyncHandler for AsyncFnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn call(&self, req: Request) -> ResponseFuture {
        // Calling the function only builds the future; nothing runs until it
        // is polled.
        let fut = (self.0)(req);
        Box::pin(async move {
            fut.await
                .map(IntoResponse::into_response)
                .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use super::*;

    fn echo_path(req: Request) -> String {
        req.path().to_owned()
    }

    async fn teapot(_req: Request) -> Result<StatusCode, BoxError> {
        Ok(StatusCode::IM_A_TEAPOT)
    }

    #[test]
    fn blocking_handler_converts_return_value() {
        let handler: BoxedHandler = echo_path.into_boxed_handler();
        let res = handler.call(Request::new(Method::GET, "/echo"));
        assert_eq!(res.body().as_ref(), b"/echo");
    }

    #[tokio::test]
    async fn async_handler_resolves_to_response() {
        let handler: BoxedAsyncHandler = teapot.into_boxed_handler();
        let res = handler.call(Request::new(Method::GET, "/")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn async_handler_rejection_is_boxed() {
        let handler: BoxedAsyncHandler =
            (|_req: Request| async { Err::<Response, _>(std::io::Error::other("boom")) })
                .into_boxed_handler();
        let err = handler.call(Request::new(Method::GET, "/")).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
