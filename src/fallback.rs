//! What the middleware entry points do with a resolution result.
//!
//! A matched request goes through [`RouteHandler::handle_route`]; the two
//! resolution failures go to their fallback. Implement [`RouteHandler`] to
//! wrap handler calls or to shape 404 / 405 responses; everything not
//! overridden behaves like [`DefaultRouteHandler`].

use http::header::{ALLOW, HeaderValue};
use http::{Method, StatusCode};

use crate::invoke::Invoke;
use crate::request::Request;
use crate::response::Response;

/// Route and fallback handling for one invocation flavour `I`.
///
/// `response` is the response the middleware entry point was called with.
pub trait RouteHandler<I: Invoke>: Send + Sync {
    /// Invokes the matched handler with the annotated request. The incoming
    /// response is dropped by default.
    fn handle_route(&self, request: Request, response: Response, handler: &I::Handler) -> I::Output {
        let _ = response;
        I::invoke(handler, request)
    }

    /// The path matched, the method did not. `allowed` is in matcher order.
    fn handle_method_not_allowed(
        &self,
        request: Request,
        response: Response,
        allowed: &[Method],
    ) -> I::Output {
        let _ = request;
        I::ready(method_not_allowed(response, allowed))
    }

    /// Nothing matched the path.
    fn handle_not_found(&self, request: Request, response: Response) -> I::Output {
        let _ = request;
        I::ready(response.with_status(StatusCode::NOT_FOUND))
    }
}

/// Calls the handler; answers `404` and `405` (with an `allow` header) on
/// the incoming response otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRouteHandler;

impl<I: Invoke> RouteHandler<I> for DefaultRouteHandler {}

fn method_not_allowed(response: Response, allowed: &[Method]) -> Response {
    let list = allowed.iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let response = response.with_status(StatusCode::METHOD_NOT_ALLOWED);

    // Method tokens are always valid header text.
    match HeaderValue::from_str(&list) {
        Ok(value) => response.with_header(ALLOW, value),
        Err(_) => response,
    }
}
