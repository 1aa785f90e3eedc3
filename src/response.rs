//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! The router passes a [`Response`] through the middleware entry points
//! untouched unless a handler or fallback replaces it. Handlers build one and
//! return it, or return anything that implements [`IntoResponse`].

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

/// An outgoing HTTP response.
///
/// ```rust
/// use http::StatusCode;
/// use switchyard::Response;
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// `200 OK` with no headers and an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// `200 OK` with `content-type: application/json`.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::typed("application/json", body.into())
    }

    /// `200 OK` with `content-type: text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::typed("text/plain; charset=utf-8", Bytes::from(body.into()))
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { status: code, ..Self::default() }
    }

    /// Returns a copy of this response with `code` as its status.
    pub fn with_status(self, code: StatusCode) -> Self {
        Self { status: code, ..self }
    }

    /// Returns a copy of this response with `name` set to `value`, replacing
    /// any previous values of that header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(self, body: impl Into<Bytes>) -> Self {
        Self { body: body.into(), ..self }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn typed(content_type: &'static str, body: Bytes) -> Self {
        Self::default()
            .with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
            .with_body(body)
    }
}

impl From<Response> for http::Response<Full<Bytes>> {
    fn from(res: Response) -> Self {
        let mut out = http::Response::new(Full::new(res.body));
        *out.status_mut() = res.status;
        *out.headers_mut() = res.headers;
        out
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into a [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a status directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sets_content_type() {
        let res = Response::text("hi");
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.body().as_ref(), b"hi");
    }

    #[test]
    fn with_status_keeps_headers_and_body() {
        let res = Response::json(b"{}".to_vec()).with_status(StatusCode::CREATED);
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.body().as_ref(), b"{}");
    }

    #[test]
    fn converts_into_http_response() {
        let res: http::Response<Full<Bytes>> = Response::status(StatusCode::NO_CONTENT)
            .with_header(HeaderName::from_static("x-trace"), HeaderValue::from_static("1"))
            .into();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(res.headers()["x-trace"], "1");
    }
}
