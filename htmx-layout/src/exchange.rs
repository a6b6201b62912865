//! Request/response boundary used by the renderer.
//!
//! The renderer never touches a framework type directly. It reads one request
//! header, sets the status and content type, and writes the body through the
//! [`Exchange`] trait. [`ResponseExchange`] is the axum adapter.

use std::io;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Request header set by HTMX on every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// Media type written for fragment responses.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Check if a header map marks the request as an HTMX fragment request.
///
/// The header must be present with a non-empty value.
#[must_use]
pub fn is_fragment_request(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| !value.as_bytes().is_empty())
}

/// One request/response pair as seen by the renderer.
pub trait Exchange {
    /// Read a request header. Names are matched case-insensitively.
    fn request_header(&self, name: &str) -> Option<&str>;

    /// Whether the request carries `name` with a non-empty value.
    fn has_request_header(&self, name: &str) -> bool {
        self.request_header(name).is_some_and(|v| !v.is_empty())
    }

    /// Whether the caller only wants the inner content.
    fn is_fragment_request(&self) -> bool {
        self.has_request_header(HX_REQUEST)
    }

    /// Set the response status.
    fn set_status(&mut self, status: StatusCode);

    /// Set a response header, replacing any previous value.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Sink for the response body.
    fn body(&mut self) -> &mut dyn io::Write;
}

/// [`Exchange`] backed by an axum request's headers, collecting the response
/// in memory until it is turned into a [`Response`].
///
/// # Example
///
/// ```rust,ignore
/// async fn about(State(renderer): State<HtmxRenderer>, headers: HeaderMap) -> Response {
///     let mut exchange = ResponseExchange::new(&headers);
///     let mut model = Model::new();
///     match renderer.render_default(&mut exchange, &mut model, &["about"]) {
///         Ok(()) => exchange.into_response(),
///         Err(err) => err.into_response(),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct ResponseExchange<'a> {
    request_headers: &'a HeaderMap,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl<'a> ResponseExchange<'a> {
    /// Create an exchange for a request with the given headers.
    #[must_use]
    pub fn new(request_headers: &'a HeaderMap) -> Self {
        Self {
            request_headers,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Status set so far.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers set so far.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes written so far.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }
}

impl Exchange for ResponseExchange<'_> {
    fn request_header(&self, name: &str) -> Option<&str> {
        self.request_headers.get(name).and_then(|v| v.to_str().ok())
    }

    // Header values that are not visible ASCII still count as present.
    fn has_request_header(&self, name: &str) -> bool {
        self.request_headers
            .get(name)
            .is_some_and(|v| !v.as_bytes().is_empty())
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn body(&mut self) -> &mut dyn io::Write {
        &mut self.body
    }
}

impl IntoResponse for ResponseExchange<'_> {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;

        response
            .headers_mut()
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(HTML_CONTENT_TYPE));

        response
    }
}
