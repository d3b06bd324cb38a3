//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::locals::Locals;

/// An incoming HTTP request with its body already collected.
///
/// Besides the usual method, path, headers and body, each request carries
/// [`Locals`]: a store that middleware fills in and handlers read from.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) locals: Locals,
}

impl Request {
    /// Builds a request from an `http::Request` whose body is already in
    /// memory. Route parameters are filled in by the router.
    ///
    /// ```rust
    /// use bytes::Bytes;
    /// use tsu_validator::Request;
    ///
    /// let req = Request::from_http(
    ///     http::Request::post("/users").body(Bytes::from_static(b"{}")).unwrap(),
    /// );
    /// assert_eq!(req.path(), "/users");
    /// ```
    pub fn from_http(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers: parts.headers,
            body,
            params: HashMap::new(),
            locals: Locals::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup. `HeaderMap` keys are case-insensitive; values that are
    /// not visible ASCII are treated as missing.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Values stored by middleware for this request.
    pub fn locals(&self) -> &Locals { &self.locals }

    pub fn locals_mut(&mut self) -> &mut Locals { &mut self.locals }
}
