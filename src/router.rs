//! Radix-tree request router with a middleware chain.
//!
//! One tree per HTTP method. O(path-length) lookup. Middleware registered
//! with [`Router::layer`] wraps every request, matched or not.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{self, BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    middleware: Vec<BoxedMiddleware>,
    chain: Arc<[BoxedMiddleware]>,
    not_found: BoxedHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            middleware: Vec::new(),
            chain: Arc::from(Vec::new()),
            not_found: middleware::not_found.into_boxed_handler(),
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use http::Method;
    /// # use tsu_validator::{Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET,  "/users/{id}", get_user)
    ///     .on(Method::POST, "/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Appends `middleware` to the chain. The first layer added is the first
    /// to see each request.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self.chain = Arc::from(self.middleware.clone());
        self
    }

    /// Runs one request through the middleware chain and the matched route
    /// (or a `404` endpoint when nothing matches).
    pub async fn handle(&self, mut req: Request) -> Response {
        let endpoint = match self.lookup(&req.method, &req.path) {
            Some((handler, params)) => {
                req.params = params;
                handler
            }
            None => Arc::clone(&self.not_found),
        };

        Next::new(Arc::clone(&self.chain), endpoint).run(req).await
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;

    fn request(method: Method, path: &str) -> Request {
        Request::from_http(
            http::Request::builder().method(method).uri(path).body(Bytes::new()).unwrap(),
        )
    }

    async fn echo_id(req: Request) -> Response {
        Response::text(req.param("id").unwrap_or("none").to_owned())
    }

    #[tokio::test]
    async fn routes_by_method_and_path() {
        let app = Router::new().get("/users/{id}", echo_id);

        let res = app.handle(request(Method::GET, "/users/42")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"42");

        let res = app.handle(request(Method::POST, "/users/42")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn middleware_runs_in_order_and_sees_404s() {
        async fn tag_a(mut req: Request, next: Next) -> Response {
            req.locals_mut().insert("order", Arc::new(String::from("a")));
            next.run(req).await
        }

        async fn tag_b(mut req: Request, next: Next) -> Response {
            let seen = req.locals().get::<String>("order").map(|s| s.to_string()).unwrap_or_default();
            req.locals_mut().insert("order", Arc::new(format!("{seen}b")));
            next.run(req).await
        }

        async fn order(req: Request) -> Response {
            Response::text(req.locals().get::<String>("order").map(|s| s.to_string()).unwrap_or_default())
        }

        async fn short_circuit(req: Request, next: Next) -> Response {
            if req.path() == "/blocked" {
                return Response::status(StatusCode::FORBIDDEN);
            }
            next.run(req).await
        }

        let app = Router::new()
            .layer(middleware::from_fn(tag_a))
            .layer(middleware::from_fn(tag_b))
            .layer(middleware::from_fn(short_circuit))
            .get("/order", order)
            .get("/blocked", order);

        let res = app.handle(request(Method::GET, "/order")).await;
        assert_eq!(res.body(), b"ab");

        let res = app.handle(request(Method::GET, "/blocked")).await;
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

        let res = app.handle(request(Method::GET, "/missing")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }
}
