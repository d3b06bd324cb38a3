//! Middleware layer.
//!
//! Middleware sits between the server and the matched route handler. Each
//! piece receives the [`Request`] and a [`Next`] continuation, may touch the
//! request (typically its [`Locals`](crate::Locals)), and either hands it on
//! with [`Next::run`] or answers on its own by returning a response without
//! calling `next`.
//!
//! ```rust,no_run
//! use tsu_validator::middleware::{self, Next};
//! use tsu_validator::{Request, Response, Router};
//!
//! async fn log_path(req: Request, next: Next) -> Response {
//!     tracing::info!(path = req.path(), "request");
//!     next.run(req).await
//! }
//!
//! # async fn hello(_: Request) -> Response { Response::text("hi") }
//! let app = Router::new()
//!     .layer(middleware::from_fn(log_path))
//!     .get("/", hello);
//! ```
//!
//! Built-in middleware:
//! - [`ValidatorMiddleware`] stores the shared validation engine in every
//!   request.

mod validator;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub use validator::{
    Config, DEFAULT_CONTEXT_KEY, EngineCell, SkipFn, ValidatorMiddleware, get_validator,
    get_validator_with_key,
};

/// A stage in the request pipeline.
///
/// Implement it on a struct when the middleware carries configuration, or
/// wrap an `async fn(Request, Next) -> impl IntoResponse` with [`from_fn`].
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The rest of the pipeline: remaining middleware, then the endpoint.
pub struct Next {
    chain: Arc<[BoxedMiddleware]>,
    index: usize,
    endpoint: BoxedHandler,
}

impl Next {
    pub(crate) fn new(chain: Arc<[BoxedMiddleware]>, endpoint: BoxedHandler) -> Self {
        Self { chain, index: 0, endpoint }
    }

    /// Passes `req` to the next middleware, or to the endpoint once the
    /// chain is exhausted.
    pub fn run(self, req: Request) -> BoxFuture {
        let current = self.chain.get(self.index).cloned();
        match current {
            Some(middleware) => {
                let next = Self { chain: self.chain, index: self.index + 1, endpoint: self.endpoint };
                middleware.call(req, next)
            }
            None => self.endpoint.call(req),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &(self.chain.len() - self.index))
            .finish()
    }
}

/// Turns an async function into [`Middleware`].
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FromFn(f)
}

/// Middleware built by [`from_fn`].
pub struct FromFn<F>(F);

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self.0)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Endpoint used when no route matches, so middleware still runs for 404s.
pub(crate) async fn not_found(_req: Request) -> Response {
    Response::status(http::StatusCode::NOT_FOUND)
}
