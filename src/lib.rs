//! # tsu-validator
//!
//! One shared struct-validation engine, injected into every request.
//!
//! [`ValidatorMiddleware`](middleware::ValidatorMiddleware) builds a single
//! [`Validator`] (the first configuration wins) and stores it in each
//! request's [`Locals`]. Handlers pick it up with
//! [`get_validator`](middleware::get_validator), or let
//! [`validate_struct`](helpers::validate_struct) run it and turn violations
//! into readable messages.
//!
//! The crate carries the minimal pipeline the middleware plugs into:
//!
//! - Radix-tree routing via [`matchit`], with a middleware chain
//! - Request-scoped locals
//! - hyper server (HTTP/1.1 and HTTP/2) with graceful shutdown
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tsu_validator::helpers::{ValidationFailure, validate_struct};
//! use tsu_validator::middleware::{Config, ValidatorMiddleware};
//! use tsu_validator::validation::{Field, Validate};
//! use tsu_validator::{IntoResponse, Request, Response, Router, Server};
//!
//! struct User { age: i64 }
//!
//! impl Validate for User {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::new("Age", &self.age, "required,gte=18,even")]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let validator = ValidatorMiddleware::new(
//!         Config::new()
//!             .skip(|req| req.path() == "/health")
//!             .rule("even", |fl| matches!(fl.value().as_i64(), Some(n) if n % 2 == 0)),
//!     );
//!
//!     let app = Router::new()
//!         .layer(validator)
//!         .post("/users", create_user);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     let user = User { age: 20 };
//!     let errors = validate_struct(&req, &user);
//!     if !errors.is_empty() {
//!         return ValidationFailure(errors).into_response();
//!     }
//!     Response::text("created")
//! }
//! ```

mod error;
mod handler;
mod locals;
mod request;
mod response;
mod router;
mod server;

pub mod helpers;
pub mod middleware;
pub mod validation;

pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use helpers::{ErrorResponse, ValidationFailure};
pub use locals::Locals;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use validation::{ValidationErrors, Validator};
