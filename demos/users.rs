//! Validator middleware demo: JSON endpoints validated by a shared engine.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example users
//!
//! Try:
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"al","email":"nope","age":17,"username":"al!"}'
//!   curl -X POST http://localhost:3000/products \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"Desk","price":120.0,"sku":"DESK0001","stock":3}'
//!   curl http://localhost:3000/health

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tsu_validator::helpers::{ErrorResponse, ValidationFailure, validate_struct};
use tsu_validator::middleware::{Config, ValidatorMiddleware, get_validator};
use tsu_validator::validation::{Field, FieldLevel, Validate};
use tsu_validator::{IntoResponse, Request, Response, Router, Server};

#[derive(Debug, Deserialize, Serialize)]
struct User {
    name: String,
    email: String,
    age: i64,
    username: String,
}

impl Validate for User {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("Name", &self.name, "required,min=3,max=50"),
            Field::new("Email", &self.email, "required,email"),
            Field::new("Age", &self.age, "required,gte=18,lte=100"),
            Field::new("Username", &self.username, "required,min=3,max=20,alphanum"),
        ]
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct Product {
    name: String,
    price: f64,
    sku: String,
    stock: i64,
}

impl Validate for Product {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("Name", &self.name, "required,min=2"),
            Field::new("Price", &self.price, "required,gt=0"),
            Field::new("SKU", &self.sku, "required,len=8,alphanum"),
            Field::new("Stock", &self.stock, "even"),
        ]
    }
}

fn is_even(fl: &FieldLevel<'_>) -> bool {
    matches!(fl.value().as_i64(), Some(n) if n % 2 == 0)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let validator = ValidatorMiddleware::new(
        Config::new()
            .context_key("validator")
            .rule("even", is_even)
            .skip(|req| req.path() == "/health"),
    );

    let app = Router::new()
        .layer(validator)
        .post("/users", create_user)
        .post("/products", create_product)
        .get("/health", health);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

fn bad_body() -> Response {
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .json_value(&json!({ "error": "Cannot parse request body" }))
}

// POST /users: the helper formats violations.
async fn create_user(req: Request) -> Response {
    let Ok(user) = serde_json::from_slice::<User>(req.body()) else {
        return bad_body();
    };

    let errors = validate_struct(&req, &user);
    if !errors.is_empty() {
        return ValidationFailure(errors).into_response();
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .json_value(&json!({ "message": "User created successfully", "user": user }))
}

// POST /products: fetch the engine directly and report raw tags.
async fn create_product(req: Request) -> Response {
    let Ok(product) = serde_json::from_slice::<Product>(req.body()) else {
        return bad_body();
    };

    let Some(validator) = get_validator(&req) else {
        return Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .json_value(&json!({ "error": "Validator not available" }));
    };

    if let Err(errors) = validator.validate(&product) {
        let errors: Vec<ErrorResponse> = errors
            .iter()
            .map(|e| ErrorResponse {
                field: e.field().to_owned(),
                message: e.tag().to_owned(),
                tag: e.tag().to_owned(),
            })
            .collect();
        return ValidationFailure(errors).into_response();
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .json_value(&json!({ "message": "Product created successfully", "product": product }))
}

// GET /health: skipped by the middleware, so no engine here.
async fn health(_req: Request) -> Response {
    Response::json(&br#"{"status":"ok"}"#[..])
}
