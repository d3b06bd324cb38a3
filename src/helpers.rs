//! Turning validation results into something a client can read.
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use tsu_validator::helpers::{ValidationFailure, validate_struct};
//! use tsu_validator::validation::{Field, Validate};
//! use tsu_validator::{IntoResponse, Request, Response};
//!
//! struct User { name: String }
//!
//! impl Validate for User {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::new("Name", &self.name, "required,min=3")]
//!     }
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     let user = User { name: String::from_utf8_lossy(req.body()).into_owned() };
//!     let errors = validate_struct(&req, &user);
//!     if !errors.is_empty() {
//!         return ValidationFailure(errors).into_response();
//!     }
//!     Response::status(StatusCode::CREATED)
//! }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::middleware::{DEFAULT_CONTEXT_KEY, get_validator_with_key};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::validation::{FieldError, Validate};

/// One violation, formatted for API clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub field: String,
    pub message: String,
    pub tag: String,
}

impl From<&FieldError> for ErrorResponse {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field().to_owned(),
            message: message(err),
            tag: err.tag().to_owned(),
        }
    }
}

/// Validates `value` with the engine stored under the default key.
///
/// Returns one entry per failing field, in field order. An empty result
/// means either "valid" or "no engine in this request" (the middleware was
/// not installed, was skipped, or uses another key); use
/// [`get_validator`](crate::middleware::get_validator) when the difference
/// matters.
pub fn validate_struct<T: Validate + ?Sized>(req: &Request, value: &T) -> Vec<ErrorResponse> {
    validate_struct_with_key(req, DEFAULT_CONTEXT_KEY, value)
}

/// [`validate_struct`] for an engine stored under a custom key.
pub fn validate_struct_with_key<T: Validate + ?Sized>(
    req: &Request,
    key: &str,
    value: &T,
) -> Vec<ErrorResponse> {
    let Some(validator) = get_validator_with_key(req, key) else {
        return Vec::new();
    };

    match validator.validate(value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ErrorResponse::from).collect(),
    }
}

/// Human-readable text for a violation.
pub fn message(err: &FieldError) -> String {
    let param = err.param().unwrap_or_default();
    match err.tag() {
        "required" => "This field is required".to_owned(),
        "email" => "Invalid email format".to_owned(),
        "min" => format!("Value is too short (min: {param})"),
        "max" => format!("Value is too long (max: {param})"),
        "gte" => format!("Value must be greater than or equal to {param}"),
        "lte" => format!("Value must be less than or equal to {param}"),
        "len" => format!("Value must have exactly {param} characters"),
        "url" => "Invalid URL format".to_owned(),
        "uuid" => "Invalid UUID format".to_owned(),
        _ => format!("Invalid value for {}", err.field()),
    }
}

/// `400 Bad Request` with body `{"errors": [...]}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFailure(pub Vec<ErrorResponse>);

impl IntoResponse for ValidationFailure {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct Body<'a> {
            errors: &'a [ErrorResponse],
        }

        Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .json_value(&Body { errors: &self.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(field: &str, tag: &str, param: Option<&str>) -> String {
        message(&FieldError::new(field, tag, param))
    }

    #[test]
    fn message_table() {
        assert_eq!(msg("Name", "required", None), "This field is required");
        assert_eq!(msg("Email", "email", None), "Invalid email format");
        assert_eq!(msg("Name", "min", Some("3")), "Value is too short (min: 3)");
        assert_eq!(msg("Name", "max", Some("50")), "Value is too long (max: 50)");
        assert_eq!(msg("Age", "gte", Some("18")), "Value must be greater than or equal to 18");
        assert_eq!(msg("Age", "lte", Some("100")), "Value must be less than or equal to 100");
        assert_eq!(msg("SKU", "len", Some("8")), "Value must have exactly 8 characters");
        assert_eq!(msg("Site", "url", None), "Invalid URL format");
        assert_eq!(msg("Id", "uuid", None), "Invalid UUID format");
    }

    #[test]
    fn unknown_tag_falls_back_to_field_name() {
        assert_eq!(msg("Count", "even", None), "Invalid value for Count");
        assert_eq!(msg("Username", "alphanum", None), "Invalid value for Username");
    }

    #[test]
    fn missing_param_interpolates_empty() {
        assert_eq!(msg("Name", "min", None), "Value is too short (min: )");
    }

    #[test]
    fn failure_renders_400_json() {
        let res = ValidationFailure(vec![ErrorResponse {
            field: "Age".into(),
            message: "Value must be greater than or equal to 18".into(),
            tag: "gte".into(),
        }])
        .into_response();

        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "errors": [{
                    "field": "Age",
                    "message": "Value must be greater than or equal to 18",
                    "tag": "gte",
                }]
            })
        );
    }
}
