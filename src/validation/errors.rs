//! What a failed validation returns.

use std::slice;
use std::vec;

/// One field that failed one rule.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Key: '{field}' Error:Field validation for '{field}' failed on the '{tag}' tag")]
pub struct FieldError {
    pub(crate) field: String,
    pub(crate) tag: String,
    pub(crate) param: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, tag: impl Into<String>, param: Option<&str>) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
            param: param.map(str::to_owned),
        }
    }

    pub fn field(&self) -> &str { &self.field }
    pub fn tag(&self) -> &str { &self.tag }

    /// The rule parameter, e.g. `"18"` for `gte=18`.
    pub fn param(&self) -> Option<&str> { self.param.as_deref() }
}

/// Every violation found in one value, in field declaration order.
///
/// Returned only as the `Err` side of
/// [`Validator::validate`](super::Validator::validate), so it is never empty.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.0))]
pub struct ValidationErrors(pub(crate) Vec<FieldError>);

impl ValidationErrors {
    pub fn iter(&self) -> slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn render(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_field_and_tag() {
        let err = FieldError::new("Age", "gte", Some("18"));
        assert_eq!(
            err.to_string(),
            "Key: 'Age' Error:Field validation for 'Age' failed on the 'gte' tag"
        );
        assert_eq!(err.param(), Some("18"));
    }

    #[test]
    fn errors_render_one_per_line() {
        let errors = ValidationErrors(vec![
            FieldError::new("Name", "required", None),
            FieldError::new("Email", "email", None),
        ]);
        let text = errors.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("Key: 'Name'"));
    }
}
