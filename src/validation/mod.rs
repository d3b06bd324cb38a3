//! The struct-validation engine.
//!
//! A [`Validator`] checks any [`Validate`] value against the rule strings its
//! fields declare and reports violations as data:
//!
//! ```rust
//! use tsu_validator::validation::{Field, Validate, Validator};
//!
//! struct Signup { email: String, age: i32 }
//!
//! impl Validate for Signup {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::new("Email", &self.email, "required,email"),
//!             Field::new("Age", &self.age, "gte=18,lte=130"),
//!         ]
//!     }
//! }
//!
//! let v = Validator::new();
//! let errors = v.validate(&Signup { email: "bob@example.com".into(), age: 12 }).unwrap_err();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.iter().next().unwrap().tag(), "gte");
//! ```
//!
//! Within a field, rules run left to right and the first failure is the one
//! reported, so a field produces at most one [`FieldError`]. A rule the
//! engine cannot evaluate (unknown tag, bad parameter, wrong kind of value)
//! counts as a failure of that rule and is logged.

mod errors;
mod field;
mod rules;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::Error;

pub use errors::{FieldError, ValidationErrors};
pub use field::{Field, FieldValue, Validate};

/// A custom rule. Returns `true` when the field passes.
pub type RuleFn = Arc<dyn Fn(&FieldLevel<'_>) -> bool + Send + Sync>;

/// What a custom rule gets to look at.
#[derive(Debug)]
pub struct FieldLevel<'a> {
    field: &'a str,
    value: &'a FieldValue<'a>,
    param: Option<&'a str>,
}

impl<'a> FieldLevel<'a> {
    pub fn field(&self) -> &'a str { self.field }
    pub fn value(&self) -> &'a FieldValue<'a> { self.value }
    pub fn param(&self) -> Option<&'a str> { self.param }
}

/// Checks [`Validate`] values against their declared rules.
///
/// Built-in rules: `required`, `omitempty`, `email`, `url`, `uuid`, `min`,
/// `max`, `len`, `eq`, `ne`, `gt`, `gte`, `lt`, `lte`, `oneof`, `alpha`,
/// `alphanum`, `numeric`, `lowercase`, `uppercase`, `contains`,
/// `startswith`, `endswith`. More can be added with [`register`](Self::register);
/// a registered rule takes precedence over a built-in of the same name.
#[derive(Default)]
pub struct Validator {
    custom: HashMap<String, RuleFn>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom rule under `name`, replacing any earlier one.
    ///
    /// ```rust
    /// use tsu_validator::validation::Validator;
    ///
    /// let mut v = Validator::new();
    /// v.register("even", |fl| matches!(fl.value().as_i64(), Some(n) if n % 2 == 0))
    ///     .unwrap();
    /// ```
    pub fn register<F>(&mut self, name: &str, rule: F) -> Result<(), Error>
    where
        F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_rule(name, Arc::new(rule))
    }

    /// Same as [`register`](Self::register) for an already shared rule.
    pub fn register_rule(&mut self, name: &str, rule: RuleFn) -> Result<(), Error> {
        check_rule_name(name)?;
        self.custom.insert(name.to_owned(), rule);
        Ok(())
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.custom.contains_key(name) || rules::builtin(name).is_some()
    }

    /// Validates every field of `value`.
    pub fn validate<T: Validate + ?Sized>(&self, value: &T) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = value
            .fields()
            .iter()
            .filter_map(|field| self.check_field(field))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// First failing rule of `field`, if any.
    fn check_field(&self, field: &Field<'_>) -> Option<FieldError> {
        if field.value.is_zero() && rules::parse(field.rules).any(|r| r.tag == "omitempty") {
            return None;
        }

        rules::parse(field.rules)
            .filter(|rule| rule.tag != "omitempty")
            .find(|rule| !self.passes(field, rule))
            .map(|rule| FieldError::new(field.name, rule.tag, rule.param))
    }

    fn passes(&self, field: &Field<'_>, rule: &rules::Rule<'_>) -> bool {
        if rule.tag == "required" {
            return !field.value.is_zero();
        }

        if let Some(custom) = self.custom.get(rule.tag) {
            let level = FieldLevel { field: field.name, value: &field.value, param: rule.param };
            return custom(&level);
        }

        let Some(builtin) = rules::builtin(rule.tag) else {
            warn!(field = field.name, tag = rule.tag, "undefined validation rule");
            return false;
        };

        builtin(&field.value, rule.param).unwrap_or_else(|| {
            warn!(
                field = field.name,
                tag = rule.tag,
                param = rule.param,
                "validation rule cannot be evaluated for this value"
            );
            false
        })
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("Validator").field("custom", &names).finish()
    }
}

fn check_rule_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::EmptyRuleName);
    }
    if rules::RESERVED.contains(&name) {
        return Err(Error::ReservedRuleName(name.to_owned()));
    }
    if name.chars().any(|c| matches!(c, ',' | '=' | '|') || c.is_whitespace()) {
        return Err(Error::InvalidRuleName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User {
        name: String,
        email: String,
        age: i32,
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

    fn alice() -> User {
        User {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            age: 30,
            username: "alice42".into(),
        }
    }

    struct Counter {
        count: i64,
    }

    impl Validate for Counter {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::new("Count", &self.count, "even")]
        }
    }

    fn even(fl: &FieldLevel<'_>) -> bool {
        matches!(fl.value().as_i64(), Some(n) if n % 2 == 0)
    }

    #[test]
    fn valid_value_passes() {
        assert_eq!(Validator::new().validate(&alice()), Ok(()));
    }

    #[test]
    fn violations_follow_field_order_one_per_field() {
        let user = User { name: "".into(), email: "nope".into(), age: 12, ..alice() };
        let errors = Validator::new().validate(&user).unwrap_err();

        let found: Vec<_> = errors.iter().map(|e| (e.field(), e.tag(), e.param())).collect();
        assert_eq!(
            found,
            vec![
                ("Name", "required", None),
                ("Email", "email", None),
                ("Age", "gte", Some("18")),
            ]
        );
    }

    #[test]
    fn custom_rule_accepts_and_rejects() {
        let mut v = Validator::new();
        v.register("even", even).unwrap();

        assert!(v.validate(&Counter { count: 4 }).is_ok());
        let errors = v.validate(&Counter { count: 5 }).unwrap_err();
        assert_eq!(errors.into_vec(), vec![FieldError::new("Count", "even", None)]);
    }

    #[test]
    fn unknown_rule_fails_closed() {
        let errors = Validator::new().validate(&Counter { count: 4 }).unwrap_err();
        assert_eq!(errors.iter().next().unwrap().tag(), "even");
    }

    #[test]
    fn custom_rule_shadows_builtin() {
        let mut v = Validator::new();
        v.register("email", |_| true).unwrap();
        assert!(v.validate(&User { email: "nope".into(), ..alice() }).is_ok());
    }

    #[test]
    fn custom_rule_sees_param() {
        struct Code(String);
        impl Validate for Code {
            fn fields(&self) -> Vec<Field<'_>> {
                vec![Field::new("Code", &self.0, "prefix=SKU")]
            }
        }

        let mut v = Validator::new();
        v.register("prefix", |fl| {
            matches!((fl.value().as_str(), fl.param()), (Some(s), Some(p)) if s.starts_with(p))
        })
        .unwrap();

        assert!(v.validate(&Code("SKU123".into())).is_ok());
        assert!(v.validate(&Code("ABC123".into())).is_err());
    }

    #[test]
    fn omitempty_skips_zero_values() {
        struct Profile {
            website: Option<String>,
            bio: String,
        }
        impl Validate for Profile {
            fn fields(&self) -> Vec<Field<'_>> {
                vec![
                    Field::new("Website", &self.website, "omitempty,url"),
                    Field::new("Bio", &self.bio, "omitempty,max=5"),
                ]
            }
        }

        let v = Validator::new();
        assert!(v.validate(&Profile { website: None, bio: String::new() }).is_ok());

        let errors = v
            .validate(&Profile { website: Some("not a url".into()), bio: "too long".into() })
            .unwrap_err();
        let tags: Vec<_> = errors.iter().map(FieldError::tag).collect();
        assert_eq!(tags, vec!["url", "max"]);
    }

    #[test]
    fn absent_value_fails_required_and_other_rules() {
        struct Opt(Option<i32>);
        impl Validate for Opt {
            fn fields(&self) -> Vec<Field<'_>> {
                vec![Field::new("N", &self.0, "gte=1")]
            }
        }
        let errors = Validator::new().validate(&Opt(None)).unwrap_err();
        assert_eq!(errors.iter().next().unwrap().tag(), "gte");
        assert!(Validator::new().validate(&Opt(Some(2))).is_ok());
    }

    #[test]
    fn rule_names_are_checked() {
        let mut v = Validator::new();
        assert!(matches!(v.register("", even), Err(Error::EmptyRuleName)));
        assert!(matches!(v.register("required", even), Err(Error::ReservedRuleName(_))));
        assert!(matches!(v.register("omitempty", even), Err(Error::ReservedRuleName(_))));
        assert!(matches!(v.register("a,b", even), Err(Error::InvalidRuleName(_))));
        assert!(matches!(v.register("is even", even), Err(Error::InvalidRuleName(_))));
        assert!(!v.has_rule("even"));

        v.register("even", even).unwrap();
        assert!(v.has_rule("even"));
        assert!(v.has_rule("email"));
    }
}
