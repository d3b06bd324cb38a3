//! Declaring what a struct's fields are and which rules apply to them.

/// A struct that can be checked by a [`Validator`](super::Validator).
///
/// Rust has no runtime struct tags, so the struct lists its fields together
/// with their rule strings. Order matters: violations are reported in the
/// order fields are returned here.
///
/// ```rust
/// use tsu_validator::validation::{Field, Validate};
///
/// struct User {
///     name: String,
///     age: u32,
///     nickname: Option<String>,
/// }
///
/// impl Validate for User {
///     fn fields(&self) -> Vec<Field<'_>> {
///         vec![
///             Field::new("name", &self.name, "required,min=3,max=50"),
///             Field::new("age", &self.age, "required,gte=18,lte=100"),
///             Field::new("nickname", &self.nickname, "omitempty,alphanum"),
///         ]
///     }
/// }
/// ```
pub trait Validate {
    fn fields(&self) -> Vec<Field<'_>>;
}

/// One field of a [`Validate`] value: its name, current value and rules.
#[derive(Clone, Debug, PartialEq)]
pub struct Field<'a> {
    pub(crate) name: &'a str,
    pub(crate) value: FieldValue<'a>,
    pub(crate) rules: &'a str,
}

impl<'a> Field<'a> {
    /// `rules` is a comma-separated list of `tag` or `tag=param` entries,
    /// e.g. `"required,min=3,max=50"`.
    pub fn new(name: &'a str, value: impl Into<FieldValue<'a>>, rules: &'a str) -> Self {
        Self { name, value: value.into(), rules }
    }
}

/// The value of a field, reduced to the kinds rules know how to check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// `Option::None`.
    Absent,
}

impl FieldValue<'_> {
    /// The type's zero value: `""`, `0`, `false` or absent.
    pub fn is_zero(&self) -> bool {
        match *self {
            Self::Str(s) => s.is_empty(),
            Self::Int(n) => n == 0,
            Self::Uint(n) => n == 0,
            Self::Float(n) => n == 0.0,
            Self::Bool(b) => !b,
            Self::Absent => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of `Int`, or of `Uint` when it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(n) => Some(n),
            Self::Uint(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Numeric view of any number.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(n) => Some(n as f64),
            Self::Uint(n) => Some(n as f64),
            Self::Float(n) => Some(n),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self { Self::Str(s) }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(s: &'a String) -> Self { Self::Str(s) }
}

impl<'a> From<&'a &'a str> for FieldValue<'a> {
    fn from(s: &'a &'a str) -> Self { Self::Str(s) }
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<&bool> for FieldValue<'_> {
    fn from(b: &bool) -> Self { Self::Bool(*b) }
}

impl<'a> From<&'a Option<String>> for FieldValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        value.as_deref().map_or(Self::Absent, Self::Str)
    }
}

impl<'a> From<&'a Option<&'a str>> for FieldValue<'a> {
    fn from(value: &'a Option<&'a str>) -> Self {
        value.map_or(Self::Absent, Self::Str)
    }
}

impl From<&Option<bool>> for FieldValue<'_> {
    fn from(value: &Option<bool>) -> Self {
        value.map_or(Self::Absent, Self::Bool)
    }
}

macro_rules! from_number {
    ($variant:ident as $wide:ty: $($t:ty),+) => {$(
        impl From<$t> for FieldValue<'_> {
            fn from(n: $t) -> Self { Self::$variant(n as $wide) }
        }

        impl From<&$t> for FieldValue<'_> {
            fn from(n: &$t) -> Self { Self::$variant(*n as $wide) }
        }

        impl From<&Option<$t>> for FieldValue<'_> {
            fn from(n: &Option<$t>) -> Self {
                n.map_or(Self::Absent, |n| Self::$variant(n as $wide))
            }
        }
    )+};
}

from_number!(Int as i64: i8, i16, i32, i64, isize);
from_number!(Uint as u64: u8, u16, u32, u64, usize);
from_number!(Float as f64: f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_right_kind() {
        let name = String::from("alice");
        let missing: Option<u32> = None;
        let present: Option<u32> = Some(7);

        assert_eq!(FieldValue::from(&name), FieldValue::Str("alice"));
        assert_eq!(FieldValue::from(&-3_i32), FieldValue::Int(-3));
        assert_eq!(FieldValue::from(&3_u8), FieldValue::Uint(3));
        assert_eq!(FieldValue::from(&1.5_f32), FieldValue::Float(1.5));
        assert_eq!(FieldValue::from(&missing), FieldValue::Absent);
        assert_eq!(FieldValue::from(&present), FieldValue::Uint(7));
    }

    #[test]
    fn optional_text_and_flags() {
        let nickname: Option<String> = Some("al".to_owned());
        let no_nickname: Option<String> = None;
        let tag: Option<&str> = Some("x");
        let flag: Option<bool> = Some(true);

        assert_eq!(FieldValue::from(&nickname), FieldValue::Str("al"));
        assert_eq!(FieldValue::from(&no_nickname), FieldValue::Absent);
        assert_eq!(FieldValue::from(&tag), FieldValue::Str("x"));
        assert_eq!(FieldValue::from(&flag), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(&Some(-2_i64)), FieldValue::Int(-2));
    }

    #[test]
    fn zero_values() {
        assert!(FieldValue::Str("").is_zero());
        assert!(FieldValue::Int(0).is_zero());
        assert!(FieldValue::Bool(false).is_zero());
        assert!(FieldValue::Absent.is_zero());
        assert!(!FieldValue::Float(0.1).is_zero());
    }

    #[test]
    fn uint_too_large_for_i64() {
        assert_eq!(FieldValue::Uint(u64::MAX).as_i64(), None);
        assert_eq!(FieldValue::Uint(4).as_i64(), Some(4));
    }
}
