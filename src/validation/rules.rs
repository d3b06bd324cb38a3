//! Rule-string parsing and the built-in rules.
//!
//! A rule string is `tag[=param](,tag[=param])*`, the syntax of struct-tag
//! validators: `"required,min=3,max=50"`, `"oneof=red green blue"`.
//! Built-ins answer `Some(true|false)`, or `None` when the rule cannot be
//! evaluated for this value (missing or bad parameter, wrong kind of value).

use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidateEmail, ValidateUrl};

use super::field::FieldValue;

/// Tags the engine interprets itself; custom rules may not take these names.
pub(crate) const RESERVED: &[&str] = &["required", "omitempty"];

/// One parsed `tag[=param]` entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rule<'a> {
    pub tag: &'a str,
    pub param: Option<&'a str>,
}

/// Splits a rule string into entries, skipping empty ones.
pub(crate) fn parse(rules: &str) -> impl Iterator<Item = Rule<'_>> {
    rules
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((tag, param)) => Rule { tag: tag.trim(), param: Some(param) },
            None => Rule { tag: entry, param: None },
        })
}

pub(crate) type Builtin = fn(&FieldValue<'_>, Option<&str>) -> Option<bool>;

/// Looks up a built-in rule by tag.
pub(crate) fn builtin(tag: &str) -> Option<Builtin> {
    let rule: Builtin = match tag {
        "email" => email,
        "url" => url,
        "uuid" => uuid,
        "min" => min,
        "max" => max,
        "len" => len,
        "eq" => eq,
        "ne" => ne,
        "gt" => gt,
        "gte" => gte,
        "lt" => lt,
        "lte" => lte,
        "oneof" => oneof,
        "alpha" => alpha,
        "alphanum" => alphanum,
        "numeric" => numeric,
        "lowercase" => lowercase,
        "uppercase" => uppercase,
        "contains" => contains,
        "startswith" => starts_with,
        "endswith" => ends_with,
        _ => return None,
    };
    Some(rule)
}

// ── Formats ───────────────────────────────────────────────────────────────────

/// HTML5 address syntax, at most 254 bytes.
fn email(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    value.as_str().map(|s| s.validate_email())
}

/// Absolute URL with a scheme.
fn url(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    value.as_str().map(|s| s.validate_url())
}

/// Hyphenated `8-4-4-4-12` form only.
fn uuid(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    value.as_str().map(|s| s.len() == 36 && ::uuid::Uuid::try_parse(s).is_ok())
}

// ── Size and comparison ───────────────────────────────────────────────────────

/// What comparisons measure: character count for text, the value for numbers.
fn measure(value: &FieldValue<'_>) -> Option<f64> {
    match *value {
        FieldValue::Str(s) => Some(s.chars().count() as f64),
        _ => value.as_f64(),
    }
}

fn compare(value: &FieldValue<'_>, param: Option<&str>, op: fn(f64, f64) -> bool) -> Option<bool> {
    let bound = param?.trim().parse::<f64>().ok()?;
    Some(op(measure(value)?, bound))
}

fn min(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    compare(value, param, |v, b| v >= b)
}

fn max(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    compare(value, param, |v, b| v <= b)
}

fn len(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    compare(value, param, |v, b| v == b)
}

fn gt(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    compare(value, param, |v, b| v > b)
}

fn gte(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    compare(value, param, |v, b| v >= b)
}

fn lt(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    compare(value, param, |v, b| v < b)
}

fn lte(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    compare(value, param, |v, b| v <= b)
}

/// Text compares as text; everything else like `len`.
fn eq(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    match *value {
        FieldValue::Str(s) => Some(s == param?),
        FieldValue::Bool(b) => Some(param?.trim().parse::<bool>().ok()? == b),
        _ => compare(value, param, |v, b| v == b),
    }
}

fn ne(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    eq(value, param).map(|equal| !equal)
}

fn oneof(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    let mut options = param?.split_whitespace();
    match *value {
        FieldValue::Str(s) => Some(options.any(|o| o == s)),
        FieldValue::Int(n) => Some(options.any(|o| o.parse::<i64>() == Ok(n))),
        FieldValue::Uint(n) => Some(options.any(|o| o.parse::<u64>() == Ok(n))),
        _ => None,
    }
}

// ── Character classes ─────────────────────────────────────────────────────────

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").expect("numeric regex is valid"));

fn chars_all(value: &FieldValue<'_>, pred: fn(char) -> bool) -> Option<bool> {
    value.as_str().map(|s| !s.is_empty() && s.chars().all(pred))
}

fn alpha(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    chars_all(value, |c| c.is_ascii_alphabetic())
}

fn alphanum(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    chars_all(value, |c| c.is_ascii_alphanumeric())
}

/// Signed decimal text such as `-12.5`; numbers always pass.
fn numeric(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    match *value {
        FieldValue::Str(s) => Some(NUMERIC.is_match(s)),
        FieldValue::Int(_) | FieldValue::Uint(_) | FieldValue::Float(_) => Some(true),
        _ => None,
    }
}

fn lowercase(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    value.as_str().map(|s| !s.is_empty() && s == s.to_lowercase())
}

fn uppercase(value: &FieldValue<'_>, _: Option<&str>) -> Option<bool> {
    value.as_str().map(|s| !s.is_empty() && s == s.to_uppercase())
}

fn contains(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    Some(value.as_str()?.contains(param?))
}

fn starts_with(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    Some(value.as_str()?.starts_with(param?))
}

fn ends_with(value: &FieldValue<'_>, param: Option<&str>) -> Option<bool> {
    Some(value.as_str()?.ends_with(param?))
}
