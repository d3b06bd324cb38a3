//! Request-scoped key-value store.
//!
//! Every [`Request`](crate::Request) carries its own [`Locals`]. Middleware
//! writes into it, handlers further down the chain read from it, and it is
//! dropped together with the request. Nothing here is shared between
//! requests, so there is no locking.
//!
//! Values are stored type-erased behind `Arc<dyn Any>` and recovered with a
//! typed [`Locals::get`]. Reading a key with the wrong type is the same as
//! reading a key that was never written: `None`.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Value = Arc<dyn Any + Send + Sync>;

/// String-keyed values attached to a single request.
#[derive(Default)]
pub struct Locals {
    values: HashMap<String, Value>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing whatever was there.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        self.values.insert(key.into(), value);
    }

    /// Returns the value under `key` if one exists and it is a `T`.
    pub fn get<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let value = Arc::clone(self.values.get(key)?);
        value.downcast::<T>().ok()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes `key`, returning `true` if something was stored under it.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Locals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_the_stored_arc() {
        let mut locals = Locals::new();
        let value = Arc::new(42_u32);
        locals.insert("answer", Arc::clone(&value));

        let got = locals.get::<u32>("answer").unwrap();
        assert!(Arc::ptr_eq(&got, &value));
    }

    #[test]
    fn missing_key_is_none() {
        let locals = Locals::new();
        assert!(locals.get::<u32>("nothing").is_none());
        assert!(locals.is_empty());
    }

    #[test]
    fn wrong_type_is_none() {
        let mut locals = Locals::new();
        locals.insert("answer", Arc::new("forty-two".to_owned()));

        assert!(locals.get::<u32>("answer").is_none());
        assert!(locals.get::<String>("answer").is_some());
    }

    #[test]
    fn insert_replaces_and_remove_clears() {
        let mut locals = Locals::new();
        locals.insert("k", Arc::new(1_i64));
        locals.insert("k", Arc::new(2_i64));
        assert_eq!(locals.len(), 1);
        assert_eq!(*locals.get::<i64>("k").unwrap(), 2);

        assert!(locals.remove("k"));
        assert!(!locals.remove("k"));
        assert!(!locals.contains_key("k"));
    }
}
