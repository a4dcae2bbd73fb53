//! Key → handler registration table.

use std::collections::HashMap;

use mudlink_core::HandlerResult;
use serde_json::Value;

/// Handler bound to a semantic key. Receives the key's value and the
/// envelope's optional context tag.
pub type Handler = Box<dyn Fn(&Value, Option<&str>) -> HandlerResult + Send + Sync>;

/// Fallback for keys with no registration. Receives only the value.
pub type FallbackHandler = Box<dyn Fn(&Value) -> HandlerResult + Send + Sync>;

/// Startup-populated mapping from semantic key to UI-update handler.
///
/// Exactly one handler per key; re-registering a key overwrites the
/// previous entry. The table is consumed by the engine at construction
/// and never mutated during a session.
pub struct HandlerTable {
    handlers: HashMap<String, Handler>,
    fallback: FallbackHandler,
}

impl HandlerTable {
    /// Create a table with the given unknown-key fallback.
    #[must_use]
    pub fn new(fallback: FallbackHandler) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// Bind `key` to `handler`. Last registration wins.
    pub fn register<K, H>(&mut self, key: K, handler: H)
    where
        K: Into<String>,
        H: Fn(&Value, Option<&str>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(key.into(), Box::new(handler));
    }

    /// Invoke the handler for `key`, or the fallback when unbound.
    ///
    /// # Errors
    /// Propagates the handler's failure; the routing engine captures it
    /// per key.
    pub fn invoke(&self, key: &str, value: &Value, context: Option<&str>) -> HandlerResult {
        match self.handlers.get(key) {
            Some(handler) => handler(value, context),
            None => (self.fallback)(value),
        }
    }

    /// Whether `key` has a registered handler.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
