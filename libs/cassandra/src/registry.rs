use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-wide lookup of shared capabilities, keyed by type.
///
/// Populated once at startup by the extension entry point and queried by the
/// concrete type afterwards; no scanning, no annotations. Values must be
/// cheaply cloneable handles (`Arc`-backed views and promises).
///
/// # Example
///
/// ```ignore
/// use cassandra_client::{registry, SessionHandle, SessionStateView};
///
/// let handle: SessionHandle = registry::global()
///     .get()
///     .expect("init_session was called at startup");
/// let state: SessionStateView = registry::global().get().unwrap();
/// ```
pub struct Registry {
    entries: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Publish a value under its type. A later `put` of the same type
    /// replaces the earlier one; by contract this happens once, at startup.
    pub fn put<T: Send + Sync + 'static>(&self, value: T) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Look up a value by type, cloning it out
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Whether a value of this type has been published
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(&TypeId::of::<T>())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry instance
pub fn global() -> &'static Registry {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Endpoint(String);

    #[derive(Clone, Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn test_put_and_get_by_type() {
        let registry = Registry::new();
        registry.put(Endpoint("127.0.0.1:9042".to_string()));

        let endpoint: Endpoint = registry.get().unwrap();
        assert_eq!(endpoint, Endpoint("127.0.0.1:9042".to_string()));
    }

    #[test]
    fn test_get_missing_type_is_none() {
        let registry = Registry::new();
        registry.put(Endpoint("a".to_string()));
        assert_eq!(registry.get::<Marker>(), None);
        assert!(!registry.contains::<Marker>());
    }

    #[test]
    fn test_put_replaces_existing_value() {
        let registry = Registry::new();
        registry.put(Marker(1));
        registry.put(Marker(2));
        assert_eq!(registry.get::<Marker>(), Some(Marker(2)));
    }

    #[test]
    fn test_global_registry_is_shared() {
        #[derive(Clone, PartialEq, Debug)]
        struct GlobalProbe(u8);

        global().put(GlobalProbe(42));
        assert_eq!(global().get::<GlobalProbe>(), Some(GlobalProbe(42)));
    }
}
