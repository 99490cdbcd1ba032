//! Name → [`Group`] lookup shared by every component that serves namespaces.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::{CacheError, Getter, Group};

/// Registry of cache namespaces.
///
/// Construct one at startup and hand it (usually as an `Arc<Registry>`) to
/// the components that need to look namespaces up. Reads take a shared lock;
/// registration takes the exclusive lock. Registering an existing name
/// replaces the previous group.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use geecache::cache::{Getter, LoadError, Registry};
///
/// let registry = Registry::new();
/// let getter: Arc<dyn Getter> = Arc::new(|key: String| async move {
///     Err::<Vec<u8>, _>(LoadError::not_found(key))
/// });
///
/// registry.new_group("scores", 2 << 10, Some(getter)).unwrap();
/// assert!(registry.get_group("scores").is_some());
/// assert!(registry.get_group("missing").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a group and registers it under `name`, replacing any prior group.
    ///
    /// `cache_bytes` bounds the group's cache (`0` = unbounded).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::MissingGetter`] if `getter` is `None`. The
    /// registry is not modified in that case.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        getter: Option<Arc<dyn Getter>>,
    ) -> Result<Arc<Group>, CacheError> {
        let name = name.into();
        let getter = getter.ok_or_else(|| CacheError::MissingGetter { name: name.clone() })?;

        let group = Arc::new(Group::new(name.clone(), cache_bytes, getter));
        let previous = self.groups.write().insert(name.clone(), Arc::clone(&group));

        if previous.is_some() {
            warn!(group = %name, "replaced existing cache group");
        } else {
            info!(group = %name, cache_bytes, "registered cache group");
        }

        Ok(group)
    }

    /// Returns the group registered under `name`, if any.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Like [`get_group`](Self::get_group), but reports absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NoSuchGroup`] if `name` is not registered.
    pub fn require_group(&self, name: &str) -> Result<Arc<Group>, CacheError> {
        self.get_group(name).ok_or_else(|| CacheError::NoSuchGroup {
            name: name.to_owned(),
        })
    }

    /// Returns the number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Returns `true` if no groups are registered.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LoadError;

    fn constant(value: &'static str) -> Arc<dyn Getter> {
        Arc::new(move |_key: String| async move { Ok::<_, LoadError>(value.as_bytes().to_vec()) })
    }

    #[test]
    fn lookup_of_unregistered_name_is_none() {
        let registry = Registry::new();
        assert!(registry.get_group("nope").is_none());
        assert!(matches!(
            registry.require_group("nope"),
            Err(CacheError::NoSuchGroup { ref name }) if name == "nope"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_getter_leaves_registry_untouched() {
        let registry = Registry::new();

        let err = registry.new_group("scores", 64, None).unwrap_err();
        assert!(matches!(err, CacheError::MissingGetter { ref name } if name == "scores"));
        assert!(registry.get_group("scores").is_none());

        let original = registry.new_group("scores", 64, Some(constant("a"))).unwrap();
        assert!(registry.new_group("scores", 64, None).is_err());
        let current = registry.get_group("scores").unwrap();
        assert!(Arc::ptr_eq(&original, &current));
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let registry = Registry::new();
        registry.new_group("g", 0, Some(constant("first"))).unwrap();
        let second = registry.new_group("g", 0, Some(constant("second"))).unwrap();

        let current = registry.get_group("g").unwrap();
        assert!(Arc::ptr_eq(&second, &current));
        assert_eq!(current.get("k").await.unwrap().to_string(), "second");
        assert_eq!(registry.len(), 1);
    }
}
