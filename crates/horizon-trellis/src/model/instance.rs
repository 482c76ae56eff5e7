//! Model instances.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use horizon_trellis_core::{AttributeMap, AttributeValue};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// A stable identifier for a model instance.
///
/// Ids are unique per process and never reused; instance equality is
/// id-based, so clones of the same handle compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value, for interop and logging.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct InstanceInner {
    id: InstanceId,
    type_tag: String,
    attributes: RwLock<AttributeMap>,
}

/// A model instance: a mutable attribute map stamped with its factory's
/// type tag.
///
/// Instances are cheap shared handles. The same instance appears in its
/// factory's collection and, depending on the factory's propagation depth,
/// in ancestor collections as well.
#[derive(Clone)]
pub struct ModelInstance {
    inner: Arc<InstanceInner>,
}

impl ModelInstance {
    pub(crate) fn new(type_tag: &str, attributes: AttributeMap) -> Self {
        Self {
            inner: Arc::new(InstanceInner {
                id: InstanceId::next(),
                type_tag: type_tag.to_string(),
                attributes: RwLock::new(attributes),
            }),
        }
    }

    /// The instance's stable id.
    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    /// The type tag of the factory that created this instance.
    pub fn type_tag(&self) -> &str {
        &self.inner.type_tag
    }

    /// Returns a clone of the attribute value for `key`.
    pub fn get(&self, key: &str) -> Option<AttributeValue> {
        self.inner.attributes.read().get(key).cloned()
    }

    /// Accesses the attribute map through a closure without cloning.
    pub fn with_attributes<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AttributeMap) -> R,
    {
        f(&self.inner.attributes.read())
    }

    /// Returns a snapshot of the attribute map.
    pub fn attributes(&self) -> AttributeMap {
        self.inner.attributes.read().clone()
    }

    /// Sets an attribute value. Chainable.
    pub fn set(&self, key: impl Into<String>, value: impl Into<AttributeValue>) -> &Self {
        self.inner.attributes.write().insert(key, value);
        self
    }

    /// Sets an attribute value only when `condition` holds. Chainable.
    pub fn set_if(
        &self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
        condition: bool,
    ) -> &Self {
        if condition {
            self.set(key, value);
        }
        self
    }

    /// Sets an attribute value only when the predicate holds for this
    /// instance. The predicate runs before the write lock is taken, so it
    /// may read the instance freely. Chainable.
    pub fn set_if_with<F>(
        &self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
        condition: F,
    ) -> &Self
    where
        F: FnOnce(&ModelInstance) -> bool,
    {
        let holds = condition(self);
        self.set_if(key, value, holds)
    }

    /// Sets an attribute value only when the key has no value yet.
    /// Chainable.
    pub fn set_if_undefined(
        &self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> &Self {
        let key = key.into();
        let mut attributes = self.inner.attributes.write();
        if !attributes.contains_key(&key) {
            attributes.insert(key, value);
        }
        self
    }
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for ModelInstance {}

impl fmt::Debug for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelInstance")
            .field("id", &self.inner.id)
            .field("type_tag", &self.inner.type_tag)
            .field("attributes", &*self.inner.attributes.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(ModelInstance: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let a = ModelInstance::new("Item", AttributeMap::new());
        let b = ModelInstance::new("Item", AttributeMap::new());
        assert_ne!(a.id(), b.id());
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_equality_is_id_based() {
        let a = ModelInstance::new("Item", AttributeMap::new());
        let b = a.clone();
        let c = ModelInstance::new("Item", AttributeMap::new());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_get_set() {
        let instance = ModelInstance::new("Item", AttributeMap::new().with("qty", 1));
        assert_eq!(instance.get("qty").and_then(|v| v.as_int()), Some(1));
        instance.set("qty", 2).set("name", "Widget");
        assert_eq!(instance.get("qty").and_then(|v| v.as_int()), Some(2));
        assert_eq!(instance.get("name").and_then(|v| v.into_text()).as_deref(), Some("Widget"));
    }

    #[test]
    fn test_set_if() {
        let instance = ModelInstance::new("Item", AttributeMap::new());
        instance.set_if("a", 1, false);
        assert!(instance.get("a").is_none());
        instance.set_if("a", 1, true);
        assert_eq!(instance.get("a").and_then(|v| v.as_int()), Some(1));
    }

    #[test]
    fn test_set_if_with_predicate() {
        let instance = ModelInstance::new("Item", AttributeMap::new().with("qty", 5));
        instance.set_if_with("big", true, |i| {
            i.get("qty").and_then(|v| v.as_int()).unwrap_or(0) > 3
        });
        assert_eq!(instance.get("big").and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn test_set_if_undefined() {
        let instance = ModelInstance::new("Item", AttributeMap::new().with("name", "kept"));
        instance
            .set_if_undefined("name", "replaced")
            .set_if_undefined("color", "red");
        assert_eq!(instance.get("name").and_then(|v| v.into_text()).as_deref(), Some("kept"));
        assert_eq!(instance.get("color").and_then(|v| v.into_text()).as_deref(), Some("red"));
    }
}
