//! Model factories and the extend chain.
//!
//! A [`ModelFactory`] is the constructor-equivalent for one model type: a
//! type tag, resolved defaults/attributes, an optional lifecycle hook, and
//! an owned [`Collection`] its instances register into. Factories form
//! chains via [`extend`](ModelFactory::extend); a child's options are
//! resolved from its parent's at build time, so there is no option lookup
//! walking the chain afterwards.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{safe_merge, AttributeMap, AttributeValue, MergeOptions};

use crate::error::ModelError;
use crate::model::collection::Collection;
use crate::model::instance::ModelInstance;
use crate::model::options::{InitializeHook, ModelOptions, PropagationDepth};
use crate::namespace::{Namespace, NamespaceRef};

pub(crate) struct FactoryInner {
    type_tag: String,
    defaults: AttributeMap,
    attributes: AttributeMap,
    initialize: Option<InitializeHook>,
    propagation: PropagationDepth,
    namespace: Option<NamespaceRef>,
    parent: Option<Weak<FactoryInner>>,
    collection: Collection,
}

/// A model "class": type tag, resolved options, and an instance collection.
///
/// Factories are cheap shared handles. The parent link is weak: a chain
/// stays alive through the namespace registry or through the handles the
/// caller keeps, never through its children.
///
/// # Example
///
/// ```
/// use horizon_trellis::model::{ModelFactory, ModelOptions};
///
/// let item = ModelFactory::define(ModelOptions::new("Item").with_default("qty", 0))?;
/// let special = item.extend(ModelOptions::new("Special").with_default("discount", 10))?;
///
/// // Child factories carry the parent's defaults forward.
/// assert_eq!(special.defaults().get("qty").and_then(|v| v.as_int()), Some(0));
///
/// let instance = special.create();
/// assert!(item.collection().contains(&instance));    // propagated one level
/// assert!(special.collection().contains(&instance));
/// # Ok::<(), horizon_trellis::error::ModelError>(())
/// ```
#[derive(Clone)]
pub struct ModelFactory {
    pub(crate) inner: Arc<FactoryInner>,
}

impl ModelFactory {
    /// Defines a root factory from options.
    ///
    /// Fails on an empty type tag, or on a tag collision when the options
    /// carry a namespace (uniqueness is namespace-wide).
    pub fn define(options: ModelOptions) -> Result<ModelFactory, ModelError> {
        Self::build(options, None)
    }

    /// Defines a child factory inheriting this factory's resolved options.
    ///
    /// The child's own entries win; parent attributes and defaults fill the
    /// gaps; a child without its own `initialize` hook inherits the
    /// parent's. The child gets a fresh collection, never the parent's.
    pub fn extend(&self, child: ModelOptions) -> Result<ModelFactory, ModelError> {
        let no_overwrite = MergeOptions::new();
        let merged = ModelOptions {
            type_tag: child.type_tag,
            defaults: safe_merge(&child.defaults, &self.inner.defaults, &no_overwrite),
            attributes: safe_merge(&child.attributes, &self.inner.attributes, &no_overwrite),
            initialize: child.initialize.or_else(|| self.inner.initialize.clone()),
            propagation: Some(child.propagation.unwrap_or(self.inner.propagation)),
            namespace: child.namespace.or_else(|| self.inner.namespace.clone()),
        };
        Self::build(merged, Some(self))
    }

    fn build(options: ModelOptions, parent: Option<&ModelFactory>) -> Result<ModelFactory, ModelError> {
        if options.type_tag.is_empty() {
            return Err(ModelError::EmptyTypeTag);
        }

        // Chain-local uniqueness; the namespace check below widens this to
        // the whole namespace when one is attached.
        let mut ancestor = parent.cloned();
        while let Some(factory) = ancestor {
            if factory.type_tag() == options.type_tag {
                return Err(ModelError::DuplicateTypeTag {
                    tag: options.type_tag,
                });
            }
            ancestor = factory.parent();
        }

        let factory = ModelFactory {
            inner: Arc::new(FactoryInner {
                collection: Collection::new(options.type_tag.clone()),
                type_tag: options.type_tag,
                defaults: options.defaults,
                attributes: options.attributes,
                initialize: options.initialize,
                propagation: options.propagation.unwrap_or_default(),
                namespace: options.namespace,
                parent: parent.map(|p| Arc::downgrade(&p.inner)),
            }),
        };

        if let Some(namespace) = factory.namespace() {
            namespace.register_factory(&factory)?;
        }

        tracing::debug!(
            target: targets::MODEL,
            type_tag = factory.type_tag(),
            parent = parent.map(|p| p.type_tag()),
            "model factory defined"
        );
        Ok(factory)
    }

    /// The factory's type tag.
    pub fn type_tag(&self) -> &str {
        &self.inner.type_tag
    }

    /// The resolved initial attribute values for new instances.
    pub fn defaults(&self) -> &AttributeMap {
        &self.inner.defaults
    }

    /// The resolved static factory attributes.
    pub fn attributes(&self) -> &AttributeMap {
        &self.inner.attributes
    }

    /// Returns one resolved static attribute.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.inner.attributes.get(key)
    }

    /// The factory this one was extended from, if it is still alive.
    pub fn parent(&self) -> Option<ModelFactory> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| ModelFactory { inner })
    }

    /// The namespace this factory is registered in, if any.
    pub fn namespace(&self) -> Option<Namespace> {
        self.inner.namespace.as_ref().and_then(NamespaceRef::upgrade)
    }

    /// The configured ancestor-collection propagation depth.
    pub fn propagation(&self) -> PropagationDepth {
        self.inner.propagation
    }

    /// The factory's own instance collection.
    pub fn collection(&self) -> &Collection {
        &self.inner.collection
    }

    /// Alias for [`collection`](Self::collection), matching the classic
    /// `all` shorthand.
    pub fn all(&self) -> &Collection {
        &self.inner.collection
    }

    /// The factory's default instance: its first, in creation order.
    pub fn default_instance(&self) -> Option<ModelInstance> {
        self.inner.collection.first()
    }

    /// Creates an instance seeded from the factory defaults.
    pub fn create(&self) -> ModelInstance {
        self.create_with(AttributeMap::new())
    }

    /// Creates an instance from explicit attributes; factory defaults fill
    /// the keys the caller leaves unset.
    ///
    /// The lifecycle hook (own or inherited) runs first, then the instance
    /// joins this factory's collection, then ancestor collections up to the
    /// configured propagation depth.
    pub fn create_with(&self, attributes: AttributeMap) -> ModelInstance {
        let _span = tracing::trace_span!(
            "horizon_trellis::create_instance",
            type_tag = self.type_tag()
        )
        .entered();

        let seeded = safe_merge(&attributes, &self.inner.defaults, &MergeOptions::new());
        let instance = ModelInstance::new(self.type_tag(), seeded);

        if let Some(hook) = &self.inner.initialize {
            hook(&instance);
        }

        self.inner.collection.push(instance.clone());

        let mut level = 1;
        let mut ancestor = self.parent();
        while let Some(factory) = ancestor {
            if !self.inner.propagation.allows(level) {
                break;
            }
            factory.collection().push(instance.clone());
            level += 1;
            ancestor = factory.parent();
        }

        tracing::trace!(
            target: targets::MODEL,
            type_tag = self.type_tag(),
            instance = %instance.id(),
            "model instance created"
        );
        instance
    }
}

impl fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelFactory")
            .field("type_tag", &self.inner.type_tag)
            .field("parent", &self.parent().map(|p| p.type_tag().to_string()))
            .field("instances", &self.inner.collection.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(ModelFactory: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn define(tag: &str) -> ModelFactory {
        ModelFactory::define(ModelOptions::new(tag)).unwrap()
    }

    #[test]
    fn test_empty_tag_rejected() {
        let err = ModelFactory::define(ModelOptions::new("")).unwrap_err();
        assert_eq!(err, ModelError::EmptyTypeTag);
    }

    #[test]
    fn test_chain_duplicate_tag_rejected() {
        let base = define("Item");
        let err = base.extend(ModelOptions::new("Item")).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateTypeTag { tag: "Item".to_string() }
        );
    }

    #[test]
    fn test_child_inherits_parent_options() {
        let base = ModelFactory::define(
            ModelOptions::new("Item")
                .with_default("qty", 0)
                .with_attribute("category", "inventory"),
        )
        .unwrap();
        let child = base
            .extend(ModelOptions::new("Special").with_default("qty", 5))
            .unwrap();

        // Child's own entry wins; the rest is carried forward.
        assert_eq!(child.defaults().get("qty").and_then(|v| v.as_int()), Some(5));
        assert_eq!(child.attribute("category").and_then(|v| v.as_text()), Some("inventory"));
        assert_eq!(child.parent().unwrap().type_tag(), "Item");
    }

    #[test]
    fn test_child_hook_wins_over_parents() {
        let parent_runs = Arc::new(AtomicUsize::new(0));
        let child_runs = Arc::new(AtomicUsize::new(0));

        let p = parent_runs.clone();
        let base = ModelFactory::define(
            ModelOptions::new("Item").on_initialize(move |_| {
                p.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        let c = child_runs.clone();
        let child = base
            .extend(ModelOptions::new("Special").on_initialize(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        child.create();
        assert_eq!(parent_runs.load(Ordering::SeqCst), 0);
        assert_eq!(child_runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_child_without_hook_inherits_parents() {
        let parent_runs = Arc::new(AtomicUsize::new(0));
        let p = parent_runs.clone();
        let base = ModelFactory::define(
            ModelOptions::new("Item").on_initialize(move |_| {
                p.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
        let child = base.extend(ModelOptions::new("Special")).unwrap();

        child.create();
        assert_eq!(parent_runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_runs_before_collection_insert() {
        let base = ModelFactory::define(ModelOptions::new("Item").on_initialize(|instance| {
            instance.set("touched", true);
        }))
        .unwrap();
        let instance = base.create();
        assert_eq!(instance.get("touched").and_then(|v| v.as_bool()), Some(true));
        assert!(base.collection().contains(&instance));
    }

    #[test]
    fn test_creation_order_membership() {
        let factory = define("Item");
        let first = factory.create();
        let second = factory.create();
        let items = factory.collection().to_vec();
        assert_eq!(items, vec![first, second]);
    }

    #[test]
    fn test_default_propagation_is_single_level() {
        let grandparent = define("Base");
        let parent = grandparent.extend(ModelOptions::new("Mid")).unwrap();
        let child = parent.extend(ModelOptions::new("Leaf")).unwrap();

        let instance = child.create();
        assert!(child.collection().contains(&instance));
        assert!(parent.collection().contains(&instance));
        assert!(!grandparent.collection().contains(&instance));
    }

    #[test]
    fn test_propagation_none() {
        let parent = define("Base");
        let child = parent
            .extend(ModelOptions::new("Leaf").with_propagation(PropagationDepth::None))
            .unwrap();
        let instance = child.create();
        assert!(child.collection().contains(&instance));
        assert!(!parent.collection().contains(&instance));
    }

    #[test]
    fn test_propagation_unbounded() {
        let grandparent = define("Base");
        let parent = grandparent.extend(ModelOptions::new("Mid")).unwrap();
        let child = parent
            .extend(ModelOptions::new("Leaf").with_propagation(PropagationDepth::Unbounded))
            .unwrap();
        let instance = child.create();
        assert!(parent.collection().contains(&instance));
        assert!(grandparent.collection().contains(&instance));
    }

    #[test]
    fn test_create_with_defaults_fill_gaps() {
        let factory = ModelFactory::define(
            ModelOptions::new("Item").with_default("qty", 0).with_default("name", "unnamed"),
        )
        .unwrap();
        let instance = factory.create_with(AttributeMap::new().with("qty", 7));
        assert_eq!(instance.get("qty").and_then(|v| v.as_int()), Some(7));
        assert_eq!(
            instance.get("name").and_then(|v| v.into_text()).as_deref(),
            Some("unnamed")
        );
    }

    #[test]
    fn test_excluding_children_with_factory_selector() {
        let parent = define("Item");
        let child = parent.extend(ModelOptions::new("Special")).unwrap();

        parent.create();
        child.create();
        child.create();

        // Parent collection sees all three; excluding the child factory's
        // type leaves the parent's own instance.
        assert_eq!(parent.collection().len(), 3);
        assert_eq!(parent.collection().excluding_children([&child]).len(), 1);
        assert_eq!(parent.collection().own_instances().len(), 1);
    }

    #[test]
    fn test_default_instance_is_first() {
        let factory = define("Item");
        assert!(factory.default_instance().is_none());
        let first = factory.create();
        factory.create();
        assert_eq!(factory.default_instance(), Some(first));
    }
}
