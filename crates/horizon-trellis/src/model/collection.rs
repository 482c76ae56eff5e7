//! Instance collections with type-aware filtering.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::AttributeMap;

use crate::model::factory::ModelFactory;
use crate::model::instance::ModelInstance;

/// Selects a model type for collection filtering, by literal tag or by
/// factory reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSelector {
    tag: String,
}

impl TypeSelector {
    /// The selected type tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl From<&str> for TypeSelector {
    fn from(tag: &str) -> Self {
        Self { tag: tag.to_string() }
    }
}

impl From<String> for TypeSelector {
    fn from(tag: String) -> Self {
        Self { tag }
    }
}

impl From<&ModelFactory> for TypeSelector {
    fn from(factory: &ModelFactory) -> Self {
        Self {
            tag: factory.type_tag().to_string(),
        }
    }
}

struct CollectionInner {
    type_tag: String,
    items: RwLock<Vec<ModelInstance>>,
}

/// An ordered sequence of model instances belonging to one factory.
///
/// Insertion order is creation order. Collections are shared handles; the
/// filtering methods return snapshots or new collections and never mutate
/// the original.
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

impl Collection {
    pub(crate) fn new(type_tag: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                type_tag: type_tag.into(),
                items: RwLock::new(Vec::new()),
            }),
        }
    }

    /// The type tag of the owning factory.
    pub fn type_tag(&self) -> &str {
        &self.inner.type_tag
    }

    /// Appends an instance.
    pub fn push(&self, instance: ModelInstance) {
        tracing::trace!(
            target: targets::COLLECTION,
            collection = %self.inner.type_tag,
            instance = %instance.id(),
            instance_type = instance.type_tag(),
            "instance added to collection"
        );
        self.inner.items.write().push(instance);
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    /// Returns `true` if the collection holds no instances.
    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// Returns the instance at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Option<ModelInstance> {
        self.inner.items.read().get(index).cloned()
    }

    /// Returns the first instance, in insertion order.
    pub fn first(&self) -> Option<ModelInstance> {
        self.get(0)
    }

    /// Returns `true` if the instance is a member (by id).
    pub fn contains(&self, instance: &ModelInstance) -> bool {
        self.inner.items.read().iter().any(|item| item == instance)
    }

    /// Returns a snapshot of the instances in insertion order.
    pub fn to_vec(&self) -> Vec<ModelInstance> {
        self.inner.items.read().clone()
    }

    /// Returns the first instance satisfying the predicate.
    pub fn find<F>(&self, predicate: F) -> Option<ModelInstance>
    where
        F: Fn(&ModelInstance) -> bool,
    {
        self.inner.items.read().iter().find(|item| predicate(item)).cloned()
    }

    /// Returns all instances satisfying the predicate, in insertion order.
    pub fn filter<F>(&self, predicate: F) -> Vec<ModelInstance>
    where
        F: Fn(&ModelInstance) -> bool,
    {
        self.inner
            .items
            .read()
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Returns all instances *not* satisfying the predicate, in insertion
    /// order.
    pub fn reject<F>(&self, predicate: F) -> Vec<ModelInstance>
    where
        F: Fn(&ModelInstance) -> bool,
    {
        self.filter(|item| !predicate(item))
    }

    /// Returns a new, independent collection without subclass instances.
    ///
    /// With no selectors, keeps only instances whose type tag equals this
    /// collection's own tag exactly (excluding every subclass). With
    /// selectors, keeps every instance whose type tag is not in the given
    /// set; each selector is a factory (read as its tag) or a literal tag.
    ///
    /// The underlying collection is not mutated.
    pub fn excluding_children<I>(&self, selectors: I) -> Collection
    where
        I: IntoIterator,
        I::Item: Into<TypeSelector>,
    {
        let excluded: Vec<String> = selectors
            .into_iter()
            .map(|selector| {
                let selector: TypeSelector = selector.into();
                selector.tag
            })
            .collect();

        let survivors = if excluded.is_empty() {
            self.filter(|item| item.type_tag() == self.inner.type_tag)
        } else {
            self.reject(|item| excluded.iter().any(|tag| tag == item.type_tag()))
        };

        let filtered = Collection::new(self.inner.type_tag.clone());
        *filtered.inner.items.write() = survivors;
        filtered
    }

    /// Shorthand for [`excluding_children`](Self::excluding_children) with
    /// no selectors: only instances of this collection's own type.
    pub fn own_instances(&self) -> Collection {
        self.excluding_children::<[&str; 0]>([])
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("type_tag", &self.inner.type_tag)
            .field("len", &self.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Collection: Send, Sync);

/// Options for building a collection factory.
#[derive(Debug, Clone, Default)]
pub struct CollectionOptions {
    pub(crate) model: Option<ModelFactory>,
    pub(crate) attributes: AttributeMap,
}

impl CollectionOptions {
    /// Creates empty options. The model defaults to the namespace's current
    /// model factory at creation time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model factory the collections are bound to.
    pub fn with_model(mut self, model: ModelFactory) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets one free-form attribute on the factory.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<horizon_trellis_core::AttributeValue>,
    ) -> Self {
        self.attributes.insert(key, value);
        self
    }
}

struct CollectionFactoryInner {
    model: ModelFactory,
    attributes: AttributeMap,
}

/// Builds empty collections bound to one model factory's type.
///
/// Produced by [`Namespace::create_collection`](crate::Namespace::create_collection),
/// which also records the factory in the namespace's collection sequence.
#[derive(Clone)]
pub struct CollectionFactory {
    inner: Arc<CollectionFactoryInner>,
}

impl CollectionFactory {
    pub(crate) fn new(model: ModelFactory, attributes: AttributeMap) -> Self {
        Self {
            inner: Arc::new(CollectionFactoryInner { model, attributes }),
        }
    }

    /// The model factory the collections are bound to.
    pub fn model(&self) -> &ModelFactory {
        &self.inner.model
    }

    /// Free-form attributes supplied at creation.
    pub fn attributes(&self) -> &AttributeMap {
        &self.inner.attributes
    }

    /// Creates a new, empty collection tagged with the model's type.
    pub fn create(&self) -> Collection {
        Collection::new(self.inner.model.type_tag())
    }
}

impl fmt::Debug for CollectionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionFactory")
            .field("model", &self.inner.model.type_tag())
            .finish()
    }
}
