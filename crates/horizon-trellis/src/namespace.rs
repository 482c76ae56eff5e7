//! Namespaces: named registries tying models, views, and collections
//! together.
//!
//! A [`Namespace`] owns a registry of model factories (tag-indexed, with a
//! current-model cursor), one view-constructor slot, an ordered sequence of
//! collection factories, and the [`TemplateContext`] its views render
//! through. Creating a second model factory does not discard the first:
//! both stay addressable by tag, and the newest becomes the default that
//! views and [`all`](Namespace::all) see.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{AttributeMap, AttributeValue};

use crate::error::{ModelError, ViewError};
use crate::model::{
    Collection, CollectionFactory, CollectionOptions, ModelFactory, ModelOptions,
};
use crate::view::{TemplateContext, ViewConstructor, ViewOptions};

new_key_type! {
    /// A stable key for a model factory in a namespace registry.
    pub struct FactoryKey;
}

/// A non-owning handle back to a namespace, carried by factories and view
/// options. Upgrading fails once the namespace is dropped.
#[derive(Clone)]
pub(crate) struct NamespaceRef(Weak<NamespaceInner>);

impl NamespaceRef {
    pub(crate) fn upgrade(&self) -> Option<Namespace> {
        self.0.upgrade().map(|inner| Namespace { inner })
    }
}

#[derive(Default)]
struct Registry {
    models: SlotMap<FactoryKey, ModelFactory>,
    tags: HashMap<String, FactoryKey>,
    current_model: Option<FactoryKey>,
    view: Option<ViewConstructor>,
    collections: Vec<CollectionFactory>,
}

pub(crate) struct NamespaceInner {
    name: String,
    attributes: AttributeMap,
    context: TemplateContext,
    registry: RwLock<Registry>,
}

/// Options for creating a namespace.
#[derive(Debug, Clone)]
pub struct NamespaceOptions {
    name: String,
    attributes: AttributeMap,
    context: Option<TemplateContext>,
}

impl NamespaceOptions {
    /// Creates options with the given namespace name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: AttributeMap::new(),
            context: None,
        }
    }

    /// Sets one free-form attribute on the namespace.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Sets the free-form attributes on the namespace.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Supplies the template context the namespace's views render through.
    /// Defaults to a fresh context with the bundled engine and loader.
    pub fn with_template_context(mut self, context: TemplateContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// A named grouping of model factories, one view constructor, and
/// collection factories, sharing one template context.
///
/// # Example
///
/// ```
/// use horizon_trellis::{ModelOptions, Namespace, NamespaceOptions};
/// use horizon_trellis_core::AttributeMap;
///
/// let ns = Namespace::new(NamespaceOptions::new("shop"));
/// let item = ns.create_model(ModelOptions::new("Item").with_default("qty", 0))?;
///
/// item.create_with(AttributeMap::new().with("name", "Widget"));
/// item.create_with(AttributeMap::new().with("name", "Gadget"));
///
/// assert_eq!(ns.all().unwrap().len(), 2);
/// # Ok::<(), horizon_trellis::error::ModelError>(())
/// ```
#[derive(Clone)]
pub struct Namespace {
    pub(crate) inner: Arc<NamespaceInner>,
}

impl Namespace {
    /// Creates a namespace.
    pub fn new(options: NamespaceOptions) -> Self {
        tracing::debug!(target: targets::NAMESPACE, name = %options.name, "namespace created");
        Self {
            inner: Arc::new(NamespaceInner {
                name: options.name,
                attributes: options.attributes,
                context: options.context.unwrap_or_default(),
                registry: RwLock::new(Registry::default()),
            }),
        }
    }

    /// The namespace's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns one free-form namespace attribute.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.inner.attributes.get(key)
    }

    /// The template context shared by this namespace's views.
    pub fn template_context(&self) -> &TemplateContext {
        &self.inner.context
    }

    pub(crate) fn downgrade(&self) -> NamespaceRef {
        NamespaceRef(Arc::downgrade(&self.inner))
    }

    /// Defines a model factory in this namespace and makes it the current
    /// model.
    ///
    /// The factory registers under its type tag; tags are unique
    /// namespace-wide, so a collision is a configuration error. Earlier
    /// factories stay registered and addressable via
    /// [`model_tagged`](Self::model_tagged).
    pub fn create_model(&self, mut options: ModelOptions) -> Result<ModelFactory, ModelError> {
        options.namespace = Some(self.downgrade());
        let factory = ModelFactory::define(options)?;
        self.make_current(&factory);
        Ok(factory)
    }

    /// The current (most recently created) model factory.
    pub fn model(&self) -> Option<ModelFactory> {
        let registry = self.inner.registry.read();
        registry
            .current_model
            .and_then(|key| registry.models.get(key))
            .cloned()
    }

    /// Looks up a registered model factory by type tag.
    pub fn model_tagged(&self, tag: &str) -> Option<ModelFactory> {
        let registry = self.inner.registry.read();
        registry
            .tags
            .get(tag)
            .and_then(|key| registry.models.get(*key))
            .cloned()
    }

    /// Defines this namespace's view constructor.
    ///
    /// Without an explicit model, the views bind to the current model
    /// factory. The constructor replaces the namespace's view slot and
    /// renders through the namespace's template context.
    pub fn create_view(&self, mut options: ViewOptions) -> Result<ViewConstructor, ViewError> {
        options.namespace = Some(self.downgrade());
        let view = ViewConstructor::define(options, self.inner.context.clone())?;
        self.inner.registry.write().view = Some(view.clone());
        tracing::debug!(
            target: targets::NAMESPACE,
            name = %self.inner.name,
            model = view.model().type_tag(),
            "namespace view constructor set"
        );
        Ok(view)
    }

    /// The namespace's view constructor, once created.
    pub fn view(&self) -> Option<ViewConstructor> {
        self.inner.registry.read().view.clone()
    }

    /// Builds a collection factory, defaulting its model to the current
    /// model factory, and appends it to the namespace's collection
    /// sequence.
    pub fn create_collection(
        &self,
        options: CollectionOptions,
    ) -> Result<CollectionFactory, ModelError> {
        let model = options
            .model
            .or_else(|| self.model())
            .ok_or(ModelError::NoCurrentModel)?;
        let factory = CollectionFactory::new(model, options.attributes);
        self.inner.registry.write().collections.push(factory.clone());
        Ok(factory)
    }

    /// A snapshot of the registered collection factories, in creation
    /// order.
    pub fn collections(&self) -> Vec<CollectionFactory> {
        self.inner.registry.read().collections.clone()
    }

    /// Passthrough to the current model factory's full instance collection.
    pub fn all(&self) -> Option<Collection> {
        self.model().map(|factory| factory.all().clone())
    }

    /// Registers a factory under its tag. Called from factory construction
    /// for every factory whose options carry this namespace, including
    /// children made with `extend`.
    pub(crate) fn register_factory(&self, factory: &ModelFactory) -> Result<(), ModelError> {
        let mut registry = self.inner.registry.write();
        let tag = factory.type_tag();
        if registry.tags.contains_key(tag) {
            return Err(ModelError::DuplicateTypeTag {
                tag: tag.to_string(),
            });
        }
        let key = registry.models.insert(factory.clone());
        registry.tags.insert(tag.to_string(), key);
        tracing::debug!(
            target: targets::NAMESPACE,
            name = %self.inner.name,
            tag,
            "model factory registered"
        );
        Ok(())
    }

    fn make_current(&self, factory: &ModelFactory) {
        let mut registry = self.inner.registry.write();
        if let Some(&key) = registry.tags.get(factory.type_tag()) {
            registry.current_model = Some(key);
        }
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry.read();
        let mut tags: Vec<&str> = registry.tags.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("Namespace")
            .field("name", &self.inner.name)
            .field("models", &tags)
            .field("has_view", &registry.view.is_some())
            .field("collections", &registry.collections.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Namespace: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace() -> Namespace {
        Namespace::new(NamespaceOptions::new("test"))
    }

    #[test]
    fn test_create_model_sets_current() {
        let ns = namespace();
        assert!(ns.model().is_none());
        let item = ns.create_model(ModelOptions::new("Item")).unwrap();
        assert_eq!(ns.model().unwrap().type_tag(), "Item");
        assert_eq!(item.namespace().unwrap().name(), "test");
    }

    #[test]
    fn test_second_create_model_keeps_first_addressable() {
        let ns = namespace();
        ns.create_model(ModelOptions::new("Item")).unwrap();
        ns.create_model(ModelOptions::new("Order")).unwrap();

        // Latest wins as default, but the first is not discarded.
        assert_eq!(ns.model().unwrap().type_tag(), "Order");
        assert!(ns.model_tagged("Item").is_some());
        assert!(ns.model_tagged("Order").is_some());
        assert!(ns.model_tagged("Ghost").is_none());
    }

    #[test]
    fn test_duplicate_tag_across_namespace_rejected() {
        let ns = namespace();
        ns.create_model(ModelOptions::new("Item")).unwrap();
        let err = ns.create_model(ModelOptions::new("Item")).unwrap_err();
        assert_eq!(err, ModelError::DuplicateTypeTag { tag: "Item".to_string() });
    }

    #[test]
    fn test_extended_child_registers_in_namespace() {
        let ns = namespace();
        let item = ns.create_model(ModelOptions::new("Item")).unwrap();
        let special = item.extend(ModelOptions::new("Special")).unwrap();

        // Children register namespace-wide but do not become current.
        assert!(ns.model_tagged("Special").is_some());
        assert_eq!(ns.model().unwrap().type_tag(), "Item");
        assert_eq!(special.namespace().unwrap().name(), "test");

        // A sibling chain cannot reuse the child's tag.
        let order = ns.create_model(ModelOptions::new("Order")).unwrap();
        assert!(order.extend(ModelOptions::new("Special")).is_err());
    }

    #[test]
    fn test_all_passthrough() {
        let ns = namespace();
        assert!(ns.all().is_none());
        let item = ns.create_model(ModelOptions::new("Item")).unwrap();
        item.create();
        item.create();
        assert_eq!(ns.all().unwrap().len(), 2);
    }

    #[test]
    fn test_create_collection_defaults_to_current_model() {
        let ns = namespace();
        assert_eq!(
            ns.create_collection(CollectionOptions::new()).unwrap_err(),
            ModelError::NoCurrentModel
        );

        ns.create_model(ModelOptions::new("Item")).unwrap();
        let factory = ns.create_collection(CollectionOptions::new()).unwrap();
        assert_eq!(factory.model().type_tag(), "Item");
        assert_eq!(ns.collections().len(), 1);

        let collection = factory.create();
        assert_eq!(collection.type_tag(), "Item");
        assert!(collection.is_empty());
    }

    #[test]
    fn test_attributes() {
        let ns = Namespace::new(
            NamespaceOptions::new("shop").with_attribute("owner", "inventory team"),
        );
        assert_eq!(
            ns.attribute("owner").and_then(|v| v.as_text()),
            Some("inventory team")
        );
        assert!(ns.attribute("missing").is_none());
    }

    #[test]
    fn test_create_view_uses_current_model_and_slot() {
        let ns = namespace();
        let item = ns.create_model(ModelOptions::new("Item")).unwrap();
        item.create();

        assert!(ns.view().is_none());
        let view = ns.create_view(ViewOptions::new()).unwrap();
        assert_eq!(view.model().type_tag(), "Item");
        assert!(ns.view().is_some());
        assert_eq!(view.namespace().unwrap().name(), "test");
    }
}
