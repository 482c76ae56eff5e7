//! View constructors and instances.
//!
//! A [`ViewConstructor`] is built once from [`ViewOptions`] plus a
//! [`TemplateContext`]; it holds the resolved option set, the computed
//! element and template selectors, and the (possibly deferred) file
//! template. [`ViewConstructor::load`] stamps out one [`ViewInstance`] per
//! matching element; each instance resolves its model exactly once, at
//! construction, then renders.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{text, AttributeMap, AttributeValue};

use crate::error::ViewError;
use crate::model::{ModelFactory, ModelInstance};
use crate::namespace::{Namespace, NamespaceRef};
use crate::view::dom::{Document, Element};
use crate::view::options::{InstancePredicate, ViewDefaults, ViewHook, ViewOptions};
use crate::view::selector::Selector;
use crate::view::template::{LoadHandle, Renderer, TemplateContext};

struct ResolvedViewOptions {
    instance_filter: Option<InstancePredicate>,
    instance_filter_key: String,
    model_attribute: String,
    template_selector: String,
    template_selector_parsed: Selector,
    bind_to_template: bool,
    remove_template: bool,
    el: String,
    el_parsed: Selector,
    attributes: AttributeMap,
    initialize: Option<ViewHook>,
    render: Option<ViewHook>,
}

/// Where the constructor-level template stands.
enum TemplateSource {
    /// No file template was requested; render may bind one from the
    /// document.
    None,
    /// A file load is in flight.
    Pending(LoadHandle),
    /// The file template arrived.
    Ready(String),
    /// The file load failed; render falls back to document binding.
    Failed,
}

enum TemplateOutcome {
    Ready(String),
    Pending,
    Absent,
}

struct ViewInner {
    model: ModelFactory,
    namespace: Option<NamespaceRef>,
    context: TemplateContext,
    options: ResolvedViewOptions,
    source: RwLock<TemplateSource>,
}

/// A view "class": resolved options, computed selectors, and the model
/// factory its instances resolve against.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_trellis::model::{ModelFactory, ModelOptions};
/// use horizon_trellis::view::{
///     Document, MemoryDocument, MemoryElement, TemplateContext, ViewConstructor, ViewOptions,
/// };
/// use horizon_trellis_core::AttributeMap;
///
/// let item = ModelFactory::define(ModelOptions::new("Item"))?;
/// item.create_with(AttributeMap::new().with("name", "gadget"));
///
/// let views = ViewConstructor::define(
///     ViewOptions::new().with_model(item.clone()),
///     TemplateContext::new(),
/// )?;
///
/// let doc = Arc::new(MemoryDocument::new());
/// doc.insert(
///     MemoryElement::new("div")
///         .with_attribute("data-view", "Item")
///         .with_attribute("data-model", "Gadget"),
/// );
///
/// let document: Arc<dyn Document> = doc;
/// let bound = views.load(&document);
/// assert_eq!(bound.len(), 1);
/// // "Gadget" matched the instance's name case-insensitively.
/// assert!(bound[0].model().is_some());
/// # Ok::<(), horizon_trellis::TrellisError>(())
/// ```
#[derive(Clone)]
pub struct ViewConstructor {
    inner: Arc<ViewInner>,
}

impl ViewConstructor {
    /// Builds a view constructor from options.
    ///
    /// Defaulting order: an explicit model wins, else the namespace's
    /// current model factory; the template selector derives from the model
    /// type when unset; [`ViewDefaults`] fill the rest without overwriting
    /// caller options; the element selector derives last. A non-default
    /// template style or directory is written into `context` for subsequent
    /// loads in that context.
    pub fn define(options: ViewOptions, context: TemplateContext) -> Result<ViewConstructor, ViewError> {
        let defaults = ViewDefaults::default();
        let ViewOptions {
            model,
            namespace,
            instance_filter,
            instance_filter_key,
            template_selector,
            template_file,
            bind_to_template,
            remove_template,
            element_tag,
            view_attribute,
            model_attribute,
            template_style,
            template_directory,
            el,
            attributes,
            initialize,
            render,
        } = options;

        let model = model
            .or_else(|| {
                namespace
                    .as_ref()
                    .and_then(NamespaceRef::upgrade)
                    .and_then(|namespace| namespace.model())
            })
            .ok_or(ViewError::NoModelFactory)?;

        let element_tag = element_tag.unwrap_or(defaults.element_tag);
        let view_attribute = view_attribute.unwrap_or(defaults.view_attribute);
        let model_attribute = model_attribute.unwrap_or(defaults.model_attribute);
        let instance_filter_key = instance_filter_key.unwrap_or(defaults.instance_filter_key);
        let bind_to_template = bind_to_template.unwrap_or(defaults.bind_to_template);
        let remove_template = remove_template.unwrap_or(defaults.remove_template);

        let template_selector = template_selector.unwrap_or_else(|| {
            format!(
                "{}[{}='{}']",
                defaults.template_selector,
                view_attribute,
                model.type_tag()
            )
        });
        let template_selector_parsed = Selector::parse(&template_selector)?;

        let el = el.unwrap_or_else(|| {
            format!("{}[{}='{}']", element_tag, view_attribute, model.type_tag())
        });
        let el_parsed = Selector::parse(&el)?;

        if let Some(style) = template_style {
            if style != defaults.template_style {
                context.set_style(style);
            }
        }
        if let Some(directory) = template_directory {
            if directory != defaults.template_directory {
                context.set_directory(directory);
            }
        }

        let source = match &template_file {
            Some(file) => TemplateSource::Pending(context.load(file)),
            None => TemplateSource::None,
        };

        tracing::debug!(
            target: targets::VIEW,
            model = model.type_tag(),
            el = %el,
            template_selector = %template_selector,
            "view constructor defined"
        );

        Ok(ViewConstructor {
            inner: Arc::new(ViewInner {
                model,
                namespace,
                context,
                options: ResolvedViewOptions {
                    instance_filter,
                    instance_filter_key,
                    model_attribute,
                    template_selector,
                    template_selector_parsed,
                    bind_to_template,
                    remove_template,
                    el,
                    el_parsed,
                    attributes,
                    initialize,
                    render,
                },
                source: RwLock::new(source),
            }),
        })
    }

    /// The model factory views resolve their instances against.
    pub fn model(&self) -> &ModelFactory {
        &self.inner.model
    }

    /// The namespace this constructor was created through, if any.
    pub fn namespace(&self) -> Option<Namespace> {
        self.inner.namespace.as_ref().and_then(NamespaceRef::upgrade)
    }

    /// The computed element selector.
    pub fn el(&self) -> &str {
        &self.inner.options.el
    }

    /// The computed template selector (also the cache key).
    pub fn template_selector(&self) -> &str {
        &self.inner.options.template_selector
    }

    /// The template context this constructor renders through.
    pub fn context(&self) -> &TemplateContext {
        &self.inner.context
    }

    /// Returns one free-form constructor attribute.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.inner.options.attributes.get(key)
    }

    /// Binds one view per element currently matching the computed element
    /// selector, in document order.
    pub fn load(&self, document: &Arc<dyn Document>) -> Vec<ViewInstance> {
        let elements = document.select(&self.inner.options.el_parsed);
        tracing::debug!(
            target: targets::VIEW,
            selector = %self.inner.options.el,
            count = elements.len(),
            "loading views"
        );
        elements
            .into_iter()
            .map(|element| self.bind(Arc::clone(document), element))
            .collect()
    }

    /// Binds one view per given element.
    pub fn load_elements<I>(&self, document: &Arc<dyn Document>, elements: I) -> Vec<ViewInstance>
    where
        I: IntoIterator<Item = Arc<dyn Element>>,
    {
        elements
            .into_iter()
            .map(|element| self.bind(Arc::clone(document), element))
            .collect()
    }

    /// Binds a single view to an element: runs the initialize hook,
    /// resolves the model instance (exactly once), and renders.
    pub fn bind(&self, document: Arc<dyn Document>, element: Arc<dyn Element>) -> ViewInstance {
        let _span = tracing::trace_span!(
            "horizon_trellis::bind_view",
            model = self.inner.model.type_tag()
        )
        .entered();

        let view = ViewInstance {
            constructor: self.clone(),
            document,
            element,
            model: OnceLock::new(),
            template: RwLock::new(None),
            renderer: RwLock::new(None),
        };

        if let Some(hook) = &self.inner.options.initialize {
            hook(&view);
        }

        let resolved = self.resolve_model(view.element.as_ref());
        let _ = view.model.set(resolved);

        view.render();
        view
    }

    /// Resolves which model instance an element represents.
    ///
    /// With an instance filter, the first satisfying instance wins. Without
    /// one, the element's model attribute (or same-named data value) is
    /// matched case-insensitively against the configured filter key; an
    /// element naming no model falls back to the factory's default
    /// instance. Every miss is an explicit `None`.
    fn resolve_model(&self, element: &dyn Element) -> Option<ModelInstance> {
        let options = &self.inner.options;
        let collection = self.inner.model.collection();

        if let Some(filter) = &options.instance_filter {
            let found = collection.find(|instance| filter(instance));
            if found.is_none() {
                tracing::warn!(
                    target: targets::VIEW,
                    model = self.inner.model.type_tag(),
                    "instance filter matched no model instance"
                );
            }
            return found;
        }

        let reference = element.attribute(&options.model_attribute).or_else(|| {
            text::data_key(&options.model_attribute).and_then(|key| element.data(key))
        });

        match reference {
            Some(reference) => {
                let key = options.instance_filter_key.as_str();
                let found = collection.find(|instance| {
                    instance.with_attributes(|attributes| {
                        attributes
                            .get_text(key)
                            .is_some_and(|value| text::eq_ignore_case(value, &reference))
                    })
                });
                if found.is_none() {
                    tracing::warn!(
                        target: targets::VIEW,
                        model = self.inner.model.type_tag(),
                        %reference,
                        filter_key = key,
                        "no model instance matched element reference"
                    );
                }
                found
            }
            None => {
                let fallback = self.inner.model.default_instance();
                if fallback.is_none() {
                    tracing::warn!(
                        target: targets::VIEW,
                        model = self.inner.model.type_tag(),
                        "element names no model and the factory has no instances"
                    );
                } else {
                    tracing::trace!(
                        target: targets::VIEW,
                        model = self.inner.model.type_tag(),
                        "element names no model; resolved to the factory's default instance"
                    );
                }
                fallback
            }
        }
    }

    /// Produces the template for an instance's render: file template first
    /// (polling a pending load), then cache, then document extraction.
    fn acquire_template(&self, document: &Arc<dyn Document>) -> TemplateOutcome {
        let options = &self.inner.options;

        {
            let mut source = self.inner.source.write();
            let polled = match &*source {
                TemplateSource::Ready(body) => return TemplateOutcome::Ready(body.clone()),
                TemplateSource::Pending(handle) => Some(handle.poll()),
                TemplateSource::Failed | TemplateSource::None => None,
            };
            match polled {
                Some(None) => {
                    tracing::trace!(
                        target: targets::TEMPLATE,
                        "template load still pending; compilation deferred"
                    );
                    return TemplateOutcome::Pending;
                }
                Some(Some(Ok(body))) => {
                    *source = TemplateSource::Ready(body.clone());
                    return TemplateOutcome::Ready(body);
                }
                Some(Some(Err(error))) => {
                    tracing::warn!(
                        target: targets::TEMPLATE,
                        %error,
                        "template load failed; falling back to document binding"
                    );
                    *source = TemplateSource::Failed;
                }
                None => {}
            }
        }

        if !options.bind_to_template {
            return TemplateOutcome::Absent;
        }

        let cache = self.inner.context.cache();
        if let Some(cached) = cache.restore(&options.template_selector) {
            return TemplateOutcome::Ready(cached);
        }

        match document
            .select(&options.template_selector_parsed)
            .into_iter()
            .next()
        {
            Some(node) => {
                let body = node.inner_content();
                cache.cache(&options.template_selector, &body);
                if options.remove_template {
                    node.detach();
                    tracing::trace!(
                        target: targets::TEMPLATE,
                        selector = %options.template_selector,
                        "template source element detached"
                    );
                }
                TemplateOutcome::Ready(body)
            }
            None => {
                tracing::debug!(
                    target: targets::TEMPLATE,
                    selector = %options.template_selector,
                    "no template element matched"
                );
                TemplateOutcome::Absent
            }
        }
    }
}

impl fmt::Debug for ViewConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConstructor")
            .field("model", &self.inner.model.type_tag())
            .field("el", &self.inner.options.el)
            .field("template_selector", &self.inner.options.template_selector)
            .finish()
    }
}

static_assertions::assert_impl_all!(ViewConstructor: Send, Sync);

/// One bound view: an element, an immutable model resolution, and the
/// template machinery for rendering.
pub struct ViewInstance {
    constructor: ViewConstructor,
    document: Arc<dyn Document>,
    element: Arc<dyn Element>,
    model: OnceLock<Option<ModelInstance>>,
    template: RwLock<Option<String>>,
    renderer: RwLock<Option<Renderer>>,
}

impl ViewInstance {
    /// The constructor this view was stamped from.
    pub fn constructor(&self) -> &ViewConstructor {
        &self.constructor
    }

    /// The bound element.
    pub fn element(&self) -> &Arc<dyn Element> {
        &self.element
    }

    /// The model instance this view resolved to, if any.
    ///
    /// Resolution happens exactly once, during binding; this never changes
    /// afterwards. `None` means resolution missed (already logged).
    pub fn model(&self) -> Option<ModelInstance> {
        self.model.get().cloned().flatten()
    }

    /// The template text this view holds, once acquired.
    pub fn template(&self) -> Option<String> {
        self.template.read().clone()
    }

    /// The compiled renderer, once compilation has succeeded.
    pub fn renderer(&self) -> Option<Renderer> {
        self.renderer.read().clone()
    }

    /// Renders the view. Chainable.
    ///
    /// Acquires a template when none is held (file load, cache, or document
    /// extraction), compiles it, then runs the caller's render hook. A
    /// still-pending file load skips compilation for this render; the next
    /// render retries.
    pub fn render(&self) -> &Self {
        let _span = tracing::trace_span!(
            "horizon_trellis::render",
            model = self.constructor.inner.model.type_tag()
        )
        .entered();

        if self.template.read().is_none() {
            match self.constructor.acquire_template(&self.document) {
                TemplateOutcome::Ready(body) => *self.template.write() = Some(body),
                TemplateOutcome::Pending | TemplateOutcome::Absent => {}
            }
        }

        let template = self.template.read().clone();
        if let Some(source) = template {
            if self.renderer.read().is_none() {
                match self.constructor.inner.context.compile(&source) {
                    Ok(renderer) => *self.renderer.write() = Some(renderer),
                    Err(error) => {
                        tracing::warn!(
                            target: targets::TEMPLATE,
                            %error,
                            "template compilation failed"
                        );
                    }
                }
            }
        }

        if let Some(hook) = &self.constructor.inner.options.render {
            hook(self);
        }
        self
    }

    /// Runs the compiled renderer over the resolved model's attributes.
    ///
    /// Returns `None` until a renderer exists. An unresolved model renders
    /// with an empty attribute map.
    pub fn render_output(&self) -> Option<String> {
        let renderer = self.renderer.read().clone()?;
        let attributes = self
            .model()
            .map(|instance| instance.attributes())
            .unwrap_or_default();
        Some(renderer(&attributes))
    }
}

impl fmt::Debug for ViewInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewInstance")
            .field("model", &self.model().map(|m| m.id()))
            .field("element", &self.element.tag())
            .field("has_template", &self.template.read().is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(ViewInstance: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::model::ModelOptions;
    use crate::view::dom::{MemoryDocument, MemoryElement};
    use crate::view::template::{TemplateLoader, TemplateStyle};

    fn item_factory() -> ModelFactory {
        ModelFactory::define(ModelOptions::new("Item")).unwrap()
    }

    fn named(factory: &ModelFactory, name: &str) -> ModelInstance {
        factory.create_with(AttributeMap::new().with("name", name))
    }

    fn memory_doc() -> (Arc<MemoryDocument>, Arc<dyn Document>) {
        let doc = Arc::new(MemoryDocument::new());
        let document: Arc<dyn Document> = doc.clone();
        (doc, document)
    }

    /// A loader whose handles resolve only when the test says so.
    struct ManualLoader {
        handle: LoadHandle,
    }

    impl TemplateLoader for ManualLoader {
        fn load(&self, _path: &Path) -> LoadHandle {
            self.handle.clone()
        }
    }

    #[test]
    fn test_computed_selectors() {
        let views =
            ViewConstructor::define(ViewOptions::new().with_model(item_factory()), TemplateContext::new())
                .unwrap();
        assert_eq!(views.el(), "div[data-view='Item']");
        assert_eq!(
            views.template_selector(),
            "script[type='text/template'][data-view='Item']"
        );
    }

    #[test]
    fn test_define_without_model_fails() {
        let err = ViewConstructor::define(ViewOptions::new(), TemplateContext::new()).unwrap_err();
        assert!(matches!(err, ViewError::NoModelFactory));
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        let factory = item_factory();
        named(&factory, "FOO");
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory.clone()),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(
            MemoryElement::new("div")
                .with_attribute("data-view", "Item")
                .with_attribute("data-model", "foo"),
        );

        let bound = views.load(&document);
        assert_eq!(bound.len(), 1);
        let model = bound[0].model().unwrap();
        assert_eq!(model.get("name").and_then(|v| v.into_text()).as_deref(), Some("FOO"));
    }

    #[test]
    fn test_resolution_unmatched_reference_is_none() {
        let factory = item_factory();
        named(&factory, "foo");
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(
            MemoryElement::new("div")
                .with_attribute("data-view", "Item")
                .with_attribute("data-model", "stranger"),
        );

        let bound = views.load(&document);
        assert!(bound[0].model().is_none());
    }

    #[test]
    fn test_resolution_fallback_to_default_instance() {
        let factory = item_factory();
        let first = named(&factory, "first");
        named(&factory, "second");
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        let bound = views.load(&document);
        assert_eq!(bound[0].model(), Some(first));
    }

    #[test]
    fn test_resolution_fallback_with_empty_collection_is_none() {
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(item_factory()),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        let bound = views.load(&document);
        assert!(bound[0].model().is_none());
    }

    #[test]
    fn test_instance_filter_takes_precedence() {
        let factory = item_factory();
        named(&factory, "plain");
        let wanted = factory.create_with(AttributeMap::new().with("name", "wanted").with("starred", true));

        let views = ViewConstructor::define(
            ViewOptions::new()
                .with_model(factory)
                .with_instance_filter(|instance| {
                    instance.get("starred").and_then(|v| v.as_bool()).unwrap_or(false)
                }),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        // The attribute names "plain", but the filter wins.
        doc.insert(
            MemoryElement::new("div")
                .with_attribute("data-view", "Item")
                .with_attribute("data-model", "plain"),
        );

        let bound = views.load(&document);
        assert_eq!(bound[0].model(), Some(wanted));
    }

    #[test]
    fn test_template_extracted_cached_and_source_removed() {
        let factory = item_factory();
        named(&factory, "gadget");
        let context = TemplateContext::new();
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory),
            context.clone(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(
            MemoryElement::new("script")
                .with_attribute("type", "text/template")
                .with_attribute("data-view", "Item")
                .with_content("Hello <%= name %>"),
        );
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        let bound = views.load(&document);
        assert_eq!(bound.len(), 2);
        for view in &bound {
            assert_eq!(view.template().as_deref(), Some("Hello <%= name %>"));
            assert_eq!(view.render_output().as_deref(), Some("Hello gadget"));
        }

        // One extraction: the source element is gone, the cache holds it.
        assert!(context.cache().contains(views.template_selector()));
        let selector = Selector::parse("script[type='text/template']").unwrap();
        assert!(document.select(&selector).is_empty());
    }

    #[test]
    fn test_remove_template_false_keeps_source() {
        let factory = item_factory();
        named(&factory, "gadget");
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory).remove_template(false),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(
            MemoryElement::new("script")
                .with_attribute("type", "text/template")
                .with_attribute("data-view", "Item")
                .with_content("body"),
        );
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        views.load(&document);
        let selector = Selector::parse("script[type='text/template']").unwrap();
        assert_eq!(document.select(&selector).len(), 1);
    }

    #[test]
    fn test_bind_to_template_false_skips_extraction() {
        let factory = item_factory();
        named(&factory, "gadget");
        let context = TemplateContext::new();
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory).bind_to_template(false),
            context.clone(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(
            MemoryElement::new("script")
                .with_attribute("type", "text/template")
                .with_attribute("data-view", "Item")
                .with_content("body"),
        );
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        let bound = views.load(&document);
        assert!(bound[0].template().is_none());
        assert!(context.cache().is_empty());
    }

    #[test]
    fn test_missing_template_leaves_view_unbound() {
        let factory = item_factory();
        named(&factory, "gadget");
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        let bound = views.load(&document);
        assert!(bound[0].template().is_none());
        assert!(bound[0].render_output().is_none());
    }

    #[test]
    fn test_pending_file_load_defers_compilation() {
        let factory = item_factory();
        named(&factory, "gadget");

        let handle: LoadHandle = LoadHandle::pending();
        let context = TemplateContext::with_seams(
            Arc::new(crate::view::template::SubstitutionEngine),
            Arc::new(ManualLoader {
                handle: handle.clone(),
            }),
        );

        let views = ViewConstructor::define(
            ViewOptions::new()
                .with_model(factory)
                .with_template_file("item.tmpl"),
            context,
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        let bound = views.load(&document);
        let view = &bound[0];
        // The load is still in flight: no template, no renderer.
        assert!(view.template().is_none());
        assert!(view.render_output().is_none());

        handle.resolve(Ok("Loaded <%= name %>".to_string()));
        view.render();
        assert_eq!(view.render_output().as_deref(), Some("Loaded gadget"));
    }

    #[test]
    fn test_failed_file_load_falls_back_to_document() {
        let factory = item_factory();
        named(&factory, "gadget");

        let handle: LoadHandle = LoadHandle::ready(Err(crate::error::TemplateError::LoadFailed {
            path: "item.tmpl".into(),
            message: "gone".to_string(),
        }));
        let context = TemplateContext::with_seams(
            Arc::new(crate::view::template::SubstitutionEngine),
            Arc::new(ManualLoader { handle }),
        );

        let views = ViewConstructor::define(
            ViewOptions::new()
                .with_model(factory)
                .with_template_file("item.tmpl"),
            context,
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(
            MemoryElement::new("script")
                .with_attribute("type", "text/template")
                .with_attribute("data-view", "Item")
                .with_content("from document"),
        );
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));

        let bound = views.load(&document);
        assert_eq!(bound[0].template().as_deref(), Some("from document"));
    }

    #[test]
    fn test_non_default_style_written_to_context() {
        let context = TemplateContext::new();
        let _ = ViewConstructor::define(
            ViewOptions::new()
                .with_model(item_factory())
                .with_template_style(TemplateStyle::Handlebars),
            context.clone(),
        )
        .unwrap();
        assert_eq!(context.config().style, TemplateStyle::Handlebars);
    }

    #[test]
    fn test_hooks_run_in_order() {
        use parking_lot::Mutex;
        let log = Arc::new(Mutex::new(Vec::new()));

        let factory = item_factory();
        named(&factory, "gadget");

        let init_log = log.clone();
        let render_log = log.clone();
        let views = ViewConstructor::define(
            ViewOptions::new()
                .with_model(factory)
                .on_initialize(move |view| {
                    // Runs before resolution.
                    init_log.lock().push(("initialize", view.model().is_some()));
                })
                .on_render(move |view| {
                    render_log.lock().push(("render", view.model().is_some()));
                }),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        doc.insert(MemoryElement::new("div").with_attribute("data-view", "Item"));
        views.load(&document);

        let events = log.lock();
        assert_eq!(events.as_slice(), &[("initialize", false), ("render", true)]);
    }

    #[test]
    fn test_load_elements_explicit() {
        let factory = item_factory();
        named(&factory, "gadget");
        let views = ViewConstructor::define(
            ViewOptions::new().with_model(factory),
            TemplateContext::new(),
        )
        .unwrap();

        let (doc, document) = memory_doc();
        let element = doc.insert(MemoryElement::new("section"));
        let bound = views.load_elements(&document, [element as Arc<dyn Element>]);
        assert_eq!(bound.len(), 1);
        assert!(bound[0].model().is_some());
    }
}
