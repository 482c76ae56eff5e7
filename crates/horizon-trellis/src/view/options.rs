//! View constructor options and framework-wide defaults.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use horizon_trellis_core::{AttributeMap, AttributeValue};

use crate::model::{ModelFactory, ModelInstance};
use crate::namespace::{Namespace, NamespaceRef};
use crate::view::factory::ViewInstance;
use crate::view::template::TemplateStyle;

/// A shareable hook invoked with a view instance.
pub type ViewHook = Arc<dyn Fn(&ViewInstance) + Send + Sync>;

/// A shareable predicate over model instances, used for explicit instance
/// resolution.
pub type InstancePredicate = Arc<dyn Fn(&ModelInstance) -> bool + Send + Sync>;

/// The framework-wide view defaults, merged into every constructor's
/// options without overwriting what the caller supplied.
#[derive(Debug, Clone)]
pub struct ViewDefaults {
    /// Attribute whose value is matched (case-insensitively) against the
    /// element's model attribute during resolution.
    pub instance_filter_key: String,
    /// Tag used when computing the element selector.
    pub element_tag: String,
    /// Attribute naming the view type on bindable elements.
    pub view_attribute: String,
    /// Attribute naming the model instance on bindable elements.
    pub model_attribute: String,
    /// Base selector template nodes are found under.
    pub template_selector: String,
    /// Whether render extracts and binds a template when none is held.
    pub bind_to_template: bool,
    /// Whether the template's source element is detached after extraction.
    pub remove_template: bool,
    /// Delimiter style for template compilation.
    pub template_style: TemplateStyle,
    /// Root directory for template-file loads.
    pub template_directory: PathBuf,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            instance_filter_key: "name".to_string(),
            element_tag: "div".to_string(),
            view_attribute: "data-view".to_string(),
            model_attribute: "data-model".to_string(),
            template_selector: "script[type='text/template']".to_string(),
            bind_to_template: true,
            remove_template: true,
            template_style: TemplateStyle::Default,
            template_directory: PathBuf::from("/templates"),
        }
    }
}

/// Options for building a view constructor.
///
/// Everything is optional: unset fields fall back to [`ViewDefaults`], the
/// model falls back to the namespace's current model factory, and selectors
/// are computed from the model's type tag.
///
/// # Example
///
/// ```
/// use horizon_trellis::view::ViewOptions;
///
/// let options = ViewOptions::new()
///     .with_instance_filter_key("title")
///     .bind_to_template(false)
///     .on_render(|view| {
///         if let Some(output) = view.render_output() {
///             view.element().set_inner_content(&output);
///         }
///     });
/// ```
#[derive(Clone, Default)]
pub struct ViewOptions {
    pub(crate) model: Option<ModelFactory>,
    pub(crate) namespace: Option<NamespaceRef>,
    pub(crate) instance_filter: Option<InstancePredicate>,
    pub(crate) instance_filter_key: Option<String>,
    pub(crate) template_selector: Option<String>,
    pub(crate) template_file: Option<PathBuf>,
    pub(crate) bind_to_template: Option<bool>,
    pub(crate) remove_template: Option<bool>,
    pub(crate) element_tag: Option<String>,
    pub(crate) view_attribute: Option<String>,
    pub(crate) model_attribute: Option<String>,
    pub(crate) template_style: Option<TemplateStyle>,
    pub(crate) template_directory: Option<PathBuf>,
    pub(crate) el: Option<String>,
    pub(crate) attributes: AttributeMap,
    pub(crate) initialize: Option<ViewHook>,
    pub(crate) render: Option<ViewHook>,
}

impl ViewOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the views to a specific model factory.
    pub fn with_model(mut self, model: ModelFactory) -> Self {
        self.model = Some(model);
        self
    }

    /// Associates the views with a namespace; without an explicit model,
    /// the namespace's current model factory is used.
    pub fn with_namespace(mut self, namespace: &Namespace) -> Self {
        self.namespace = Some(namespace.downgrade());
        self
    }

    /// Resolves each view's model instance with an explicit predicate
    /// instead of the element-attribute lookup.
    pub fn with_instance_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ModelInstance) -> bool + Send + Sync + 'static,
    {
        self.instance_filter = Some(Arc::new(predicate));
        self
    }

    /// Sets the attribute matched against the element's model attribute
    /// during resolution (default `"name"`).
    pub fn with_instance_filter_key(mut self, key: impl Into<String>) -> Self {
        self.instance_filter_key = Some(key.into());
        self
    }

    /// Overrides the computed template selector.
    pub fn with_template_selector(mut self, selector: impl Into<String>) -> Self {
        self.template_selector = Some(selector.into());
        self
    }

    /// Loads the template from a file instead of the document.
    pub fn with_template_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.template_file = Some(file.into());
        self
    }

    /// Sets whether render extracts and binds a template when none is held.
    pub fn bind_to_template(mut self, bind: bool) -> Self {
        self.bind_to_template = Some(bind);
        self
    }

    /// Sets whether the template's source element is detached after
    /// extraction.
    pub fn remove_template(mut self, remove: bool) -> Self {
        self.remove_template = Some(remove);
        self
    }

    /// Sets the tag used when computing the element selector.
    pub fn with_element_tag(mut self, tag: impl Into<String>) -> Self {
        self.element_tag = Some(tag.into());
        self
    }

    /// Sets the attribute naming the view type on bindable elements.
    pub fn with_view_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.view_attribute = Some(attribute.into());
        self
    }

    /// Sets the attribute naming the model instance on bindable elements.
    pub fn with_model_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.model_attribute = Some(attribute.into());
        self
    }

    /// Requests a delimiter style; a non-default style is written into the
    /// template context for subsequent compiles.
    pub fn with_template_style(mut self, style: TemplateStyle) -> Self {
        self.template_style = Some(style);
        self
    }

    /// Requests a template-file root; a non-default directory is written
    /// into the template context for subsequent loads.
    pub fn with_template_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.template_directory = Some(directory.into());
        self
    }

    /// Overrides the computed element selector.
    pub fn with_el(mut self, selector: impl Into<String>) -> Self {
        self.el = Some(selector.into());
        self
    }

    /// Sets one free-form attribute on the constructor.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Sets the hook run when a view instance is constructed, before its
    /// model is resolved.
    pub fn on_initialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ViewInstance) + Send + Sync + 'static,
    {
        self.initialize = Some(Arc::new(hook));
        self
    }

    /// Sets the hook run at the end of each render.
    pub fn on_render<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ViewInstance) + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for ViewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewOptions")
            .field("model", &self.model.as_ref().map(|m| m.type_tag().to_string()))
            .field("instance_filter", &self.instance_filter.as_ref().map(|_| ".."))
            .field("instance_filter_key", &self.instance_filter_key)
            .field("template_selector", &self.template_selector)
            .field("template_file", &self.template_file)
            .field("el", &self.el)
            .finish()
    }
}
