//! Template caching, loading, and compilation.
//!
//! Templates reach a view three ways: already held (a file load), extracted
//! from the document by selector, or restored from the [`TemplateCache`].
//! Compilation and file access go through the [`TemplateEngine`] and
//! [`TemplateLoader`] seams; [`SubstitutionEngine`] and [`FsLoader`] are the
//! bundled implementations.
//!
//! All of this state is scoped to a [`TemplateContext`], one per namespace
//! by default. There is no process-global cache or configuration, so two
//! namespaces with different template styles cannot clash.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{AttributeMap, Deferred};

use crate::error::TemplateError;

/// A compiled template: attribute map in, rendered text out.
pub type Renderer = Arc<dyn Fn(&AttributeMap) -> String + Send + Sync>;

/// The result of a template-file load, possibly still in flight.
pub type LoadHandle = Deferred<Result<String, TemplateError>>;

/// Placeholder delimiter style for template compilation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateStyle {
    /// Classic `<%= name %>` interpolation delimiters.
    #[default]
    Default,
    /// `{{ name }}` interpolation delimiters.
    Handlebars,
    /// Caller-supplied delimiters.
    Custom {
        /// Opening delimiter.
        open: String,
        /// Closing delimiter.
        close: String,
    },
}

impl TemplateStyle {
    /// The opening and closing interpolation delimiters.
    pub fn delimiters(&self) -> (&str, &str) {
        match self {
            Self::Default => ("<%=", "%>"),
            Self::Handlebars => ("{{", "}}"),
            Self::Custom { open, close } => (open, close),
        }
    }
}

/// Scoped template configuration: delimiter style and file-lookup root.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateConfig {
    /// Delimiter style handed to the engine at compile time.
    pub style: TemplateStyle,
    /// Directory relative template-file paths resolve against.
    pub directory: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            style: TemplateStyle::Default,
            directory: PathBuf::from("/templates"),
        }
    }
}

/// Maps a selector string to the template text extracted for it.
///
/// A selector maps to at most one cached template for the cache's lifetime:
/// the first successful extraction wins and later writes for the same key
/// are ignored.
#[derive(Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<String, String>>,
}

impl TemplateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a template under a selector key. The first write for a key
    /// wins.
    pub fn cache(&self, selector: &str, template: &str) {
        let mut entries = self.entries.write();
        if entries.contains_key(selector) {
            return;
        }
        tracing::trace!(target: targets::TEMPLATE, selector, "template cached");
        entries.insert(selector.to_string(), template.to_string());
    }

    /// Returns the cached template for a selector key.
    pub fn restore(&self, selector: &str) -> Option<String> {
        let found = self.entries.read().get(selector).cloned();
        tracing::trace!(
            target: targets::TEMPLATE,
            selector,
            hit = found.is_some(),
            "template cache lookup"
        );
        found
    }

    /// Returns `true` if a template is cached for the selector key.
    pub fn contains(&self, selector: &str) -> bool {
        self.entries.read().contains_key(selector)
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCache")
            .field("len", &self.len())
            .finish()
    }
}

/// Compiles template source into a [`Renderer`] for a delimiter style.
pub trait TemplateEngine: Send + Sync {
    /// Compiles `source`, treating text between the style's delimiters as
    /// attribute placeholders.
    fn compile(&self, source: &str, style: &TemplateStyle) -> Result<Renderer, TemplateError>;
}

enum Segment {
    Literal(String),
    Placeholder(String),
}

/// The bundled engine: plain variable interpolation, nothing else.
///
/// `<%= name %>` renders the `name` attribute via its display form; a
/// missing attribute renders as the empty string. Control flow, escaping,
/// and partials are host-engine territory behind the [`TemplateEngine`]
/// seam.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstitutionEngine;

impl TemplateEngine for SubstitutionEngine {
    fn compile(&self, source: &str, style: &TemplateStyle) -> Result<Renderer, TemplateError> {
        let (open, close) = style.delimiters();
        let mut segments = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find(open) {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + open.len()..];
            let end = after_open.find(close).ok_or_else(|| TemplateError::CompileFailed {
                message: format!("unterminated placeholder (missing {close:?})"),
            })?;
            segments.push(Segment::Placeholder(after_open[..end].trim().to_string()));
            rest = &after_open[end + close.len()..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let renderer: Renderer = Arc::new(move |attributes: &AttributeMap| {
            let mut output = String::new();
            for segment in &segments {
                match segment {
                    Segment::Literal(text) => output.push_str(text),
                    Segment::Placeholder(key) => {
                        if let Some(value) = attributes.get(key) {
                            output.push_str(&value.to_string());
                        }
                    }
                }
            }
            output
        });
        Ok(renderer)
    }
}

/// Resolves a template-file path to its text contents.
///
/// Loads are deferred: implementations return a [`LoadHandle`] immediately
/// and resolve it whenever the contents arrive. Render polls the handle and
/// retries on later renders while it is pending.
pub trait TemplateLoader: Send + Sync {
    /// Starts loading the file at `path`.
    fn load(&self, path: &Path) -> LoadHandle;
}

/// A filesystem-backed loader. Resolves the handle before returning.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl TemplateLoader for FsLoader {
    fn load(&self, path: &Path) -> LoadHandle {
        let result = std::fs::read_to_string(path).map_err(|err| TemplateError::LoadFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
        tracing::debug!(
            target: targets::TEMPLATE,
            path = %path.display(),
            ok = result.is_ok(),
            "template file loaded"
        );
        Deferred::ready(result)
    }
}

struct ContextInner {
    cache: TemplateCache,
    config: RwLock<TemplateConfig>,
    engine: Arc<dyn TemplateEngine>,
    loader: Arc<dyn TemplateLoader>,
}

/// Scoped template state: cache + configuration + engine + loader.
///
/// Clones share the same state. A [`Namespace`](crate::Namespace) owns one
/// context and hands it to every view constructor it creates; standalone
/// view constructors take an explicit context.
#[derive(Clone)]
pub struct TemplateContext {
    inner: Arc<ContextInner>,
}

impl TemplateContext {
    /// Creates a context with the bundled engine and loader and default
    /// configuration.
    pub fn new() -> Self {
        Self::with_seams(Arc::new(SubstitutionEngine), Arc::new(FsLoader))
    }

    /// Creates a context around caller-supplied engine and loader
    /// implementations.
    pub fn with_seams(engine: Arc<dyn TemplateEngine>, loader: Arc<dyn TemplateLoader>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                cache: TemplateCache::new(),
                config: RwLock::new(TemplateConfig::default()),
                engine,
                loader,
            }),
        }
    }

    /// The context's template cache.
    pub fn cache(&self) -> &TemplateCache {
        &self.inner.cache
    }

    /// A snapshot of the current configuration.
    pub fn config(&self) -> TemplateConfig {
        self.inner.config.read().clone()
    }

    /// Sets the delimiter style for subsequent compiles. Last writer wins
    /// within this context.
    pub fn set_style(&self, style: TemplateStyle) {
        tracing::debug!(target: targets::TEMPLATE, ?style, "template style changed");
        self.inner.config.write().style = style;
    }

    /// Sets the file-lookup root for subsequent loads. Last writer wins
    /// within this context.
    pub fn set_directory(&self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        tracing::debug!(
            target: targets::TEMPLATE,
            directory = %directory.display(),
            "template directory changed"
        );
        self.inner.config.write().directory = directory;
    }

    /// Compiles source with the context's engine and current style.
    pub fn compile(&self, source: &str) -> Result<Renderer, TemplateError> {
        let style = self.inner.config.read().style.clone();
        self.inner.engine.compile(source, &style)
    }

    /// Starts loading a template file. Relative paths resolve against the
    /// configured directory.
    pub fn load(&self, file: &Path) -> LoadHandle {
        let path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.inner.config.read().directory.join(file)
        };
        self.inner.loader.load(&path)
    }
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TemplateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateContext")
            .field("config", &self.config())
            .field("cached_templates", &self.inner.cache.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(TemplateContext: Send, Sync);
