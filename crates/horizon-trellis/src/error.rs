//! Error types for Horizon Trellis.
//!
//! Resolution misses (no matching model instance, no template node) are not
//! errors; they surface as `Option` values at the call site. The types here
//! cover configuration mistakes and seam failures that callers should be
//! able to detect and branch on.

use std::fmt;
use std::path::PathBuf;

/// The main error type for Horizon Trellis operations.
#[derive(Debug)]
pub enum TrellisError {
    /// Model-factory configuration error.
    Model(ModelError),
    /// View-constructor configuration error.
    View(ViewError),
    /// Template loading or compilation error.
    Template(TemplateError),
    /// Selector parse error.
    Selector(SelectorError),
}

impl fmt::Display for TrellisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(err) => write!(f, "Model error: {err}"),
            Self::View(err) => write!(f, "View error: {err}"),
            Self::Template(err) => write!(f, "Template error: {err}"),
            Self::Selector(err) => write!(f, "Selector error: {err}"),
        }
    }
}

impl std::error::Error for TrellisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::View(err) => Some(err),
            Self::Template(err) => Some(err),
            Self::Selector(err) => Some(err),
        }
    }
}

/// Errors raised while building model factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A factory was defined with an empty type tag.
    EmptyTypeTag,
    /// Two factories claimed the same type tag within one namespace or
    /// extension chain.
    DuplicateTypeTag {
        /// The contested tag.
        tag: String,
    },
    /// An operation needed a current model factory, but the namespace has
    /// none yet.
    NoCurrentModel,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTypeTag => write!(f, "Model factories require a non-empty type tag"),
            Self::DuplicateTypeTag { tag } => {
                write!(f, "Type tag {tag:?} is already registered")
            }
            Self::NoCurrentModel => {
                write!(f, "Namespace has no model factory yet. Call create_model() first")
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Errors raised while building view constructors.
#[derive(Debug)]
pub enum ViewError {
    /// Neither an explicit model factory nor a namespace with a current
    /// model was available.
    NoModelFactory,
    /// A computed or supplied selector failed to parse.
    Selector(SelectorError),
    /// Template loading or compilation failed during view construction.
    Template(TemplateError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoModelFactory => {
                write!(f, "View options carry no model factory and no namespace provides one")
            }
            Self::Selector(err) => write!(f, "Selector error: {err}"),
            Self::Template(err) => write!(f, "Template error: {err}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Selector(err) => Some(err),
            Self::Template(err) => Some(err),
            Self::NoModelFactory => None,
        }
    }
}

/// Errors raised by the template loading and compilation seams.
///
/// Clonable so a deferred load can hand its outcome to every poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The loader could not produce the file's contents.
    LoadFailed {
        /// The path handed to the loader.
        path: PathBuf,
        /// Loader-specific failure description.
        message: String,
    },
    /// The engine rejected the template source.
    CompileFailed {
        /// Engine-specific failure description.
        message: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed { path, message } => {
                write!(f, "Failed to load template {}: {message}", path.display())
            }
            Self::CompileFailed { message } => {
                write!(f, "Failed to compile template: {message}")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Errors raised when parsing element selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector string was empty.
    Empty,
    /// The selector did not match the `tag[attr='value']` grammar.
    Malformed {
        /// The offending selector string.
        selector: String,
    },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Selector is empty"),
            Self::Malformed { selector } => {
                write!(f, "Selector {selector:?} does not match tag[attr='value'] grammar")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

impl From<ModelError> for TrellisError {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<ViewError> for TrellisError {
    fn from(err: ViewError) -> Self {
        Self::View(err)
    }
}

impl From<TemplateError> for TrellisError {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

impl From<SelectorError> for TrellisError {
    fn from(err: SelectorError) -> Self {
        Self::Selector(err)
    }
}

impl From<SelectorError> for ViewError {
    fn from(err: SelectorError) -> Self {
        Self::Selector(err)
    }
}

impl From<TemplateError> for ViewError {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

/// A specialized Result type for Horizon Trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;
