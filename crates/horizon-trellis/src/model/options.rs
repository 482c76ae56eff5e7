//! Model factory options.

use std::fmt;
use std::sync::Arc;

use horizon_trellis_core::{AttributeMap, AttributeValue};

use crate::model::instance::ModelInstance;
use crate::namespace::NamespaceRef;

/// A shareable lifecycle hook invoked with each newly created instance.
pub type InitializeHook = Arc<dyn Fn(&ModelInstance) + Send + Sync>;

/// How far up the factory chain new instances propagate into ancestor
/// collections.
///
/// The classic behavior is one level (the immediate parent); `None` and
/// `Unbounded` make the historically implicit depth an explicit choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationDepth {
    /// Instances join only their own factory's collection.
    None,
    /// Instances additionally join ancestor collections up to this many
    /// levels (1 = immediate parent).
    Levels(usize),
    /// Instances join every ancestor collection.
    Unbounded,
}

impl PropagationDepth {
    /// Returns `true` if an ancestor `level` steps up the chain should
    /// receive the instance (level 1 is the immediate parent).
    pub fn allows(&self, level: usize) -> bool {
        match self {
            Self::None => false,
            Self::Levels(max) => level <= *max,
            Self::Unbounded => true,
        }
    }
}

impl Default for PropagationDepth {
    fn default() -> Self {
        Self::Levels(1)
    }
}

/// Options for defining a model factory.
///
/// Apart from the type tag, everything is optional. Options left unset on a
/// child factory are inherited from its parent's resolved options when the
/// factory is built with [`ModelFactory::extend`](crate::model::ModelFactory::extend).
///
/// # Example
///
/// ```
/// use horizon_trellis::model::ModelOptions;
///
/// let options = ModelOptions::new("Item")
///     .with_default("qty", 0)
///     .with_attribute("category", "inventory")
///     .on_initialize(|instance| {
///         instance.set_if_undefined("name", "unnamed");
///     });
/// ```
#[derive(Clone, Default)]
pub struct ModelOptions {
    pub(crate) type_tag: String,
    pub(crate) defaults: AttributeMap,
    pub(crate) attributes: AttributeMap,
    pub(crate) initialize: Option<InitializeHook>,
    pub(crate) propagation: Option<PropagationDepth>,
    pub(crate) namespace: Option<NamespaceRef>,
}

impl ModelOptions {
    /// Creates options with the given type tag.
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            ..Self::default()
        }
    }

    /// Sets one initial attribute value for new instances.
    pub fn with_default(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Sets the initial attribute values for new instances.
    pub fn with_defaults(mut self, defaults: AttributeMap) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets one static factory attribute (carried down the extend chain).
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Sets the static factory attributes.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the lifecycle hook run for each new instance, before it joins
    /// any collection. A child factory without its own hook inherits its
    /// parent's.
    pub fn on_initialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ModelInstance) + Send + Sync + 'static,
    {
        self.initialize = Some(Arc::new(hook));
        self
    }

    /// Sets how far up the chain instances propagate into ancestor
    /// collections. Defaults to the immediate parent only.
    pub fn with_propagation(mut self, depth: PropagationDepth) -> Self {
        self.propagation = Some(depth);
        self
    }
}

impl fmt::Debug for ModelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptions")
            .field("type_tag", &self.type_tag)
            .field("defaults", &self.defaults)
            .field("attributes", &self.attributes)
            .field("initialize", &self.initialize.as_ref().map(|_| ".."))
            .field("propagation", &self.propagation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propagation_allows() {
        assert!(!PropagationDepth::None.allows(1));
        assert!(PropagationDepth::Levels(1).allows(1));
        assert!(!PropagationDepth::Levels(1).allows(2));
        assert!(PropagationDepth::Levels(3).allows(2));
        assert!(PropagationDepth::Unbounded.allows(17));
    }

    #[test]
    fn test_default_is_single_level() {
        assert_eq!(PropagationDepth::default(), PropagationDepth::Levels(1));
    }

    #[test]
    fn test_builder() {
        let options = ModelOptions::new("Item")
            .with_default("qty", 0)
            .with_attribute("category", "inventory")
            .with_propagation(PropagationDepth::Unbounded);
        assert_eq!(options.type_tag, "Item");
        assert_eq!(options.defaults.get("qty").and_then(|v| v.as_int()), Some(0));
        assert_eq!(options.attributes.get_text("category"), Some("inventory"));
        assert_eq!(options.propagation, Some(PropagationDepth::Unbounded));
    }
}
