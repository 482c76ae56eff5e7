//! Declarative element/model binding for views.
//!
//! This module provides the view half of the binding layer:
//!
//! - `ViewConstructor`: a view "class" built from [`ViewOptions`], bound to
//!   one model factory, with computed element and template selectors
//! - `ViewInstance`: one bound element plus an immutable model resolution
//!   and a compiled template renderer
//! - `Selector`: the restricted `tag[attr='value']` selector grammar
//! - `Document` / `Element`: the host element-tree seams, with
//!   [`MemoryDocument`] as the bundled implementation
//! - `TemplateContext`: scoped template cache, configuration, engine, and
//!   loader
//!
//! # Binding Flow
//!
//! `ViewConstructor::load` selects every element matching the computed `el`
//! selector and binds a view to each: the initialize hook runs, the model
//! instance is resolved (by predicate, by the element's model attribute, or
//! falling back to the factory's default instance), and the view renders,
//! acquiring its template from the file load, the cache, or the document.

mod dom;
mod factory;
mod options;
mod selector;
mod template;

pub use dom::{Document, Element, MemoryDocument, MemoryElement};
pub use factory::{ViewConstructor, ViewInstance};
pub use options::{InstancePredicate, ViewDefaults, ViewHook, ViewOptions};
pub use selector::Selector;
pub use template::{
    FsLoader, LoadHandle, Renderer, SubstitutionEngine, TemplateCache, TemplateConfig,
    TemplateContext, TemplateEngine, TemplateLoader, TemplateStyle,
};
