//! Horizon Trellis - a declarative model/view binding layer.
//!
//! Trellis ties model factories, instance collections, and view constructors
//! together under named [`Namespace`]s:
//!
//! - **Model factories** support cooperative inheritance: each
//!   [`extend`](model::ModelFactory::extend) resolves the child's options
//!   against the parent's, and new instances register into their factory's
//!   collection (propagating to ancestors to a configurable depth)
//! - **Collections** are ordered and filterable by type tag
//!   ([`excluding_children`](model::Collection::excluding_children))
//! - **View constructors** bind elements declaratively: each view resolves
//!   the model instance its element represents, then renders through a
//!   selector-keyed template cache and a pluggable templating engine
//!
//! The host element tree, templating engine, and file loader sit behind the
//! [`view::Document`]/[`view::Element`], [`view::TemplateEngine`], and
//! [`view::TemplateLoader`] seams.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_trellis::prelude::*;
//!
//! let ns = Namespace::new(NamespaceOptions::new("shop"));
//! let item = ns.create_model(ModelOptions::new("Item").with_default("qty", 0))?;
//!
//! item.create_with(AttributeMap::new().with("name", "Widget"));
//! item.create_with(AttributeMap::new().with("name", "Gadget"));
//! assert_eq!(ns.all().unwrap().len(), 2);
//!
//! // Bind views over an in-memory document.
//! let doc = Arc::new(MemoryDocument::new());
//! doc.insert(
//!     MemoryElement::new("script")
//!         .with_attribute("type", "text/template")
//!         .with_attribute("data-view", "Item")
//!         .with_content("<%= name %> x<%= qty %>"),
//! );
//! doc.insert(
//!     MemoryElement::new("div")
//!         .with_attribute("data-view", "Item")
//!         .with_attribute("data-model", "gadget"),
//! );
//!
//! let views = ns.create_view(ViewOptions::new())?;
//! let document: Arc<dyn Document> = doc;
//! let bound = views.load(&document);
//!
//! assert_eq!(bound.len(), 1);
//! assert_eq!(bound[0].render_output().as_deref(), Some("Gadget x0"));
//! # Ok::<(), horizon_trellis::TrellisError>(())
//! ```

pub use horizon_trellis_core::*;

pub mod error;
pub mod model;
mod namespace;
pub mod prelude;
pub mod view;

pub use error::{Result, TrellisError};
pub use model::{ModelFactory, ModelOptions, PropagationDepth};
pub use namespace::{FactoryKey, Namespace, NamespaceOptions};
pub use view::{ViewConstructor, ViewOptions};
