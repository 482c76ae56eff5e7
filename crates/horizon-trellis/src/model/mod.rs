//! Model factories, instances, and collections.
//!
//! This module provides the model half of the binding layer:
//!
//! - `ModelFactory`: a constructor-equivalent built from [`ModelOptions`],
//!   supporting cooperative inheritance via `extend`
//! - `ModelInstance`: a mutable attribute map with conditional setters
//! - `Collection`: the ordered per-factory instance sequence, with
//!   type-aware exclusion filtering
//! - `CollectionFactory`: builds additional collections bound to a model
//!   factory, registered on a namespace
//!
//! # Inheritance Semantics
//!
//! `extend` resolves the child's options against the parent's at build time:
//! attributes and defaults the child does not override are carried forward,
//! and a child-supplied `initialize` hook always wins over the parent's.
//! There is no option lookup along the chain afterwards; each factory holds
//! its own resolved set.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::model::{ModelFactory, ModelOptions};
//!
//! let item = ModelFactory::define(ModelOptions::new("Item").with_default("qty", 0))?;
//! let special = item.extend(ModelOptions::new("Special"))?;
//!
//! item.create();
//! special.create();
//!
//! // The parent collection sees both; the exclusion filter narrows it to
//! // the parent's own instances.
//! assert_eq!(item.collection().len(), 2);
//! assert_eq!(item.collection().excluding_children([&special]).len(), 1);
//! # Ok::<(), horizon_trellis::error::ModelError>(())
//! ```

mod collection;
mod factory;
mod instance;
mod options;

pub use collection::{Collection, CollectionFactory, CollectionOptions, TypeSelector};
pub use factory::ModelFactory;
pub use instance::{InstanceId, ModelInstance};
pub use options::{InitializeHook, ModelOptions, PropagationDepth};
