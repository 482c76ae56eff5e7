//! Prelude module for Horizon Trellis.
//!
//! Re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_trellis::prelude::*;
//! ```

// ============================================================================
// Namespaces
// ============================================================================

pub use crate::namespace::{Namespace, NamespaceOptions};

// ============================================================================
// Models and Collections
// ============================================================================

pub use crate::model::{
    Collection, CollectionFactory, CollectionOptions, ModelFactory, ModelInstance, ModelOptions,
    PropagationDepth, TypeSelector,
};

// ============================================================================
// Views and Templates
// ============================================================================

pub use crate::view::{
    Document, Element, MemoryDocument, MemoryElement, Selector, TemplateContext, TemplateStyle,
    ViewConstructor, ViewInstance, ViewOptions,
};

// ============================================================================
// Core Utilities
// ============================================================================

pub use crate::error::{Result, TrellisError};
pub use horizon_trellis_core::{safe_merge, AttributeMap, AttributeValue, Deferred, MergeOptions};
