//! Core utilities for Horizon Trellis.
//!
//! This crate provides the foundational pieces of the Trellis binding layer:
//!
//! - **Attribute Values**: The value vocabulary of option bags and model
//!   attributes ([`AttributeValue`], [`AttributeMap`])
//! - **Safe Merge**: Conflict-aware shallow map combination with an explicit
//!   resolution policy ([`safe_merge`], [`MergeOptions`])
//! - **Deferred Values**: Single-assignment cells for loads that may complete
//!   after the call that started them ([`Deferred`])
//! - **Text Helpers**: Case-insensitive matching and data-attribute key
//!   derivation used by view/model resolution
//!
//! # Safe Merge Example
//!
//! ```
//! use horizon_trellis_core::{safe_merge, AttributeMap, MergeOptions};
//!
//! let base = AttributeMap::new().with("name", "Widget").with("qty", 1);
//! let incoming = AttributeMap::new().with("qty", 99).with("color", "red");
//!
//! // Default policy: existing keys win, new keys are filled in.
//! let merged = safe_merge(&base, &incoming, &MergeOptions::new());
//! assert_eq!(merged.get("qty").and_then(|v| v.as_int()), Some(1));
//! assert_eq!(merged.get("color").and_then(|v| v.as_text()), Some("red"));
//! ```
//!
//! # Deferred Example
//!
//! ```
//! use horizon_trellis_core::Deferred;
//!
//! let load: Deferred<String> = Deferred::pending();
//! assert!(load.poll().is_none());
//!
//! load.resolve("template body".to_string());
//! assert_eq!(load.poll().as_deref(), Some("template body"));
//! ```

mod deferred;
pub mod logging;
mod merge;
pub mod text;
mod value;

pub use deferred::Deferred;
pub use merge::{safe_merge, KeyPredicate, MergeOptions};
pub use value::{AttributeMap, AttributeValue};
