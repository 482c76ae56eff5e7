//! Logging facilities for Horizon Trellis.
//!
//! Trellis instruments itself with the `tracing` crate. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! The constants below let directives filter by subsystem, e.g.
//! `horizon_trellis::template=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Core utilities target.
    pub const CORE: &str = "horizon_trellis_core";
    /// Model factory and instance lifecycle target.
    pub const MODEL: &str = "horizon_trellis::model";
    /// Collection membership target.
    pub const COLLECTION: &str = "horizon_trellis::collection";
    /// View construction and model resolution target.
    pub const VIEW: &str = "horizon_trellis::view";
    /// Template cache, loading, and compilation target.
    pub const TEMPLATE: &str = "horizon_trellis::template";
    /// Namespace registry target.
    pub const NAMESPACE: &str = "horizon_trellis::namespace";
}

/// Span names used throughout Horizon Trellis for tracing.
pub mod span_names {
    /// Model-instance creation span.
    pub const CREATE_INSTANCE: &str = "horizon_trellis::create_instance";
    /// View bind (construction + resolution + first render) span.
    pub const BIND_VIEW: &str = "horizon_trellis::bind_view";
    /// Template render span.
    pub const RENDER: &str = "horizon_trellis::render";
}
