//! Logging facilities for the gallery crates.
//!
//! The gallery uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host installs a subscriber:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! tracing_subscriber::fmt()
//!     .with_env_filter(EnvFilter::new("photowall::layout=debug"))
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "photowall_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "photowall_core::signal";
    /// Timer queue target.
    pub const TIMER: &str = "photowall_core::timer";
    /// Waterfall layout target.
    pub const LAYOUT: &str = "photowall::layout";
    /// Multi-select target.
    pub const SELECTION: &str = "photowall::selection";
    /// Context menu target.
    pub const MENU: &str = "photowall::menu";
    /// Gallery settings target.
    pub const SETTINGS: &str = "photowall::settings";
}

/// Span names used for performance tracing.
pub mod span_names {
    /// A full waterfall layout pass.
    pub const LAYOUT_PASS: &str = "photowall::layout_pass";
    /// A surface measurement and apply pass.
    pub const SURFACE_PASS: &str = "photowall::surface_pass";
}

/// A guard that keeps a performance span entered until dropped.
///
/// ```
/// use photowall_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("relayout");
///     // ... timed work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "photowall::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
