//! Waterfall (masonry) layout.
//!
//! - [`ColumnTracker`] keeps the accumulated height of each column.
//! - [`WaterfallEngine`] places items greedily into the shortest column.
//! - [`SurfaceLayout`] drives the engine against a measured
//!   [`LayoutSurface`], with debounced relayout on resize.

mod column_tracker;
mod surface;
mod waterfall;

pub use column_tracker::ColumnTracker;
pub use surface::{DEFAULT_RESIZE_DEBOUNCE, LayoutSurface, SurfaceLayout};
pub use waterfall::{
    DEFAULT_COLUMN_COUNT, DEFAULT_GAP, ItemPosition, PositionMap, WaterfallEngine,
    column_width_for,
};
