//! Photowall - the interaction core of a photo-wall gallery.
//!
//! This crate implements the parts of the gallery that carry state and
//! algorithms, independent of any UI toolkit:
//!
//! - [`layout`]: greedy shortest-column waterfall (masonry) layout
//! - [`model`]: item identity and the multi-select [`SelectionModel`]
//! - [`menu`]: the right-click [`ContextMenuController`]
//! - [`settings`]: view settings loaded from TOML
//!
//! The host owns rendering, input and time. Components report changes
//! through [`Signal`]s and expect the host to call their `tick` methods
//! with the current [`Instant`](std::time::Instant) for debounced work.
//!
//! # Example
//!
//! ```
//! use photowall::layout::WaterfallEngine;
//! use photowall::model::{ClickModifiers, LayoutItem, SelectionModel};
//!
//! let photos = vec![
//!     LayoutItem::with_dimensions(1, 1600.0, 1200.0),
//!     LayoutItem::with_dimensions(2, 1080.0, 1920.0),
//!     LayoutItem::unknown(3),
//! ];
//!
//! let mut engine = WaterfallEngine::new(2, 16.0)?;
//! engine.set_container_width(816.0);
//! let content_height = engine.layout(&photos)?;
//! assert!(content_height > 0.0);
//!
//! let mut selection = SelectionModel::new();
//! selection.set_items(photos);
//! selection.enter_selection_mode();
//! selection.toggle(&photowall::model::ItemId::from(2), ClickModifiers::NONE);
//! assert_eq!(selection.selected_count(), 1);
//! # Ok::<(), photowall::LayoutError>(())
//! ```

mod error;
pub mod layout;
pub mod menu;
pub mod model;
pub mod settings;

pub use error::{LayoutError, LayoutResult, SettingsError, SettingsResult};
pub use layout::{ItemPosition, WaterfallEngine};
pub use menu::ContextMenuController;
pub use model::{ItemId, SelectionModel};
pub use settings::GallerySettings;

pub use photowall_core::{Point, Rect, Signal, Size};
