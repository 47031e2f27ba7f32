//! Item identity and selection state.

mod item;
mod selection;

pub use item::{ItemId, ItemSize, LayoutItem, Selectable};
pub use selection::{ClickModifiers, SelectionChange, SelectionMode, SelectionModel};
