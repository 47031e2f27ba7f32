//! Right-click context menu for gallery items.

mod context_menu;
mod item;

pub use context_menu::{
    ContextMenuController, DEFAULT_CLEANUP_DELAY, MenuMetrics, MenuState, PointerEvent,
    PointerEventKind, clamp_menu_position, menu_size,
};
pub use item::{MenuAction, MenuEntry, MenuItem, common_items};
