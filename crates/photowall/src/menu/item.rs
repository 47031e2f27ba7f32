//! Context menu entries.

use std::fmt;
use std::sync::Arc;

/// An action bound to a menu entry, invoked with the menu's target.
pub type MenuAction<D> = Arc<dyn Fn(Option<&D>) + Send + Sync>;

/// A clickable context menu entry.
///
/// Entries are built with [`MenuEntry::new`] and the `with_*` builders:
///
/// ```
/// use photowall::menu::MenuEntry;
///
/// let delete = MenuEntry::<u64>::new("delete", "Delete")
///     .with_icon("trash")
///     .danger()
///     .with_action(|photo| println!("delete {photo:?}"));
/// assert!(delete.is_danger());
/// ```
pub struct MenuEntry<D> {
    id: String,
    label: String,
    icon: Option<String>,
    shortcut: Option<String>,
    disabled: bool,
    danger: bool,
    action: Option<MenuAction<D>>,
}

impl<D> MenuEntry<D> {
    /// Create an enabled entry without icon, shortcut or action.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            shortcut: None,
            disabled: false,
            danger: false,
            action: None,
        }
    }

    /// Set the icon name.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the displayed keyboard shortcut.
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Mark the entry as disabled; invoking it does nothing.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Mark the entry as destructive.
    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    /// Bind an action that receives the menu's target when invoked.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(Option<&D>) + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Enable or disable the entry.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn shortcut(&self) -> Option<&str> {
        self.shortcut.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_danger(&self) -> bool {
        self.danger
    }

    /// The bound action, if any.
    pub fn action(&self) -> Option<&MenuAction<D>> {
        self.action.as_ref()
    }
}

impl<D> Clone for MenuEntry<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            icon: self.icon.clone(),
            shortcut: self.shortcut.clone(),
            disabled: self.disabled,
            danger: self.danger,
            action: self.action.clone(),
        }
    }
}

impl<D> fmt::Debug for MenuEntry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("shortcut", &self.shortcut)
            .field("disabled", &self.disabled)
            .field("danger", &self.danger)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// An item in a context menu: an entry or a separator.
pub enum MenuItem<D> {
    /// A clickable entry.
    Entry(MenuEntry<D>),
    /// A visual divider.
    Separator,
}

impl<D> MenuItem<D> {
    /// Create a separator item.
    pub fn separator() -> Self {
        MenuItem::Separator
    }

    /// Check if this item is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator)
    }

    /// The entry, unless this is a separator.
    pub fn entry(&self) -> Option<&MenuEntry<D>> {
        match self {
            MenuItem::Entry(entry) => Some(entry),
            MenuItem::Separator => None,
        }
    }
}

impl<D> From<MenuEntry<D>> for MenuItem<D> {
    fn from(entry: MenuEntry<D>) -> Self {
        MenuItem::Entry(entry)
    }
}

impl<D> Clone for MenuItem<D> {
    fn clone(&self) -> Self {
        match self {
            MenuItem::Entry(entry) => MenuItem::Entry(entry.clone()),
            MenuItem::Separator => MenuItem::Separator,
        }
    }
}

impl<D> fmt::Debug for MenuItem<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Entry(entry) => f.debug_tuple("Entry").field(entry).finish(),
            MenuItem::Separator => f.write_str("Separator"),
        }
    }
}

/// Entries shared by the gallery's photo context menus.
pub mod common_items {
    use super::MenuEntry;

    pub fn view<D>() -> MenuEntry<D> {
        MenuEntry::new("view", "View").with_icon("zoom-in")
    }

    pub fn download<D>() -> MenuEntry<D> {
        MenuEntry::new("download", "Download").with_icon("download")
    }

    pub fn edit<D>() -> MenuEntry<D> {
        MenuEntry::new("edit", "Edit").with_icon("edit")
    }

    pub fn edit_tags<D>() -> MenuEntry<D> {
        MenuEntry::new("edit-tags", "Edit tags").with_icon("tag")
    }

    pub fn delete<D>() -> MenuEntry<D> {
        MenuEntry::new("delete", "Delete").with_icon("trash").danger()
    }

    pub fn copy<D>() -> MenuEntry<D> {
        MenuEntry::new("copy", "Copy")
            .with_icon("copy")
            .with_shortcut("Ctrl+C")
    }

    pub fn multi_select<D>() -> MenuEntry<D> {
        MenuEntry::new("multi-select", "Multi-select").with_icon("check-square")
    }

    pub fn select_all<D>() -> MenuEntry<D> {
        MenuEntry::new("select-all", "Select all")
            .with_icon("check-square")
            .with_shortcut("Ctrl+A")
    }

    pub fn info<D>() -> MenuEntry<D> {
        MenuEntry::new("info", "Info").with_icon("info")
    }
}
