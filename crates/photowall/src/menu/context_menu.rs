//! Context menu state machine.
//!
//! [`ContextMenuController`] owns the state of the gallery's right-click
//! menu: where it is, which entries it shows and which item it was opened
//! for. It never draws anything. The host renders [`MenuState`], forwards
//! pointer events and drives the cleanup timer with [`tick`].
//!
//! [`tick`]: ContextMenuController::tick

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use photowall_core::logging::targets;
use photowall_core::{Point, Rect, Signal, Size, TimerId, TimerQueue};
use serde::{Deserialize, Serialize};

use super::item::{MenuEntry, MenuItem};

/// Default delay before a hidden menu drops its entries and target.
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_millis(200);

/// Dimensions used to size and place the menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuMetrics {
    /// Menu width.
    pub width: f32,
    /// Height of one entry row.
    pub row_height: f32,
    /// Height of a separator.
    pub separator_height: f32,
    /// Minimum distance kept from the viewport edges.
    pub padding: f32,
}

impl Default for MenuMetrics {
    fn default() -> Self {
        Self {
            width: 200.0,
            row_height: 40.0,
            separator_height: 9.0,
            padding: 8.0,
        }
    }
}

/// Size of a menu showing `items`.
pub fn menu_size<D>(items: &[MenuItem<D>], metrics: &MenuMetrics) -> Size {
    let separators = items.iter().filter(|item| item.is_separator()).count();
    let entries = items.len() - separators;
    Size::new(
        metrics.width,
        entries as f32 * metrics.row_height + separators as f32 * metrics.separator_height,
    )
}

/// Top-left corner for a menu opened at `pointer`, kept inside `viewport`.
///
/// A menu that would overflow the right or bottom edge (padding included)
/// is shifted back by the overflow; both coordinates are then kept at least
/// `padding` from the top-left edges, which wins if the menu does not fit.
pub fn clamp_menu_position(pointer: Point, menu: Size, viewport: Size, padding: f32) -> Point {
    let mut x = pointer.x;
    let mut y = pointer.y;

    if x + menu.width + padding > viewport.width {
        x = viewport.width - menu.width - padding;
    }
    if y + menu.height + padding > viewport.height {
        y = viewport.height - menu.height - padding;
    }

    Point::new(x.max(padding), y.max(padding))
}

/// Kind of pointer event seen by the global dismissal handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// A primary button click.
    Click,
    /// A secondary button press that would open a context menu.
    ContextMenu,
}

/// A pointer event forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// What kind of event this is.
    pub kind: PointerEventKind,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl PointerEvent {
    /// Create a new pointer event.
    pub fn new(position: Point, kind: PointerEventKind) -> Self {
        Self {
            position,
            kind,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A click at `position`.
    pub fn click(position: Point) -> Self {
        Self::new(position, PointerEventKind::Click)
    }

    /// A context menu request at `position`.
    pub fn context_menu(position: Point) -> Self {
        Self::new(position, PointerEventKind::ContextMenu)
    }

    /// Suppress the platform's own handling (e.g. its native menu).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Keep the event from reaching further handlers.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Everything the host needs to render the menu.
#[derive(Debug)]
pub struct MenuState<D> {
    pub visible: bool,
    /// Top-left corner, already clamped to the viewport.
    pub position: Point,
    pub items: Vec<MenuItem<D>>,
    /// The item the menu was opened for.
    pub target: Option<D>,
}

impl<D> Default for MenuState<D> {
    fn default() -> Self {
        Self {
            visible: false,
            position: Point::ZERO,
            items: Vec::new(),
            target: None,
        }
    }
}

/// Controls a single context menu.
///
/// # Signals
///
/// - `item_triggered`: emitted with the entry id after an entry ran
/// - `visibility_changed`: emitted when the menu is shown or hidden
pub struct ContextMenuController<D> {
    state: MenuState<D>,
    metrics: MenuMetrics,
    viewport: Size,
    cleanup_delay: Duration,
    timers: TimerQueue,
    pending_cleanup: Option<TimerId>,
    listening: bool,

    /// Emitted with the entry id after an entry was invoked.
    pub item_triggered: Signal<String>,

    /// Emitted when visibility changes.
    pub visibility_changed: Signal<bool>,
}

impl<D> ContextMenuController<D> {
    /// Create a hidden menu for a viewport of the given size.
    pub fn new(viewport: Size) -> Self {
        Self {
            state: MenuState::default(),
            metrics: MenuMetrics::default(),
            viewport,
            cleanup_delay: DEFAULT_CLEANUP_DELAY,
            timers: TimerQueue::new(),
            pending_cleanup: None,
            listening: false,
            item_triggered: Signal::new(),
            visibility_changed: Signal::new(),
        }
    }

    /// Use custom menu metrics.
    pub fn with_metrics(mut self, metrics: MenuMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Use a custom cleanup delay.
    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    pub fn metrics(&self) -> &MenuMetrics {
        &self.metrics
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Update the viewport size, e.g. after a window resize.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Current menu state for rendering.
    pub fn state(&self) -> &MenuState<D> {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn position(&self) -> Point {
        self.state.position
    }

    pub fn items(&self) -> &[MenuItem<D>] {
        &self.state.items
    }

    pub fn target(&self) -> Option<&D> {
        self.state.target.as_ref()
    }

    /// Area the menu occupies on screen.
    pub fn menu_rect(&self) -> Rect {
        Rect::from_origin_size(
            self.state.position,
            menu_size(&self.state.items, &self.metrics),
        )
    }

    // =========================================================================
    // Show / Hide
    // =========================================================================

    /// Open the menu at the event's position.
    ///
    /// The event is consumed so the platform menu does not open and the
    /// global dismissal handler ignores it. Global dismissal is installed on
    /// the first show.
    pub fn show(&mut self, event: &mut PointerEvent, items: Vec<MenuItem<D>>, target: Option<D>) {
        event.prevent_default();
        event.stop_propagation();

        let size = menu_size(&items, &self.metrics);
        let position =
            clamp_menu_position(event.position, size, self.viewport, self.metrics.padding);

        self.cancel_cleanup();
        self.state.position = position;
        self.state.items = items;
        self.state.target = target;

        if !self.listening {
            self.install();
        }

        tracing::debug!(
            target: targets::MENU,
            x = position.x,
            y = position.y,
            item_count = self.state.items.len(),
            "context menu shown"
        );
        self.set_visible(true);
    }

    /// Hide the menu.
    ///
    /// Entries and target stay in place for the exit transition and are
    /// cleared by [`tick`](Self::tick) once the cleanup delay has passed,
    /// provided the menu was not shown again meanwhile.
    pub fn hide(&mut self, now: Instant) {
        if !self.state.visible && self.pending_cleanup.is_some() {
            return;
        }
        self.set_visible(false);
        self.cancel_cleanup();
        self.pending_cleanup = Some(self.timers.start_one_shot(now, self.cleanup_delay));
    }

    /// Show the menu if hidden, hide it if shown.
    pub fn toggle(
        &mut self,
        now: Instant,
        event: &mut PointerEvent,
        items: Vec<MenuItem<D>>,
        target: Option<D>,
    ) {
        if self.state.visible {
            self.hide(now);
        } else {
            self.show(event, items, target);
        }
    }

    /// Run the delayed cleanup if it is due.
    ///
    /// Returns whether entries and target were cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        let fired = self.timers.process_expired(now);
        let Some(id) = self.pending_cleanup else {
            return false;
        };
        if !fired.contains(&id) {
            return false;
        }
        self.pending_cleanup = None;
        if self.state.visible {
            return false;
        }

        self.state.items.clear();
        self.state.target = None;
        tracing::trace!(target: targets::MENU, "hidden menu cleared");
        true
    }

    /// Time until the pending cleanup is due.
    pub fn time_until_cleanup(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    fn set_visible(&mut self, visible: bool) {
        if self.state.visible != visible {
            self.state.visible = visible;
            self.visibility_changed.emit(visible);
        }
    }

    fn cancel_cleanup(&mut self) {
        if let Some(id) = self.pending_cleanup.take() {
            let _ = self.timers.stop(id);
        }
    }

    // =========================================================================
    // Invocation
    // =========================================================================

    /// Invoke an entry against the current target, then hide the menu.
    ///
    /// Disabled entries do nothing. A panicking action is logged and does
    /// not keep the menu open. Returns whether the entry ran.
    pub fn invoke_item(&mut self, now: Instant, entry: &MenuEntry<D>) -> bool {
        self.invoke_item_with(now, entry, |_, _| {})
    }

    /// Like [`invoke_item`](Self::invoke_item), additionally running
    /// `callback` with the entry and target after the entry's own action.
    ///
    /// Action and callback are isolated from each other: a panic in one is
    /// logged and the other still runs.
    pub fn invoke_item_with<F>(&mut self, now: Instant, entry: &MenuEntry<D>, callback: F) -> bool
    where
        F: FnOnce(&MenuEntry<D>, Option<&D>),
    {
        if entry.is_disabled() {
            tracing::trace!(target: targets::MENU, id = entry.id(), "disabled entry ignored");
            return false;
        }

        let target = self.state.target.as_ref();
        if let Some(action) = entry.action() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| action(target)));
            if let Err(payload) = result {
                tracing::error!(
                    target: targets::MENU,
                    id = entry.id(),
                    error = panic_message(payload.as_ref()),
                    "menu action failed"
                );
            }
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| callback(entry, target)));
        if let Err(payload) = result {
            tracing::error!(
                target: targets::MENU,
                id = entry.id(),
                error = panic_message(payload.as_ref()),
                "menu callback failed"
            );
        }

        self.item_triggered.emit(entry.id().to_owned());
        self.hide(now);
        true
    }

    /// Invoke the entry at `index` in the current item list.
    ///
    /// Separators and out-of-range indices do nothing.
    pub fn invoke_index(&mut self, now: Instant, index: usize) -> bool {
        let Some(entry) = self.state.items.get(index).and_then(MenuItem::entry).cloned() else {
            return false;
        };
        self.invoke_item(now, &entry)
    }

    // =========================================================================
    // Global Dismissal
    // =========================================================================

    /// Whether global dismissal is installed.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Start dismissing the menu on pointer events outside it.
    pub fn install(&mut self) {
        if !self.listening {
            self.listening = true;
            tracing::debug!(target: targets::MENU, "global dismissal installed");
        }
    }

    /// Stop listening for global pointer events and drop pending cleanup.
    pub fn teardown(&mut self) {
        if self.listening {
            self.listening = false;
            tracing::debug!(target: targets::MENU, "global dismissal removed");
        }
        self.cancel_cleanup();
    }

    /// Feed a document-level pointer event to the dismissal handler.
    ///
    /// Clicks and context menu requests outside the rendered menu hide it.
    /// Events whose propagation was stopped, such as the one that opened
    /// the menu, are ignored. Returns whether the menu was hidden.
    pub fn handle_global_pointer(&mut self, now: Instant, event: &PointerEvent) -> bool {
        if !self.listening || !self.state.visible || event.is_propagation_stopped() {
            return false;
        }
        if self.menu_rect().contains(event.position) {
            return false;
        }

        tracing::trace!(target: targets::MENU, kind = ?event.kind, "dismissed by outside pointer");
        self.hide(now);
        true
    }
}

impl<D> Drop for ContextMenuController<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
