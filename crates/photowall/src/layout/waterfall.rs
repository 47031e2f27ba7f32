//! Greedy shortest-column waterfall placement.
//!
//! [`WaterfallEngine`] places items into equal-width columns, always
//! choosing the column with the least accumulated height. It works purely on
//! data: item dimensions in, absolute positions out. Rendering surfaces are
//! driven through [`SurfaceLayout`](super::SurfaceLayout).
//!
//! # Example
//!
//! ```
//! use photowall::layout::WaterfallEngine;
//! use photowall::model::LayoutItem;
//!
//! let mut engine = WaterfallEngine::new(2, 10.0).unwrap();
//! engine.set_container_width(410.0);
//!
//! let items = [
//!     LayoutItem::with_dimensions(1, 800.0, 800.0),
//!     LayoutItem::with_dimensions(2, 800.0, 400.0),
//! ];
//! engine.layout(&items).unwrap();
//!
//! let second = engine.position(&2.into()).unwrap();
//! assert_eq!((second.x, second.y, second.height), (210.0, 0.0, 100.0));
//! ```

use std::collections::HashMap;
use std::fmt;

use photowall_core::logging::{span_names, targets};
use photowall_core::{PerfSpan, Rect, Signal};
use serde::{Deserialize, Serialize};

use super::column_tracker::ColumnTracker;
use crate::error::{LayoutError, LayoutResult};
use crate::model::{ItemId, ItemSize, LayoutItem};

/// Default number of columns.
pub const DEFAULT_COLUMN_COUNT: usize = 4;

/// Default spacing between columns and between stacked items.
pub const DEFAULT_GAP: f32 = 16.0;

/// The computed placement of one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPosition {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub column_index: usize,
}

impl ItemPosition {
    /// The rectangle this item occupies.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Bottom edge of the item.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Positions keyed by item identifier, iterated in placement order.
///
/// Every placement is kept, so a host list carrying the same identifier
/// twice still yields one position per entry; lookups by identifier return
/// the most recent placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionMap {
    placements: Vec<(ItemId, ItemPosition)>,
    latest: HashMap<ItemId, usize>,
}

impl PositionMap {
    /// Position of an item, if it was placed.
    pub fn get(&self, id: &ItemId) -> Option<&ItemPosition> {
        self.latest.get(id).map(|&index| &self.placements[index].1)
    }

    /// Whether an item has a recorded position.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.latest.contains_key(id)
    }

    /// Number of recorded placements.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether no placement is recorded.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// All placements in placement order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &ItemPosition)> {
        self.placements.iter().map(|(id, position)| (id, position))
    }

    fn insert(&mut self, id: ItemId, position: ItemPosition) {
        self.latest.insert(id.clone(), self.placements.len());
        self.placements.push((id, position));
    }

    fn remove(&mut self, id: &ItemId) -> bool {
        if self.latest.remove(id).is_none() {
            return false;
        }
        self.placements.retain(|(placed, _)| placed != id);
        self.latest = self
            .placements
            .iter()
            .enumerate()
            .map(|(index, (placed, _))| (placed.clone(), index))
            .collect();
        true
    }

    fn clear(&mut self) {
        self.placements.clear();
        self.latest.clear();
    }
}

impl<'a> IntoIterator for &'a PositionMap {
    type Item = (&'a ItemId, &'a ItemPosition);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Width of one column for the given container, column count and gap.
///
/// The result may be zero or negative; [`WaterfallEngine`] rejects such
/// configurations with [`LayoutError::Precondition`].
pub fn column_width_for(container_width: f32, column_count: usize, gap: f32) -> f32 {
    if column_count == 0 {
        return 0.0;
    }
    let columns = column_count as f32;
    (container_width - gap * (columns - 1.0)) / columns
}

/// Greedy shortest-column layout over a list of items.
///
/// The engine remembers the items it placed so that removals and
/// configuration changes can recompute the whole layout. Changing the
/// column count, the gap or the container width marks the layout stale;
/// existing positions stay readable until the next pass.
pub struct WaterfallEngine {
    column_count: usize,
    gap: f32,
    container_width: Option<f32>,
    column_width: f32,
    tracker: ColumnTracker,
    positions: PositionMap,
    items: Vec<LayoutItem>,
    placed_count: usize,
    needs_relayout: bool,
    /// Emitted with the content height after every layout pass, append
    /// and reset.
    pub layout_changed: Signal<f32>,
}

impl Default for WaterfallEngine {
    fn default() -> Self {
        Self::with_valid_config(DEFAULT_COLUMN_COUNT, DEFAULT_GAP)
    }
}

impl fmt::Debug for WaterfallEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaterfallEngine")
            .field("column_count", &self.column_count)
            .field("gap", &self.gap)
            .field("container_width", &self.container_width)
            .field("column_width", &self.column_width)
            .field("column_heights", &self.tracker.heights())
            .field("placed_count", &self.placed_count)
            .field("needs_relayout", &self.needs_relayout)
            .finish_non_exhaustive()
    }
}

impl WaterfallEngine {
    /// Create an engine with the given column count and gap.
    ///
    /// The container width must be supplied with
    /// [`set_container_width`](Self::set_container_width) before items can
    /// be placed.
    pub fn new(column_count: usize, gap: f32) -> LayoutResult<Self> {
        validate_column_count(column_count)?;
        validate_gap(gap)?;
        Ok(Self::with_valid_config(column_count, gap))
    }

    fn with_valid_config(column_count: usize, gap: f32) -> Self {
        Self {
            column_count,
            gap,
            container_width: None,
            column_width: 0.0,
            tracker: ColumnTracker::new(column_count),
            positions: PositionMap::default(),
            items: Vec::new(),
            placed_count: 0,
            needs_relayout: false,
            layout_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Configured number of columns.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Change the number of columns.
    ///
    /// Zero columns is rejected. A different count invalidates every
    /// position and marks the layout for recalculation.
    pub fn set_column_count(&mut self, column_count: usize) -> LayoutResult<()> {
        validate_column_count(column_count)?;
        if column_count != self.column_count {
            tracing::debug!(
                target: targets::LAYOUT,
                from = self.column_count,
                to = column_count,
                "column count changed"
            );
            self.column_count = column_count;
            self.invalidate();
        }
        Ok(())
    }

    /// Configured spacing between columns and stacked items.
    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Change the spacing. Must be finite and non-negative.
    pub fn set_gap(&mut self, gap: f32) -> LayoutResult<()> {
        validate_gap(gap)?;
        if gap != self.gap {
            self.gap = gap;
            self.invalidate();
        }
        Ok(())
    }

    /// Last container width supplied by the host.
    pub fn container_width(&self) -> Option<f32> {
        self.container_width
    }

    /// Supply the measured container width.
    ///
    /// Validity is checked when items are placed, so a width that cannot fit
    /// the configured columns only fails at the next layout pass.
    pub fn set_container_width(&mut self, width: f32) {
        if self.container_width != Some(width) {
            self.container_width = Some(width);
            self.invalidate();
        }
    }

    /// Whether a configuration change has not been laid out yet.
    pub fn needs_relayout(&self) -> bool {
        self.needs_relayout
    }

    fn invalidate(&mut self) {
        self.needs_relayout = true;
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Lay out `items` from scratch, in order.
    ///
    /// Returns the content height. On a precondition failure nothing is
    /// changed. An empty list clears the layout without requiring a
    /// container width.
    pub fn layout(&mut self, items: &[LayoutItem]) -> LayoutResult<f32> {
        let _span = PerfSpan::new(span_names::LAYOUT_PASS);

        if items.is_empty() {
            self.clear_state();
            tracing::debug!(target: targets::LAYOUT, "empty layout pass");
            self.layout_changed.emit(0.0);
            return Ok(0.0);
        }

        let column_width = self.checked_column_width()?;
        self.clear_state();
        self.column_width = column_width;

        for item in items {
            self.place_item(item.clone())?;
        }

        let content_height = self.content_height();
        tracing::debug!(
            target: targets::LAYOUT,
            item_count = items.len(),
            column_count = self.column_count,
            column_width,
            content_height,
            "layout pass complete"
        );
        self.layout_changed.emit(content_height);
        Ok(content_height)
    }

    /// Recompute the layout of every item currently known to the engine.
    pub fn relayout(&mut self) -> LayoutResult<f32> {
        let items = std::mem::take(&mut self.items);
        match self.layout(&items) {
            Ok(content_height) => Ok(content_height),
            Err(err) => {
                self.items = items;
                Err(err)
            }
        }
    }

    /// Place one more item below the existing ones without disturbing them.
    ///
    /// If the configuration changed since the last pass, the whole layout
    /// is recomputed with the new item at the end instead.
    pub fn append(&mut self, item: LayoutItem) -> LayoutResult<ItemPosition> {
        self.prepare_incremental()?;
        let position = self.place_item(item)?;
        self.layout_changed.emit(self.content_height());
        Ok(position)
    }

    /// Place an anonymous item of a measured height.
    ///
    /// The placement advances the column but no position is recorded, so it
    /// does not survive the next full pass.
    pub fn place_height(&mut self, height: f32) -> LayoutResult<ItemPosition> {
        self.prepare_incremental()?;
        let position = self.place(ItemSize::Measured(height))?;
        self.layout_changed.emit(self.content_height());
        Ok(position)
    }

    /// Remove an item and recompute the layout of the remaining ones.
    ///
    /// Column heights cannot be decremented without knowing what sits below
    /// the removed item, so removal always runs a full pass. Returns
    /// `Ok(false)` for an unknown identifier.
    pub fn remove(&mut self, id: &ItemId) -> LayoutResult<bool> {
        let had_position = self.positions.remove(id);
        let item_count = self.items.len();
        self.items.retain(|item| &item.id != id);
        if !had_position && self.items.len() == item_count {
            return Ok(false);
        }

        tracing::debug!(target: targets::LAYOUT, %id, "item removed");
        if let Err(err) = self.relayout() {
            self.invalidate();
            return Err(err);
        }
        Ok(true)
    }

    /// Clear every position and zero the columns.
    pub fn reset(&mut self) {
        self.clear_state();
        tracing::debug!(target: targets::LAYOUT, "layout reset");
        self.layout_changed.emit(0.0);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Position of an item from the most recent pass.
    pub fn position(&self, id: &ItemId) -> Option<&ItemPosition> {
        self.positions.get(id)
    }

    /// All recorded positions, in placement order.
    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    /// Items the engine currently knows about, in placement order.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Column width used by the most recent pass.
    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    /// Accumulated column heights, trailing gaps included.
    pub fn column_heights(&self) -> &[f32] {
        self.tracker.heights()
    }

    /// Height of the laid-out content: the tallest column without its
    /// trailing gap, or zero when nothing is placed.
    pub fn content_height(&self) -> f32 {
        if self.placed_count == 0 {
            return 0.0;
        }
        (self.tracker.tallest_height() - self.gap).max(0.0)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn checked_column_width(&self) -> LayoutResult<f32> {
        let precondition = || LayoutError::Precondition {
            container_width: self.container_width,
            column_count: self.column_count,
            gap: self.gap,
        };
        let container_width = self.container_width.ok_or_else(precondition)?;
        let width = column_width_for(container_width, self.column_count, self.gap);
        if width.is_finite() && width > 0.0 {
            Ok(width)
        } else {
            tracing::warn!(
                target: targets::LAYOUT,
                container_width,
                column_count = self.column_count,
                gap = self.gap,
                "container too narrow for layout"
            );
            Err(precondition())
        }
    }

    /// Bring a stale layout up to date before an incremental placement.
    ///
    /// Greedy placement is sequential, so relaying out the known items and
    /// then placing the new one matches a full pass over both.
    fn prepare_incremental(&mut self) -> LayoutResult<()> {
        if self.needs_relayout {
            tracing::debug!(target: targets::LAYOUT, "stale layout, recomputing before append");
            self.relayout()?;
        }
        if self.column_width > 0.0 && self.tracker.column_count() == self.column_count {
            return Ok(());
        }
        let column_width = self.checked_column_width()?;
        self.column_width = column_width;
        if self.tracker.column_count() != self.column_count {
            self.tracker.reset(self.column_count);
        }
        Ok(())
    }

    fn place_item(&mut self, item: LayoutItem) -> LayoutResult<ItemPosition> {
        let position = self.place(item.size)?;
        self.positions.insert(item.id.clone(), position);
        self.items.push(item);
        Ok(position)
    }

    fn place(&mut self, size: ItemSize) -> LayoutResult<ItemPosition> {
        let column_index = self.tracker.shortest_column();
        let y = self.tracker.height(column_index).unwrap_or(0.0);
        let x = column_index as f32 * (self.column_width + self.gap);
        let height = size.height_in_column(self.column_width);

        self.tracker.add_to_column(column_index, height + self.gap)?;
        self.placed_count += 1;

        tracing::trace!(target: targets::LAYOUT, column_index, x, y, height, "item placed");
        Ok(ItemPosition {
            x,
            y,
            width: self.column_width,
            height,
            column_index,
        })
    }

    fn clear_state(&mut self) {
        self.tracker.reset(self.column_count);
        self.positions.clear();
        self.items.clear();
        self.column_width = 0.0;
        self.placed_count = 0;
        self.needs_relayout = false;
    }
}

fn validate_column_count(column_count: usize) -> LayoutResult<()> {
    if column_count == 0 {
        tracing::warn!(target: targets::LAYOUT, "rejected zero column count");
        return Err(LayoutError::InvalidColumnCount(column_count));
    }
    Ok(())
}

fn validate_gap(gap: f32) -> LayoutResult<()> {
    if !gap.is_finite() || gap < 0.0 {
        tracing::warn!(target: targets::LAYOUT, gap, "rejected gap");
        return Err(LayoutError::InvalidGap(gap));
    }
    Ok(())
}
