//! Per-column accumulated heights.

use crate::error::{LayoutError, LayoutResult};

/// Tracks the cumulative height of each column in an N-column layout.
///
/// Heights only grow between resets: every placement adds the placed item's
/// height plus the gap to exactly one column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTracker {
    heights: Vec<f32>,
}

impl ColumnTracker {
    /// Create a tracker with `column_count` empty columns.
    pub fn new(column_count: usize) -> Self {
        Self {
            heights: vec![0.0; column_count],
        }
    }

    /// Reinitialize the tracker with `column_count` empty columns.
    pub fn reset(&mut self, column_count: usize) {
        self.heights.clear();
        self.heights.resize(column_count, 0.0);
    }

    /// Number of columns being tracked.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.heights.len()
    }

    /// Index of the column with the least accumulated height.
    ///
    /// Ties resolve to the lowest index, which keeps repeated layouts of the
    /// same input reproducible. Returns 0 for a tracker without columns.
    pub fn shortest_column(&self) -> usize {
        let mut best = 0;
        for (index, &height) in self.heights.iter().enumerate().skip(1) {
            if height < self.heights[best] {
                best = index;
            }
        }
        best
    }

    /// Index of the column with the greatest accumulated height.
    ///
    /// Ties resolve to the lowest index. Returns 0 for a tracker without
    /// columns.
    pub fn tallest_column(&self) -> usize {
        let mut best = 0;
        for (index, &height) in self.heights.iter().enumerate().skip(1) {
            if height > self.heights[best] {
                best = index;
            }
        }
        best
    }

    /// Increase a column's height by `amount`.
    ///
    /// An out-of-range index is a bug in the caller: it trips a debug
    /// assertion and returns [`LayoutError::InvalidColumnIndex`] in release
    /// builds.
    pub fn add_to_column(&mut self, index: usize, amount: f32) -> LayoutResult<()> {
        let column_count = self.heights.len();
        debug_assert!(
            index < column_count,
            "column index {index} out of range for {column_count} columns"
        );
        let height = self
            .heights
            .get_mut(index)
            .ok_or(LayoutError::InvalidColumnIndex {
                index,
                column_count,
            })?;
        *height += amount;
        Ok(())
    }

    /// Accumulated height of one column.
    pub fn height(&self, index: usize) -> Option<f32> {
        self.heights.get(index).copied()
    }

    /// Accumulated heights of all columns, in column order.
    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height of the tallest column, trailing gap included.
    pub fn tallest_height(&self) -> f32 {
        self.heights.get(self.tallest_column()).copied().unwrap_or(0.0)
    }
}
