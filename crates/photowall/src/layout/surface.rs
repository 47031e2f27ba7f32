//! Driving the waterfall layout against a live rendering surface.
//!
//! Some hosts cannot hand the engine item dimensions up front: elements are
//! already on screen and their heights are only known by measuring them.
//! [`LayoutSurface`] abstracts that surface, and [`SurfaceLayout`] measures
//! its elements, runs them through a [`WaterfallEngine`] and writes the
//! resulting positions back.
//!
//! Resize notifications are debounced through a [`TimerQueue`]; the host
//! calls [`SurfaceLayout::tick`] with the current time to let a pending
//! relayout run.

use std::time::{Duration, Instant};

use photowall_core::logging::{span_names, targets};
use photowall_core::{PerfSpan, Size, TimerId, TimerQueue};

use super::waterfall::{ItemPosition, WaterfallEngine};
use crate::error::{LayoutError, LayoutResult};
use crate::model::{ItemId, ItemSize, LayoutItem};

/// Default quiet period before a resize triggers a relayout.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// A rendering surface whose elements can be measured and positioned.
pub trait LayoutSurface {
    /// Handle to one laid-out element.
    type Element;

    /// Current inner width of the container, if it is measurable.
    fn container_width(&self) -> Option<f32>;

    /// Handles of every element to lay out, in display order.
    fn elements(&self) -> Vec<Self::Element>;

    /// Identifier attached to an element, if any.
    fn element_id(&self, element: &Self::Element) -> Option<ItemId>;

    /// Rendered height of an element; zero when it has not been rendered.
    fn measured_height(&self, element: &Self::Element) -> f32;

    /// Natural dimensions of the element's image, once loaded.
    fn natural_size(&self, element: &Self::Element) -> Option<Size>;

    /// Absolutely position an element.
    fn apply_position(&mut self, element: &Self::Element, position: &ItemPosition);

    /// Size the container to fit the laid-out content.
    fn set_content_height(&mut self, height: f32);
}

/// Measures a [`LayoutSurface`] and applies waterfall positions to it.
///
/// Every entry point takes `&mut self`, so a layout pass can never be
/// re-entered while it is writing to the surface.
pub struct SurfaceLayout<S: LayoutSurface> {
    surface: S,
    engine: WaterfallEngine,
    timers: TimerQueue,
    pending_relayout: Option<TimerId>,
    resize_debounce: Duration,
    last_container_width: Option<f32>,
}

impl<S: LayoutSurface> SurfaceLayout<S> {
    /// Wrap a surface with the given engine configuration.
    pub fn new(surface: S, engine: WaterfallEngine) -> Self {
        Self {
            surface,
            engine,
            timers: TimerQueue::new(),
            pending_relayout: None,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            last_container_width: None,
        }
    }

    /// Set the quiet period used by [`notify_resize`](Self::notify_resize).
    pub fn with_resize_debounce(mut self, debounce: Duration) -> Self {
        self.resize_debounce = debounce;
        self
    }

    /// The wrapped surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the wrapped surface, e.g. to insert elements.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The underlying engine.
    pub fn engine(&self) -> &WaterfallEngine {
        &self.engine
    }

    /// Consume the adapter and return the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Measure every element, lay them out and apply the positions.
    ///
    /// Elements without an identifier are keyed by their index. Returns the
    /// content height. A failed precondition leaves the surface untouched.
    pub fn relayout(&mut self) -> LayoutResult<f32> {
        let _span = PerfSpan::new(span_names::SURFACE_PASS);

        let Some(container_width) = self.surface.container_width() else {
            return Err(LayoutError::Precondition {
                container_width: None,
                column_count: self.engine.column_count(),
                gap: self.engine.gap(),
            });
        };
        self.engine.set_container_width(container_width);

        let elements = self.surface.elements();
        let items: Vec<LayoutItem> = elements
            .iter()
            .enumerate()
            .map(|(index, element)| LayoutItem {
                id: self
                    .surface
                    .element_id(element)
                    .unwrap_or_else(|| ItemId::from(index)),
                size: self.measure(element),
            })
            .collect();

        let content_height = self.engine.layout(&items)?;

        for (element, (_, position)) in elements.iter().zip(self.engine.positions().iter()) {
            self.surface.apply_position(element, position);
        }
        self.surface.set_content_height(content_height);
        self.last_container_width = Some(container_width);

        tracing::debug!(
            target: targets::LAYOUT,
            element_count = elements.len(),
            content_height,
            "surface layout applied"
        );
        Ok(content_height)
    }

    /// Append one freshly inserted element below the existing layout.
    ///
    /// Supplied dimensions take precedence over measuring the element. The
    /// identifier falls back to the element's own, then to its index.
    pub fn add_element(
        &mut self,
        element: &S::Element,
        id: Option<ItemId>,
        dimensions: Option<Size>,
    ) -> LayoutResult<ItemPosition> {
        if let Some(width) = self.surface.container_width() {
            self.engine.set_container_width(width);
        }

        let size = match dimensions {
            Some(size) if !size.is_empty() => ItemSize::Intrinsic {
                width: size.width,
                height: size.height,
            },
            _ => self.measure(element),
        };
        let id = id
            .or_else(|| self.surface.element_id(element))
            .unwrap_or_else(|| ItemId::from(self.engine.items().len()));

        let position = self.engine.append(LayoutItem { id, size })?;
        self.surface.apply_position(element, &position);
        self.surface.set_content_height(self.engine.content_height());
        self.last_container_width = self.engine.container_width();
        Ok(position)
    }

    /// Relayout after the host removed an element from the surface.
    ///
    /// Returns whether the identifier had a position before the pass.
    pub fn remove_element(&mut self, id: &ItemId) -> LayoutResult<bool> {
        let known = self.engine.position(id).is_some();
        self.relayout()?;
        Ok(known)
    }

    /// Clear the layout and collapse the container.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.engine.reset();
        self.surface.set_content_height(0.0);
    }

    /// Change the column count and relayout immediately.
    pub fn set_column_count(&mut self, column_count: usize) -> LayoutResult<f32> {
        self.engine.set_column_count(column_count)?;
        self.cancel_pending();
        self.relayout()
    }

    /// Record that the container may have been resized.
    ///
    /// Schedules a relayout once `resize_debounce` passes without a further
    /// notification. Notifications that leave the container width unchanged
    /// are ignored: they come from the layout resizing the container
    /// itself. Returns whether a relayout was scheduled.
    pub fn notify_resize(&mut self, now: Instant) -> bool {
        let width = self.surface.container_width();
        if width.is_some() && width == self.last_container_width {
            tracing::trace!(target: targets::LAYOUT, "resize without width change ignored");
            return false;
        }

        self.cancel_pending();
        self.pending_relayout = Some(self.timers.start_one_shot(now, self.resize_debounce));
        true
    }

    /// Whether a debounced relayout is waiting to run.
    pub fn has_pending_relayout(&self) -> bool {
        self.pending_relayout.is_some()
    }

    /// Time until the pending relayout is due.
    pub fn time_until_relayout(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// Run the pending relayout if its deadline has passed.
    ///
    /// Returns whether a relayout ran.
    pub fn tick(&mut self, now: Instant) -> LayoutResult<bool> {
        let fired = self.timers.process_expired(now);
        match self.pending_relayout {
            Some(id) if fired.contains(&id) => {
                self.pending_relayout = None;
                self.relayout()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending_relayout.take() {
            // The timer may already have fired unobserved.
            let _ = self.timers.stop(id);
        }
    }

    /// Measured height if rendered, else the natural image ratio, else 4:3.
    fn measure(&self, element: &S::Element) -> ItemSize {
        let measured = self.surface.measured_height(element);
        if measured > 0.0 {
            return ItemSize::Measured(measured);
        }
        match self.surface.natural_size(element) {
            Some(size) if !size.is_empty() => ItemSize::Intrinsic {
                width: size.width,
                height: size.height,
            },
            _ => ItemSize::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeElement {
        id: Option<ItemId>,
        measured: f32,
        natural: Option<Size>,
    }

    #[derive(Default)]
    struct FakeSurface {
        width: Option<f32>,
        elements: Vec<FakeElement>,
        applied: HashMap<usize, ItemPosition>,
        content_height: Option<f32>,
    }

    impl LayoutSurface for FakeSurface {
        type Element = usize;

        fn container_width(&self) -> Option<f32> {
            self.width
        }

        fn elements(&self) -> Vec<usize> {
            (0..self.elements.len()).collect()
        }

        fn element_id(&self, element: &usize) -> Option<ItemId> {
            self.elements[*element].id.clone()
        }

        fn measured_height(&self, element: &usize) -> f32 {
            self.elements[*element].measured
        }

        fn natural_size(&self, element: &usize) -> Option<Size> {
            self.elements[*element].natural
        }

        fn apply_position(&mut self, element: &usize, position: &ItemPosition) {
            self.applied.insert(*element, *position);
        }

        fn set_content_height(&mut self, height: f32) {
            self.content_height = Some(height);
        }
    }

    fn surface_layout(width: f32, elements: Vec<FakeElement>) -> SurfaceLayout<FakeSurface> {
        let surface = FakeSurface {
            width: Some(width),
            elements,
            ..Default::default()
        };
        SurfaceLayout::new(surface, WaterfallEngine::new(2, 10.0).unwrap())
    }

    #[test]
    fn test_relayout_measures_and_applies() {
        let mut layout = surface_layout(
            410.0,
            vec![
                FakeElement {
                    id: Some("a".into()),
                    measured: 120.0,
                    ..Default::default()
                },
                FakeElement {
                    natural: Some(Size::new(400.0, 200.0)),
                    ..Default::default()
                },
                FakeElement::default(),
            ],
        );

        let content_height = layout.relayout().unwrap();
        let surface = layout.surface();

        assert_eq!(surface.applied[&0].height, 120.0);
        assert_eq!(surface.applied[&1].height, 100.0);
        assert_eq!(surface.applied[&1].column_index, 1);
        // Third element: 4:3 fallback into column 1 (110 < 130).
        assert_eq!(surface.applied[&2].height, 150.0);
        assert_eq!(surface.applied[&2].y, 110.0);
        assert_eq!(content_height, 260.0);
        assert_eq!(surface.content_height, Some(260.0));

        // Anonymous elements are keyed by index.
        assert!(layout.engine().position(&ItemId::from(1usize)).is_some());
        assert!(layout.engine().position(&"a".into()).is_some());
    }

    #[test]
    fn test_relayout_without_width_leaves_surface_untouched() {
        let mut layout = surface_layout(410.0, vec![FakeElement::default()]);
        layout.surface_mut().width = None;

        assert!(layout.relayout().is_err());
        assert!(layout.surface().applied.is_empty());
        assert_eq!(layout.surface().content_height, None);
    }

    #[test]
    fn test_add_element_prefers_supplied_dimensions() {
        let mut layout = surface_layout(
            410.0,
            vec![FakeElement {
                measured: 500.0,
                ..Default::default()
            }],
        );

        let position = layout
            .add_element(&0, Some(9.into()), Some(Size::new(100.0, 100.0)))
            .unwrap();
        assert_eq!(position.height, 200.0);
        assert_eq!(layout.surface().applied[&0], position);
        assert_eq!(layout.surface().content_height, Some(200.0));
        assert!(layout.engine().position(&9.into()).is_some());
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut layout = surface_layout(410.0, vec![FakeElement::default()]);
        layout.relayout().unwrap();
        let start = Instant::now();

        layout.surface_mut().width = Some(620.0);
        assert!(layout.notify_resize(start));
        assert!(layout.notify_resize(start + Duration::from_millis(60)));

        // The second notification restarted the quiet period.
        assert!(!layout.tick(start + Duration::from_millis(120)).unwrap());
        assert!(layout.tick(start + Duration::from_millis(160)).unwrap());
        assert!(!layout.has_pending_relayout());
        assert_eq!(layout.surface().applied[&0].width, 305.0);
    }

    #[test]
    fn test_resize_without_width_change_is_ignored() {
        let mut layout = surface_layout(410.0, vec![FakeElement::default()]);
        layout.relayout().unwrap();

        assert!(!layout.notify_resize(Instant::now()));
        assert!(!layout.has_pending_relayout());
    }

    #[test]
    fn test_set_column_count_relayouts_immediately() {
        let mut layout = surface_layout(
            410.0,
            vec![FakeElement::default(), FakeElement::default()],
        );
        layout.relayout().unwrap();

        layout.set_column_count(1).unwrap();
        assert_eq!(layout.surface().applied[&1].column_index, 0);
        assert_eq!(layout.surface().applied[&1].width, 410.0);
    }

    #[test]
    fn test_reset_collapses_container() {
        let mut layout = surface_layout(410.0, vec![FakeElement::default()]);
        layout.relayout().unwrap();
        layout.reset();

        assert!(layout.engine().positions().is_empty());
        assert_eq!(layout.surface().content_height, Some(0.0));
    }

    fn measured(id: &str, height: f32) -> FakeElement {
        FakeElement {
            id: Some(id.into()),
            measured: height,
            ..Default::default()
        }
    }

    #[test]
    fn test_remove_element_rebalances_remaining() {
        let mut layout = surface_layout(
            410.0,
            vec![
                measured("a", 200.0),
                measured("b", 100.0),
                measured("c", 400.0),
                measured("d", 200.0),
            ],
        );
        layout.relayout().unwrap();
        assert_eq!(layout.surface().applied[&3].column_index, 0);
        assert_eq!(layout.surface().content_height, Some(510.0));

        // The host drops "c" from the surface, then reports the removal.
        let surface = layout.surface_mut();
        surface.elements.remove(2);
        surface.applied.clear();
        assert!(layout.remove_element(&"c".into()).unwrap());

        let surface = layout.surface();
        assert_eq!(surface.applied.len(), 3);
        let d = surface.applied[&2];
        assert_eq!((d.column_index, d.x, d.y), (1, 210.0, 110.0));
        assert_eq!(surface.content_height, Some(310.0));
        assert!(layout.engine().position(&"c".into()).is_none());

        assert!(!layout.remove_element(&"zzz".into()).unwrap());
    }

    #[test]
    fn test_debounced_relayout_without_width_fails_once() {
        let mut layout = surface_layout(410.0, vec![FakeElement::default()]);
        layout.relayout().unwrap();
        let before = layout.surface().applied[&0];
        let start = Instant::now();

        layout.surface_mut().width = None;
        assert!(layout.notify_resize(start));

        let err = layout.tick(start + DEFAULT_RESIZE_DEBOUNCE).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Precondition {
                container_width: None,
                ..
            }
        ));
        assert!(!layout.has_pending_relayout());
        assert_eq!(layout.surface().applied[&0], before);
        assert!(!layout.tick(start + DEFAULT_RESIZE_DEBOUNCE * 2).unwrap());

        // A measurable width schedules again.
        layout.surface_mut().width = Some(620.0);
        assert!(layout.notify_resize(start + DEFAULT_RESIZE_DEBOUNCE * 2));
    }
}
