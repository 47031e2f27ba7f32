//! Property-based invariant tests for the waterfall layout.
//!
//! 1. Determinism: the same input always yields the same positions.
//! 2. No overlap: items stacked in one column never overlap.
//! 3. Content height equals the tallest column sum minus one gap.
//! 4. Column balance: with equal items, columns differ by at most one
//!    item plus gap.
//! 5. Every item sits at `column * (column_width + gap)` with the column width.
//! 6. Appending one by one matches a full pass.

use photowall::layout::WaterfallEngine;
use photowall::model::{ItemSize, LayoutItem};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Scenario {
    column_count: usize,
    gap: f32,
    container_width: f32,
    items: Vec<LayoutItem>,
}

fn item_size() -> impl Strategy<Value = ItemSize> {
    prop_oneof![
        4 => (1.0f32..4000.0, 1.0f32..4000.0)
            .prop_map(|(width, height)| ItemSize::Intrinsic { width, height }),
        1 => (0.0f32..800.0).prop_map(ItemSize::Measured),
        1 => Just(ItemSize::Unknown),
    ]
}

fn scenario(max_items: usize) -> impl Strategy<Value = Scenario> {
    (
        1usize..=6,
        0.0f32..32.0,
        200.0f32..2000.0,
        proptest::collection::vec(item_size(), 1..=max_items),
    )
        .prop_map(|(column_count, gap, container_width, sizes)| Scenario {
            column_count,
            gap,
            container_width,
            items: sizes
                .into_iter()
                .enumerate()
                .map(|(index, size)| LayoutItem {
                    id: index.into(),
                    size,
                })
                .collect(),
        })
}

fn engine_for(scenario: &Scenario) -> WaterfallEngine {
    let mut engine = WaterfallEngine::new(scenario.column_count, scenario.gap).unwrap();
    engine.set_container_width(scenario.container_width);
    engine
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(b.abs()).max(1.0)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(scenario in scenario(60)) {
        let mut first = engine_for(&scenario);
        let mut second = engine_for(&scenario);
        first.layout(&scenario.items).unwrap();
        second.layout(&scenario.items).unwrap();
        prop_assert_eq!(first.positions(), second.positions());

        // Relaying out the same engine is stable too.
        let before = first.positions().clone();
        first.relayout().unwrap();
        prop_assert_eq!(first.positions(), &before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. No overlap within a column
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn column_items_do_not_overlap(scenario in scenario(60)) {
        let mut engine = engine_for(&scenario);
        engine.layout(&scenario.items).unwrap();

        let mut last_bottom = vec![None::<f32>; scenario.column_count];
        for (id, position) in engine.positions() {
            if let Some(bottom) = last_bottom[position.column_index] {
                prop_assert!(
                    position.y >= bottom + scenario.gap || approx_eq(position.y, bottom + scenario.gap),
                    "item {} at y={} overlaps previous bottom {}",
                    id, position.y, bottom
                );
            }
            last_bottom[position.column_index] = Some(position.bottom());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Content height
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn content_height_is_tallest_column_minus_gap(scenario in scenario(60)) {
        let mut engine = engine_for(&scenario);
        let content_height = engine.layout(&scenario.items).unwrap();

        let mut sums = vec![0.0f32; scenario.column_count];
        for (_, position) in engine.positions() {
            sums[position.column_index] += position.height + scenario.gap;
        }
        let tallest = sums.iter().copied().fold(0.0f32, f32::max);

        prop_assert!(
            approx_eq(content_height, (tallest - scenario.gap).max(0.0)),
            "content height {} vs expected {}",
            content_height,
            tallest - scenario.gap
        );
        prop_assert_eq!(content_height, engine.content_height());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Column balance
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn equal_items_stay_balanced(
        column_count in 1usize..=6,
        gap in 0.0f32..32.0,
        ratio in 0.2f32..3.0,
        count in 1usize..80,
    ) {
        let mut engine = WaterfallEngine::new(column_count, gap).unwrap();
        engine.set_container_width(1200.0);
        let items: Vec<LayoutItem> = (0..count)
            .map(|index| LayoutItem::with_dimensions(index, 100.0, 100.0 * ratio))
            .collect();
        engine.layout(&items).unwrap();

        let item_height = engine.column_width() * ratio;
        let heights = engine.column_heights();
        let tallest = heights.iter().copied().fold(f32::MIN, f32::max);
        let shortest = heights.iter().copied().fold(f32::MAX, f32::min);
        let spread = tallest - shortest;
        prop_assert!(
            spread <= item_height + gap || approx_eq(spread, item_height + gap),
            "columns {:?} differ by more than one item ({})",
            heights,
            item_height + gap
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Horizontal placement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn items_are_aligned_to_columns(scenario in scenario(40)) {
        let mut engine = engine_for(&scenario);
        engine.layout(&scenario.items).unwrap();
        let column_width = engine.column_width();

        for (_, position) in engine.positions() {
            prop_assert!(position.column_index < scenario.column_count);
            prop_assert_eq!(position.width, column_width);
            prop_assert!(approx_eq(
                position.x,
                position.column_index as f32 * (column_width + scenario.gap)
            ));
            prop_assert!(position.height >= 0.0);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Incremental append matches a full pass
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn append_matches_full_layout(scenario in scenario(40)) {
        let mut full = engine_for(&scenario);
        full.layout(&scenario.items).unwrap();

        let mut incremental = engine_for(&scenario);
        for item in &scenario.items {
            incremental.append(item.clone()).unwrap();
        }

        prop_assert_eq!(full.positions(), incremental.positions());
        prop_assert_eq!(full.content_height(), incremental.content_height());
    }
}
