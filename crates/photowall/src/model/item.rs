//! Item identity and layout dimensions.
//!
//! The gallery never owns photo records. Hosts hand in items carrying an
//! identifier and, for layout, whatever dimensions they know.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque item identifier.
///
/// Photo records are keyed either by a numeric database id or by a string
/// key. Both forms (de)serialize as a bare JSON/TOML number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// A numeric identifier.
    Number(i64),
    /// A textual identifier.
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for ItemId {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<usize> for ItemId {
    fn from(value: usize) -> Self {
        Self::Number(value as i64)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Anything that can be identified inside a selection.
pub trait Selectable {
    /// The identifier of this item.
    fn item_id(&self) -> ItemId;
}

impl Selectable for ItemId {
    fn item_id(&self) -> ItemId {
        self.clone()
    }
}

impl<T: Selectable + ?Sized> Selectable for &T {
    fn item_id(&self) -> ItemId {
        (**self).item_id()
    }
}

/// What the host knows about an item's size at layout time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ItemSize {
    /// Intrinsic pixel dimensions; only the aspect ratio is used.
    Intrinsic { width: f32, height: f32 },
    /// A height measured on the rendering surface.
    ///
    /// Finite non-negative heights are used unchanged. Negative heights
    /// are clamped to zero and non-finite ones fall back to 4:3.
    Measured(f32),
    /// Nothing is known yet; the 4:3 fallback applies.
    #[default]
    Unknown,
}

impl ItemSize {
    /// Height-to-width ratio used when nothing is known about an item (4:3).
    pub const FALLBACK_RATIO: f32 = 0.75;

    /// The height this item occupies in a column of the given width.
    ///
    /// Intrinsic dimensions that are not both positive fall back to 4:3, as
    /// do [`ItemSize::Unknown`] and non-finite measured heights. Negative
    /// measured heights are clamped to zero.
    pub fn height_in_column(&self, column_width: f32) -> f32 {
        match *self {
            Self::Intrinsic { width, height } if width > 0.0 && height > 0.0 => {
                height / width * column_width
            }
            Self::Measured(height) if height.is_finite() => height.max(0.0),
            _ => column_width * Self::FALLBACK_RATIO,
        }
    }
}

/// An item handed to the waterfall layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct LayoutItem {
    pub id: ItemId,
    pub size: ItemSize,
}

impl LayoutItem {
    /// An item with intrinsic pixel dimensions.
    pub fn with_dimensions(id: impl Into<ItemId>, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            size: ItemSize::Intrinsic { width, height },
        }
    }

    /// An item with a directly measured height.
    ///
    /// The height is placed as given. A negative height occupies no space
    /// and a NaN or infinite one is treated as unknown (4:3).
    pub fn measured(id: impl Into<ItemId>, height: f32) -> Self {
        Self {
            id: id.into(),
            size: ItemSize::Measured(height),
        }
    }

    /// An item whose dimensions are not known yet.
    pub fn unknown(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            size: ItemSize::Unknown,
        }
    }
}

impl Selectable for LayoutItem {
    fn item_id(&self) -> ItemId {
        self.id.clone()
    }
}

/// Wire shape of a photo record: `{ "id": .., "width": .., "height": .. }`.
///
/// Additional record fields are ignored. Both dimensions are required for
/// an intrinsic size; a lone `height` says nothing about the aspect ratio.
/// A height measured on screen travels as `measured_height`.
#[derive(Serialize, Deserialize)]
struct ItemRecord {
    id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    measured_height: Option<f32>,
}

impl From<ItemRecord> for LayoutItem {
    fn from(record: ItemRecord) -> Self {
        let size = match (record.measured_height, record.width, record.height) {
            (Some(height), _, _) => ItemSize::Measured(height),
            (None, Some(width), Some(height)) => ItemSize::Intrinsic { width, height },
            _ => ItemSize::Unknown,
        };
        Self {
            id: record.id,
            size,
        }
    }
}

impl From<LayoutItem> for ItemRecord {
    fn from(item: LayoutItem) -> Self {
        let (width, height, measured_height) = match item.size {
            ItemSize::Intrinsic { width, height } => (Some(width), Some(height), None),
            ItemSize::Measured(height) => (None, None, Some(height)),
            ItemSize::Unknown => (None, None, None),
        };
        Self {
            id: item.id,
            width,
            height,
            measured_height,
        }
    }
}
