//! Browse filters and appearance choices.

use photowall_core::logging::targets;
use serde::{Deserialize, Serialize};

/// Color scheme of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the platform preference.
    #[default]
    System,
    /// Use the configured accent color.
    Custom,
}

/// Order in which the photo listing is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    CreatedAtDesc,
    /// Oldest first.
    CreatedAtAsc,
    Random,
}

/// Which photos the gallery lists.
///
/// The filters only describe the request the host sends to the photo
/// listing. Every mutator returns whether the filters changed; a change
/// means the listing will be replaced, so the host resets the layout and
/// the selection before laying out the new items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseFilters {
    /// Tags a photo must carry, in the order they were chosen.
    pub tags: Vec<String>,
    /// Uploaders to restrict the listing to.
    pub users: Vec<i64>,
    /// Only photos the current user liked.
    pub liked_by_me: bool,
    pub sort_by: SortOrder,
}

impl BrowseFilters {
    /// Whether anything narrows the listing.
    pub fn is_active(&self) -> bool {
        !self.tags.is_empty() || !self.users.is_empty() || self.liked_by_me
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|selected| selected == tag)
    }

    /// Replace the tag filter. Blank and repeated tags are dropped.
    pub fn set_tags<I>(&mut self, tags: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut next: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !tag.trim().is_empty() && !next.contains(&tag) {
                next.push(tag);
            }
        }
        self.replace(|filters| &mut filters.tags, next)
    }

    /// Add a tag unless it is blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if tag.trim().is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_owned());
        tracing::debug!(target: targets::SETTINGS, tag, "tag filter added");
        true
    }

    /// Remove a tag if present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|selected| selected != tag);
        let removed = self.tags.len() != before;
        if removed {
            tracing::debug!(target: targets::SETTINGS, tag, "tag filter removed");
        }
        removed
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            self.remove_tag(tag)
        } else {
            self.add_tag(tag)
        }
    }

    pub fn clear_tags(&mut self) -> bool {
        self.replace(|filters| &mut filters.tags, Vec::new())
    }

    pub fn set_users(&mut self, users: Vec<i64>) -> bool {
        self.replace(|filters| &mut filters.users, users)
    }

    pub fn set_liked_by_me(&mut self, liked_by_me: bool) -> bool {
        self.replace(|filters| &mut filters.liked_by_me, liked_by_me)
    }

    pub fn set_sort_by(&mut self, sort_by: SortOrder) -> bool {
        self.replace(|filters| &mut filters.sort_by, sort_by)
    }

    /// Drop every filter and restore the default order.
    pub fn clear(&mut self) -> bool {
        let changed = *self != Self::default();
        *self = Self::default();
        changed
    }

    fn replace<V, F>(&mut self, field: F, value: V) -> bool
    where
        V: PartialEq,
        F: FnOnce(&mut Self) -> &mut V,
    {
        let slot = field(self);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}

/// Whether `color` is a `#rrggbb` hex color.
pub fn is_hex_color(color: &str) -> bool {
    color.strip_prefix('#').is_some_and(|digits| {
        digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}
