//! Gallery view settings.
//!
//! [`GallerySettings`] collects the values that parameterize the layout and
//! the context menu, together with the browse filters and appearance the
//! user last chose. Settings are plain serde data and are stored as TOML:
//!
//! ```toml
//! columns = 4
//! gap = 12.0
//! resize_debounce_ms = 150
//! theme = "dark"
//!
//! [menu]
//! width = 220.0
//!
//! [filters]
//! tags = ["beach", "sunset"]
//! sort_by = "created_at_asc"
//! ```
//!
//! Missing keys take their defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use photowall_core::Size;
use photowall_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutResult, SettingsError, SettingsResult};
use crate::layout::{DEFAULT_GAP, LayoutSurface, SurfaceLayout, WaterfallEngine};
use crate::menu::{ContextMenuController, MenuMetrics};

mod filters;

pub use filters::{BrowseFilters, SortOrder, ThemeMode, is_hex_color};

/// Fewest columns the gallery offers.
pub const MIN_COLUMNS: usize = 2;

/// Most columns the gallery offers.
pub const MAX_COLUMNS: usize = 6;

/// Accent color used until the user picks one.
pub const DEFAULT_ACCENT_COLOR: &str = "#4a90d9";

/// Default column count for a viewport of the given width.
///
/// Narrow (phone) viewports get 2 columns, medium ones 4 and wide ones 5.
pub fn default_columns_for_viewport(viewport_width: f32) -> usize {
    if viewport_width < 768.0 {
        2
    } else if viewport_width < 1200.0 {
        4
    } else {
        5
    }
}

/// Settings for one gallery view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySettings {
    /// Number of waterfall columns, between [`MIN_COLUMNS`] and [`MAX_COLUMNS`].
    pub columns: usize,
    /// Spacing between columns and stacked items.
    pub gap: f32,
    /// Quiet period before a container resize triggers a relayout.
    pub resize_debounce_ms: u64,
    /// Delay before a hidden context menu drops its entries.
    pub menu_cleanup_delay_ms: u64,
    pub theme: ThemeMode,
    /// `#rrggbb` accent color applied by [`ThemeMode::Custom`].
    pub accent_color: String,
    /// Context menu dimensions.
    pub menu: MenuMetrics,
    /// What the gallery lists.
    pub filters: BrowseFilters,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            columns: 5,
            gap: DEFAULT_GAP,
            resize_debounce_ms: 100,
            menu_cleanup_delay_ms: 200,
            theme: ThemeMode::default(),
            accent_color: DEFAULT_ACCENT_COLOR.to_owned(),
            menu: MenuMetrics::default(),
            filters: BrowseFilters::default(),
        }
    }
}

impl GallerySettings {
    /// Defaults with the column count chosen for the viewport width.
    pub fn for_viewport(viewport_width: f32) -> Self {
        Self {
            columns: default_columns_for_viewport(viewport_width),
            ..Self::default()
        }
    }

    /// Parse and validate settings from a TOML document.
    pub fn from_toml_str(document: &str) -> SettingsResult<Self> {
        let settings: Self = toml::from_str(document)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&document)?;
        tracing::debug!(
            target: targets::SETTINGS,
            path = %path.display(),
            columns = settings.columns,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Render the settings as a TOML document.
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> SettingsResult<()> {
        let path = path.as_ref();
        let document = self.to_toml_string()?;
        fs::write(path, document).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Change the column count if it is within range.
    ///
    /// Out-of-range values are ignored. Returns whether the value was
    /// applied.
    pub fn set_columns(&mut self, columns: usize) -> bool {
        if (MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
            self.columns = columns;
            true
        } else {
            tracing::warn!(target: targets::SETTINGS, columns, "column count out of range");
            false
        }
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    /// Change the accent color if it is a `#rrggbb` hex color.
    ///
    /// The theme mode is left alone. Returns whether the value was applied.
    pub fn set_accent_color(&mut self, color: &str) -> bool {
        if is_hex_color(color) {
            self.accent_color = color.to_owned();
            true
        } else {
            tracing::warn!(target: targets::SETTINGS, color, "accent color rejected");
            false
        }
    }

    /// Restore every default, choosing columns for the viewport if known.
    ///
    /// Filters are cleared as well.
    pub fn reset_to_defaults(&mut self, viewport_width: Option<f32>) {
        *self = match viewport_width {
            Some(width) => Self::for_viewport(width),
            None => Self::default(),
        };
    }

    /// Check every value against its accepted range.
    pub fn validate(&self) -> SettingsResult<()> {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            return Err(out_of_range("columns", self.columns));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(out_of_range("gap", self.gap));
        }
        if !is_hex_color(&self.accent_color) {
            return Err(out_of_range("accent_color", &self.accent_color));
        }
        let menu = &self.menu;
        if !(menu.width.is_finite() && menu.width > 0.0) {
            return Err(out_of_range("menu.width", menu.width));
        }
        if !(menu.row_height.is_finite() && menu.row_height > 0.0) {
            return Err(out_of_range("menu.row_height", menu.row_height));
        }
        if !(menu.separator_height.is_finite() && menu.separator_height >= 0.0) {
            return Err(out_of_range("menu.separator_height", menu.separator_height));
        }
        if !(menu.padding.is_finite() && menu.padding >= 0.0) {
            return Err(out_of_range("menu.padding", menu.padding));
        }
        Ok(())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn menu_cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.menu_cleanup_delay_ms)
    }

    /// A waterfall engine with these columns and gap.
    pub fn build_engine(&self) -> LayoutResult<WaterfallEngine> {
        WaterfallEngine::new(self.columns, self.gap)
    }

    /// A surface layout with these columns, gap and resize debounce.
    pub fn build_surface_layout<S: LayoutSurface>(
        &self,
        surface: S,
    ) -> LayoutResult<SurfaceLayout<S>> {
        Ok(SurfaceLayout::new(surface, self.build_engine()?)
            .with_resize_debounce(self.resize_debounce()))
    }

    /// A context menu with these metrics and cleanup delay.
    pub fn build_context_menu<D>(&self, viewport: Size) -> ContextMenuController<D> {
        ContextMenuController::new(viewport)
            .with_metrics(self.menu)
            .with_cleanup_delay(self.menu_cleanup_delay())
    }
}

fn out_of_range(field: &'static str, value: impl ToString) -> SettingsError {
    let value = value.to_string();
    tracing::warn!(target: targets::SETTINGS, field, %value, "setting out of range");
    SettingsError::OutOfRange { field, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns_for_viewport() {
        assert_eq!(default_columns_for_viewport(375.0), 2);
        assert_eq!(default_columns_for_viewport(767.9), 2);
        assert_eq!(default_columns_for_viewport(768.0), 4);
        assert_eq!(default_columns_for_viewport(1199.0), 4);
        assert_eq!(default_columns_for_viewport(1920.0), 5);
    }

    #[test]
    fn test_defaults() {
        let settings = GallerySettings::default();
        assert_eq!(settings.columns, 5);
        assert_eq!(settings.gap, 16.0);
        assert_eq!(settings.resize_debounce(), Duration::from_millis(100));
        assert_eq!(settings.menu_cleanup_delay(), Duration::from_millis(200));
        assert_eq!(settings.menu, MenuMetrics::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings = GallerySettings::from_toml_str(
            r#"
            columns = 3

            [menu]
            width = 240.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.columns, 3);
        assert_eq!(settings.gap, 16.0);
        assert_eq!(settings.menu.width, 240.0);
        assert_eq!(settings.menu.row_height, 40.0);
    }

    #[test]
    fn test_out_of_range_document_is_rejected() {
        let err = GallerySettings::from_toml_str("columns = 9").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::OutOfRange {
                field: "columns",
                ..
            }
        ));

        let err = GallerySettings::from_toml_str("gap = -4.0").unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { field: "gap", .. }));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            GallerySettings::from_toml_str("columns = \"many\""),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_set_columns_ignores_out_of_range() {
        let mut settings = GallerySettings::default();
        assert!(settings.set_columns(6));
        assert!(!settings.set_columns(1));
        assert!(!settings.set_columns(7));
        assert_eq!(settings.columns, 6);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut settings = GallerySettings::default();
        settings.gap = 4.0;
        settings.set_columns(3);
        settings.filters.add_tag("beach");
        settings.set_theme(ThemeMode::Light);

        settings.reset_to_defaults(Some(800.0));
        assert_eq!(settings, GallerySettings::for_viewport(800.0));
        assert_eq!(settings.columns, 4);

        settings.reset_to_defaults(None);
        assert_eq!(settings, GallerySettings::default());
    }

    #[test]
    fn test_filters_and_theme_in_document() {
        let settings = GallerySettings::from_toml_str(
            r##"
            theme = "custom"
            accent_color = "#ff8800"

            [filters]
            tags = ["beach"]
            liked_by_me = true
            sort_by = "random"
            "##,
        )
        .unwrap();

        assert_eq!(settings.theme, ThemeMode::Custom);
        assert_eq!(settings.accent_color, "#ff8800");
        assert_eq!(settings.filters.tags, ["beach"]);
        assert!(settings.filters.liked_by_me);
        assert_eq!(settings.filters.sort_by, SortOrder::Random);
        assert!(settings.filters.users.is_empty());
    }

    #[test]
    fn test_accent_color_is_validated() {
        let mut settings = GallerySettings::default();
        assert!(!settings.set_accent_color("orange"));
        assert_eq!(settings.accent_color, DEFAULT_ACCENT_COLOR);
        assert!(settings.set_accent_color("#00aa55"));
        assert_eq!(settings.theme, ThemeMode::System);

        let err = GallerySettings::from_toml_str("accent_color = \"#12\"").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::OutOfRange {
                field: "accent_color",
                ..
            }
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = GallerySettings::for_viewport(500.0);
        settings.gap = 10.0;
        settings.set_theme(ThemeMode::Dark);
        settings.filters.set_tags(["night", "city"]);
        settings.filters.set_users(vec![12]);
        let document = settings.to_toml_string().unwrap();
        assert_eq!(GallerySettings::from_toml_str(&document).unwrap(), settings);
    }

    #[test]
    fn test_builders_apply_settings() {
        let settings = GallerySettings::for_viewport(1000.0);
        let engine = settings.build_engine().unwrap();
        assert_eq!(engine.column_count(), 4);
        assert_eq!(engine.gap(), 16.0);

        let menu = settings.build_context_menu::<()>(Size::new(1000.0, 700.0));
        assert_eq!(menu.metrics(), &settings.menu);
    }
}
