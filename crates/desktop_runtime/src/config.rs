//! Geometry and timing defaults recognized by the window manager.
//!
//! Every option only changes a default (a size, an offset, a delay); none of them switches
//! behavior on or off.

use serde::{Deserialize, Serialize};

use crate::error::WmError;

/// Default minimum window width in pixels.
pub const MIN_WINDOW_WIDTH: i32 = 200;
/// Default minimum window height in pixels.
pub const MIN_WINDOW_HEIGHT: i32 = 150;
/// Default base value for the stacking counter.
pub const DEFAULT_Z_INDEX_BASE: u32 = 100;
/// Default hover delay before a submenu opens.
pub const SUBMENU_HOVER_DELAY_MS: u32 = 300;
/// Default horizontal offset of a submenu from its trigger item's right edge.
pub const SUBMENU_OFFSET_X: i32 = -3;
/// Default vertical offset of a submenu from its trigger item's top edge.
pub const SUBMENU_OFFSET_Y: i32 = -3;
/// Default taskbar height subtracted from the viewport when maximizing.
pub const TASKBAR_HEIGHT: i32 = 28;
/// Bottom margin kept free when a window is placed at a random position.
pub const PLACEMENT_BOTTOM_MARGIN: i32 = 40;
/// Refresh period of the taskbar clock.
pub const CLOCK_UPDATE_INTERVAL_MS: u32 = 60_000;
/// Icon used by windows that do not supply one.
pub const DEFAULT_WINDOW_ICON: &str = "icons/windows-0.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Window manager configuration.
pub struct WmConfig {
    /// Smallest width a window may be resized to.
    pub min_window_width: i32,
    /// Smallest height a window may be resized to.
    pub min_window_height: i32,
    /// Starting value of the stacking counter; the first window gets `base + 1`.
    pub z_index_base: u32,
    /// Debounce before a hovered submenu trigger opens its submenu.
    pub submenu_hover_delay_ms: u32,
    /// Horizontal submenu offset.
    pub submenu_offset_x: i32,
    /// Vertical submenu offset.
    pub submenu_offset_y: i32,
    /// Taskbar height in pixels.
    pub taskbar_height: i32,
    /// Space left below randomly placed windows.
    pub placement_bottom_margin: i32,
    /// Icon for windows created without one.
    pub default_icon: String,
    pub clock_update_interval_ms: u32,
    /// Fixed seed for window placement; hosts seed from the clock when unset.
    pub placement_seed: Option<u64>,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            min_window_width: MIN_WINDOW_WIDTH,
            min_window_height: MIN_WINDOW_HEIGHT,
            z_index_base: DEFAULT_Z_INDEX_BASE,
            submenu_hover_delay_ms: SUBMENU_HOVER_DELAY_MS,
            submenu_offset_x: SUBMENU_OFFSET_X,
            submenu_offset_y: SUBMENU_OFFSET_Y,
            taskbar_height: TASKBAR_HEIGHT,
            placement_bottom_margin: PLACEMENT_BOTTOM_MARGIN,
            default_icon: DEFAULT_WINDOW_ICON.to_string(),
            clock_update_interval_ms: CLOCK_UPDATE_INTERVAL_MS,
            placement_seed: None,
        }
    }
}

impl WmConfig {
    /// Parses a JSON object; missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::ConfigParse`] for malformed JSON and [`WmError::InvalidConfig`] when a
    /// value fails [`WmConfig::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, WmError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that minimum sizes and the taskbar height are usable.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), WmError> {
        if self.min_window_width <= 0 {
            return Err(WmError::InvalidConfig(
                "min_window_width must be positive".to_string(),
            ));
        }
        if self.min_window_height <= 0 {
            return Err(WmError::InvalidConfig(
                "min_window_height must be positive".to_string(),
            ));
        }
        if self.taskbar_height < 0 {
            return Err(WmError::InvalidConfig(
                "taskbar_height must not be negative".to_string(),
            ));
        }
        if self.clock_update_interval_ms == 0 {
            return Err(WmError::InvalidConfig(
                "clock_update_interval_ms must be positive".to_string(),
            ));
        }
        if self.placement_bottom_margin < 0 {
            return Err(WmError::InvalidConfig(
                "placement_bottom_margin must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_json_keeps_defaults_for_missing_keys() {
        let config =
            WmConfig::from_json_str(r#"{ "min_window_width": 320, "taskbar_height": 38 }"#)
                .expect("parse config");

        assert_eq!(config.min_window_width, 320);
        assert_eq!(config.taskbar_height, 38);
        assert_eq!(config.min_window_height, MIN_WINDOW_HEIGHT);
        assert_eq!(config.z_index_base, DEFAULT_Z_INDEX_BASE);
        assert_eq!(config.submenu_hover_delay_ms, SUBMENU_HOVER_DELAY_MS);
        assert_eq!(config.clock_update_interval_ms, CLOCK_UPDATE_INTERVAL_MS);
    }

    #[test]
    fn zero_clock_interval_is_rejected() {
        let err = WmConfig::from_json_str(r#"{ "clock_update_interval_ms": 0 }"#)
            .expect_err("zero interval rejected");
        assert!(matches!(err, WmError::InvalidConfig(_)));
    }

    #[test]
    fn non_positive_minimums_are_rejected() {
        let err = WmConfig::from_json_str(r#"{ "min_window_height": 0 }"#)
            .expect_err("zero height rejected");
        assert!(matches!(err, WmError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = WmConfig::from_json_str("{ nope").expect_err("malformed json");
        assert!(matches!(err, WmError::ConfigParse(_)));
    }
}
