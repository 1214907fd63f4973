//! Board configuration
//!
//! Compile-time defaults (`BOARD_API_BASE`, `BOARD_FOLDER_ID`) with runtime
//! overrides from the page URL.

use leptos::prelude::*;

use crate::history::parse_query_param;

/// Rendered height of one card, in pixels
pub const DEFAULT_CARD_HEIGHT_PX: f64 = 140.0;
/// Spare rows every column reserves below its cards
pub const DEFAULT_MIN_CARD_ROWS: f64 = 1.5;
pub const DEFAULT_FOLDER_ID: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Empty means same origin
    pub api_base: String,
    pub folder_id: String,
    pub card_height_px: f64,
    pub min_card_rows: f64,
    /// Serve the built-in sample board instead of calling the service
    pub demo: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base: option_env!("BOARD_API_BASE").unwrap_or("").to_string(),
            folder_id: option_env!("BOARD_FOLDER_ID").unwrap_or(DEFAULT_FOLDER_ID).to_string(),
            card_height_px: DEFAULT_CARD_HEIGHT_PX,
            min_card_rows: DEFAULT_MIN_CARD_ROWS,
            demo: option_env!("BOARD_DEMO").is_some_and(is_truthy),
        }
    }
}

impl BoardConfig {
    /// Apply `?folder=<id>` and `?demo=1` from a query string
    pub fn with_query(mut self, search: &str) -> Self {
        if let Some(folder) = parse_query_param(search, "folder") {
            self.folder_id = folder;
        }
        if let Some(demo) = parse_query_param(search, "demo") {
            self.demo = is_truthy(&demo);
        }
        self
    }

    /// Defaults overridden by the current page URL
    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Self::default().with_query(&search)
    }

    /// Minimum column body height for `rows` rows of cards
    pub fn min_body_height_px(&self, rows: f64) -> f64 {
        rows * self.card_height_px
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "yes" | "on")
}

pub fn use_config() -> BoardConfig {
    expect_context::<BoardConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_overrides_folder() {
        let config = BoardConfig::default().with_query("?folder=IEAB123&task=t1");
        assert_eq!(config.folder_id, "IEAB123");
        assert_eq!(config.card_height_px, 140.0);

        let untouched = BoardConfig::default().with_query("?task=t1");
        assert_eq!(untouched.folder_id, BoardConfig::default().folder_id);
    }

    #[test]
    fn test_demo_flag() {
        assert!(BoardConfig::default().with_query("?demo=1").demo);
        assert!(!BoardConfig::default().with_query("?demo=0").demo);
    }

    #[test]
    fn test_min_body_height() {
        let config = BoardConfig::default();
        assert_eq!(config.min_body_height_px(config.min_card_rows), 210.0);
        assert_eq!(config.min_body_height_px(9.5), 1330.0);
    }
}
