//! Core configuration resource.
//!
//! Layout constants of the menu widget and the window size used to center
//! the debug scene. Defaults are safe without any file; an INI file only
//! overrides the values it names.
//!
//! # Configuration File Format
//!
//! ```ini
//! [menu]
//! item_start_x = 30
//! item_start_y = 25
//! item_margin = 10
//! cursor_width = 30
//! cursor_height = 30
//!
//! [window]
//! width = 1280
//! height = 900
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;

use crate::error::CoreError;

const DEFAULT_ITEM_START_X: f32 = 30.0;
const DEFAULT_ITEM_START_Y: f32 = 25.0;
const DEFAULT_ITEM_MARGIN: f32 = 10.0;
const DEFAULT_CURSOR_WIDTH: f32 = 30.0;
const DEFAULT_CURSOR_HEIGHT: f32 = 30.0;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 900;
const DEFAULT_CONFIG_PATH: &str = "./stagehand.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// Horizontal inset of menu items inside their container.
    pub item_start_x: f32,
    /// Vertical inset of the first menu item.
    pub item_start_y: f32,
    /// Gap between two stacked items.
    pub item_margin: f32,
    pub cursor_width: f32,
    pub cursor_height: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub config_path: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfig {
    pub fn new() -> Self {
        Self {
            item_start_x: DEFAULT_ITEM_START_X,
            item_start_y: DEFAULT_ITEM_START_Y,
            item_margin: DEFAULT_ITEM_MARGIN,
            cursor_width: DEFAULT_CURSOR_WIDTH,
            cursor_height: DEFAULT_CURSOR_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), CoreError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| CoreError::Config(format!("failed to load config file: {}", e)))?;

        // [menu] section
        if let Some(x) = config.getfloat("menu", "item_start_x").ok().flatten() {
            self.item_start_x = x as f32;
        }
        if let Some(y) = config.getfloat("menu", "item_start_y").ok().flatten() {
            self.item_start_y = y as f32;
        }
        if let Some(margin) = config.getfloat("menu", "item_margin").ok().flatten() {
            self.item_margin = margin as f32;
        }
        if let Some(w) = config.getfloat("menu", "cursor_width").ok().flatten() {
            self.cursor_width = w as f32;
        }
        if let Some(h) = config.getfloat("menu", "cursor_height").ok().flatten() {
            self.cursor_height = h as f32;
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }

        info!(
            "Loaded config: items at ({}, {}) margin {}, cursor {}x{}, window {}x{}",
            self.item_start_x,
            self.item_start_y,
            self.item_margin,
            self.cursor_width,
            self.cursor_height,
            self.window_width,
            self.window_height
        );

        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), CoreError> {
        let mut config = Ini::new();

        config.set("menu", "item_start_x", Some(self.item_start_x.to_string()));
        config.set("menu", "item_start_y", Some(self.item_start_y.to_string()));
        config.set("menu", "item_margin", Some(self.item_margin.to_string()));
        config.set("menu", "cursor_width", Some(self.cursor_width.to_string()));
        config.set("menu", "cursor_height", Some(self.cursor_height.to_string()));

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| CoreError::Config(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stagehand-{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = CoreConfig::new();
        assert_eq!(config.item_start_x, 30.0);
        assert_eq!(config.item_start_y, 25.0);
        assert_eq!(config.item_margin, 10.0);
        assert_eq!((config.cursor_width, config.cursor_height), (30.0, 30.0));
        assert_eq!(config.window_size(), (1280, 900));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let mut config = CoreConfig::with_path(temp_path("missing"));
        assert!(matches!(config.load_from_file(), Err(CoreError::Config(_))));
        assert_eq!(config.item_margin, 10.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[menu]\nitem_margin = 4\n[window]\nwidth = 800\n").unwrap();
        let mut config = CoreConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.item_margin, 4.0);
        assert_eq!(config.item_start_x, 30.0);
        assert_eq!(config.window_size(), (800, 900));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let mut config = CoreConfig::with_path(&path);
        config.cursor_width = 12.0;
        config.window_height = 480;
        config.save_to_file().unwrap();

        let mut loaded = CoreConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(path);
    }
}
