//! Configuration management for audiojoin.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Defaults for every missing field
//!
//! # Example
//!
//! ```no_run
//! use audiojoin_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/audiojoin.toml");
//! config.load_or_create().unwrap();
//!
//! println!("ffmpeg: {}", config.settings().tools.ffmpeg_path);
//!
//! config.settings_mut().join.overwrite_output = false;
//! config.update_section(ConfigSection::Join).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, JoinSettings, LoggingSettings, PathSettings, Settings, ToolSettings,
};
