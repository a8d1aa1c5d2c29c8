//! Demo configuration, read from JSON. Every field has a default, so a config
//! file only needs to name what it changes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::engine::font;
use crate::types::Color;

/// Largest presented edge, in pixels.
pub const MAX_WINDOW_EDGE: u32 = 16_384;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Off-screen canvas size in pixels.
    pub screen_width: u32,
    pub screen_height: u32,
    /// Integer upscale applied when presenting.
    pub scale: u32,
    /// Fixed simulation rate (ticks per second).
    pub fps: u32,
    pub message: String,
    pub font: FontConfig,
    pub palette: Palette,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// PNG glyph sheet. The built-in font is used when unset.
    pub path: Option<PathBuf>,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Number of cells to slice from the sheet; 0 takes all of them.
    pub cell_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub checker_a: Color,
    pub checker_b: Color,
    pub floor_top: Color,
    pub floor_bottom: Color,
    pub copper_up_top: Color,
    pub copper_up_bottom: Color,
    pub copper_down_top: Color,
    pub copper_down_bottom: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            screen_width: 320,
            screen_height: 200,
            scale: 1,
            fps: 60,
            message: "Amiga Style Scroller with Rust".into(),
            font: FontConfig::default(),
            palette: Palette::default(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            path: None,
            cell_width: 32,
            cell_height: 25,
            cell_count: 48,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            checker_a: Color::BLACK,
            checker_b: Color::DARK_GREEN,
            floor_top: Color::BLACK,
            floor_bottom: Color::DARK_GREEN,
            copper_up_top: Color::rgb(64, 0, 0),
            copper_up_bottom: Color::RED,
            copper_down_top: Color::rgb(32, 0, 0),
            copper_down_bottom: Color::DARK_RED,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings { quit: "Esc".into() }
    }
}

impl DemoConfig {
    /// Load from an explicit path. Any failure is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: DemoConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the per-user config, falling back to defaults when it is missing
    /// or unusable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str::<DemoConfig>(&json) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        tracing::info!(path = %config_path.display(), "loaded config");
                        config
                    }
                    Err(e) => {
                        tracing::warn!("invalid config ({e:#}), using defaults");
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("invalid config ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(path = %config_path.display(), "no config file, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.screen_width > 0 && self.screen_height > 0,
            "screen size must be non-zero, got {}x{}",
            self.screen_width,
            self.screen_height
        );
        ensure!(self.scale > 0, "scale must be at least 1");
        ensure!(self.fps > 0, "fps must be at least 1");
        ensure!(
            self.font.cell_width > 0 && self.font.cell_height > 0,
            "font cell size must be non-zero"
        );
        if self.font.path.is_none() {
            ensure!(
                self.font.cell_width >= font::MIN_CELL && self.font.cell_height >= font::MIN_CELL,
                "built-in font needs cells of at least {0}x{0}, got {1}x{2}",
                font::MIN_CELL,
                self.font.cell_width,
                self.font.cell_height
            );
        }
        let fits = |edge: u32| {
            edge.checked_mul(self.scale)
                .is_some_and(|scaled| scaled <= MAX_WINDOW_EDGE)
        };
        ensure!(
            fits(self.screen_width) && fits(self.screen_height),
            "scaled window {}x{} times {} exceeds {MAX_WINDOW_EDGE} pixels per edge",
            self.screen_width,
            self.screen_height,
            self.scale
        );
        Ok(())
    }

    /// Presented size: the canvas times the integer scale.
    pub fn window_size(&self) -> (u32, u32) {
        (self.screen_width * self.scale, self.screen_height * self.scale)
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("amiga-scroller");
        path.push("config.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(ch) = binding.strip_prefix("Ctrl-") {
        if !event.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        return match ch.chars().next() {
            Some(c) => event.code == KeyCode::Char(c),
            None => false,
        };
    }

    // Plain bindings never fire with Ctrl or Alt held.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }

    match binding {
        "Esc" => event.code == KeyCode::Esc,
        "Enter" => event.code == KeyCode::Enter,
        "Space" => event.code == KeyCode::Char(' '),
        "Backspace" => event.code == KeyCode::Backspace,
        s => {
            if let Some(rest) = s.strip_prefix('F') {
                if let Ok(n) = rest.parse::<u8>() {
                    return event.code == KeyCode::F(n);
                }
            }
            match s.chars().next() {
                Some(c) => event.code == KeyCode::Char(c),
                None => false,
            }
        }
    }
}
