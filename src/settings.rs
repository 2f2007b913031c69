use std::path::{Path, PathBuf};

use crate::canvas::{Color, DEFAULT_INK, MAX_CANVAS_DIM, format_hex_color, parse_hex_color};

/// Smallest and largest brush diameters the editor accepts.
pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 100;

/// Editor defaults that persist across sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct AppSettings {
    /// Size of a new blank canvas
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Brush / eraser / line diameter in pixels
    pub brush_size: u32,
    /// Initial ink color
    pub ink_color: Color,
    /// Suggested download name for exported drawings
    pub export_name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            brush_size: 5,
            ink_color: DEFAULT_INK,
            export_name: "drawing.png".to_string(),
        }
    }
}

impl AppSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelpad/pixelpad_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\Pixelpad\pixelpad_settings.cfg
    /// On macOS:   ~/Library/Application Support/Pixelpad/pixelpad_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("pixelpad");
            return Some(config_dir.join("pixelpad_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(
                PathBuf::from(appdata)
                    .join("Pixelpad")
                    .join("pixelpad_settings.cfg"),
            );
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("Pixelpad")
                    .join("pixelpad_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("pixelpad_settings.cfg")))
        }
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse `key=value` lines. Unknown keys are skipped and unreadable
    /// values keep their default.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "canvas_width" => {
                    if let Ok(v) = val.parse::<u32>() {
                        s.canvas_width = v.clamp(1, MAX_CANVAS_DIM);
                    }
                }
                "canvas_height" => {
                    if let Ok(v) = val.parse::<u32>() {
                        s.canvas_height = v.clamp(1, MAX_CANVAS_DIM);
                    }
                }
                "brush_size" => {
                    if let Ok(v) = val.parse::<u32>() {
                        s.brush_size = v.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
                    }
                }
                "ink_color" => {
                    if let Some(c) = parse_hex_color(val) {
                        s.ink_color = c;
                    }
                }
                "export_name" => {
                    if !val.is_empty() {
                        s.export_name = val.to_string();
                    }
                }
                _ => {}
            }
        }
        s
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "canvas_width={}\n\
             canvas_height={}\n\
             brush_size={}\n\
             ink_color={}\n\
             export_name={}\n",
            self.canvas_width,
            self.canvas_height,
            self.brush_size,
            format_hex_color(self.ink_color),
            self.export_name,
        )
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Err(e) = self.save_to(&path) {
            crate::log_warn!("could not write settings {}: {}", path.display(), e);
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_config_string())
    }
}
