//! Persisted editor preferences.

use crate::editor::EditorStyle;
use crate::node::DEFAULT_NODE_BACKGROUND;
use crate::viewport::FitViewOptions;
use anyhow::Context;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub style: EditorStyle,
    pub fit_view: FitViewOptions,
    /// Fit the view around new nodes added from the toolbar.
    pub fit_view_on_add: bool,
    pub default_background: Color32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            style: EditorStyle::default(),
            fit_view: FitViewOptions::default(),
            fit_view_on_add: true,
            default_background: DEFAULT_NODE_BACKGROUND,
        }
    }
}

/// `<config dir>/flow_canvas/settings.json`, or the working directory when
/// the platform has no config dir.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("flow_canvas"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_FILE)
}

impl AppSettings {
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Self =
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
        anyhow::ensure!(
            settings.fit_view.has_valid_zoom_range(),
            "{}: fit_view zoom range {}..{} is empty or not positive",
            path.display(),
            settings.fit_view.min_zoom,
            settings.fit_view.max_zoom
        );
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Loads settings, falling back to defaults when the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {:#}", e);
                Self::default()
            }
        }
    }
}
