//! Game settings
//!
//! Stored as JSON next to the game. Missing fields fall back to defaults,
//! so a settings file only needs the values it changes.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::clock::FixedClock;
use crate::sim::camera::Camera;
use crate::sim::stage::StageSource;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Presentation surface the camera is sized for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen pixels
    pub width: f32,
    pub height: f32,
    /// Screen pixels per world unit
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            scale: 3.0,
        }
    }
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Stages ===
    /// Stage images in play order
    pub stages: Vec<PathBuf>,

    // === Timing ===
    /// Simulation steps per second
    pub tick_rate: f64,
    /// Redraws per second
    pub draw_rate: f64,
    /// Real-time backlog (seconds) above which pending steps are dropped
    pub max_backlog: f64,
    /// Simulated seconds per real second
    pub time_scale: f32,

    // === View ===
    /// Camera smoothing (1 = locked to the player)
    pub camera_lerp: f32,
    pub viewport: Viewport,
    /// Seed for decorative tile variety
    pub decor_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stages: ["stage.bmp", "stage2.bmp", "stage3.bmp"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),

            tick_rate: TICK_RATE,
            draw_rate: TICK_RATE,
            max_backlog: MAX_BACKLOG_SECS,
            time_scale: 1.0,

            camera_lerp: 1.0,
            viewport: Viewport::default(),
            decor_seed: 1,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Stage sources, resolving relative paths against `base`
    pub fn stage_sources(&self, base: &Path) -> Vec<StageSource> {
        self.stages
            .iter()
            .map(|p| StageSource::File(base.join(p)))
            .collect()
    }

    pub fn clock(&self) -> FixedClock {
        FixedClock::new(self.tick_rate, self.max_backlog)
            .with_draw_rate(self.draw_rate)
            .with_time_scale(self.time_scale)
    }

    /// Camera for a view starting at `target`
    pub fn camera(&self, target: Vec2) -> Camera {
        Camera::new(
            target,
            self.camera_lerp,
            self.viewport.size(),
            self.viewport.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "time_scale": 0.5, "stages": ["a.png"] }"#).unwrap();
        assert_eq!(s.time_scale, 0.5);
        assert_eq!(s.stages, vec![PathBuf::from("a.png")]);
        assert_eq!(s.tick_rate, TICK_RATE);
        assert_eq!(s.viewport, Viewport::default());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert_eq!(
            Settings::load_or_default(Path::new("/nonexistent/settings.json")),
            Settings::default()
        );
    }

    #[test]
    fn test_stage_sources_resolve_against_base() {
        let s = Settings::default();
        let sources = s.stage_sources(Path::new("/games/lava"));
        assert_eq!(sources.len(), 3);
        assert!(matches!(
            &sources[1],
            StageSource::File(p) if p == Path::new("/games/lava/stage2.bmp")
        ));
    }

    #[test]
    fn test_camera_view_from_viewport() {
        let cam = Settings::default().camera(Vec2::ZERO);
        assert!((cam.view.x - 1024.0 / 3.0).abs() < 1e-3);
        assert!((cam.view.y - 256.0).abs() < 1e-3);
    }
}
