// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use crate::constants::{DEFAULT_SIZE, MAX_RASTER_SIDE, MAX_SIZE, MIN_SIZE};
use crate::genome::SeedPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "morphling_settings.json";

const MIN_RASTER_SCALE: u32 = 1;
const MAX_RASTER_SCALE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Json,
}

/// Render options persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub size: f64,
    pub raster_scale: u32,
    pub seed_policy: SeedPolicy,
    /// Fill in a generated name when no label is given.
    pub auto_name: bool,
    pub format: OutputFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            raster_scale: 1,
            seed_policy: SeedPolicy::Lenient,
            auto_name: false,
            format: OutputFormat::Svg,
        }
    }
}

impl RenderSettings {
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(SETTINGS_FILE_NAME)
    }

    pub fn load_from_disk(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&data)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save_to_disk(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn sanitize(&mut self) {
        self.size = if self.size.is_finite() {
            self.size.clamp(MIN_SIZE, MAX_SIZE)
        } else {
            DEFAULT_SIZE
        };
        // Keep size * scale within one raster edge; size <= MAX_SIZE leaves room for scale 1.
        let fitting_scale = (f64::from(MAX_RASTER_SIDE) / self.size).floor() as u32;
        self.raster_scale = self
            .raster_scale
            .clamp(MIN_RASTER_SCALE, MAX_RASTER_SCALE)
            .min(fitting_scale.max(MIN_RASTER_SCALE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut settings = RenderSettings {
            size: -5.0,
            raster_scale: 40,
            ..RenderSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.size, MIN_SIZE);
        assert_eq!(settings.raster_scale, MAX_RASTER_SCALE);

        settings.size = f64::NAN;
        settings.sanitize();
        assert_eq!(settings.size, DEFAULT_SIZE);
    }

    #[test]
    fn raster_scale_respects_pixel_cap() {
        let mut settings = RenderSettings {
            size: MAX_SIZE,
            raster_scale: MAX_RASTER_SCALE,
            ..RenderSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.raster_scale, 1);

        settings.size = 1000.0;
        settings.raster_scale = 8;
        settings.sanitize();
        assert_eq!(settings.raster_scale, 4);
        assert!(settings.size * f64::from(settings.raster_scale) <= f64::from(MAX_RASTER_SIDE));

        settings.size = 96.0;
        settings.raster_scale = 8;
        settings.sanitize();
        assert_eq!(settings.raster_scale, 8);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: RenderSettings = serde_json::from_str(r#"{"size": 128, "format": "png"}"#).unwrap();
        assert_eq!(settings.size, 128.0);
        assert_eq!(settings.format, OutputFormat::Png);
        assert_eq!(settings.seed_policy, SeedPolicy::Lenient);
        assert_eq!(settings.raster_scale, 1);
    }

    #[test]
    fn settings_survive_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);
        let settings = RenderSettings {
            size: 256.0,
            raster_scale: 2,
            seed_policy: SeedPolicy::Strict,
            auto_name: true,
            format: OutputFormat::Json,
        };
        settings.save_to_disk(&path).unwrap();
        let loaded = RenderSettings::load_from_disk(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
