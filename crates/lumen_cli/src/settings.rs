//! Render settings loaded from a JSON file.
//!
//! Every field is optional. Missing fields leave the scene preset's value in
//! place.
//!
//! ```json
//! { "image_width": 600, "samples_per_pixel": 64, "max_depth": 20, "seed": 7, "output": "cover.png" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lumen_renderer::Camera;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub image_width: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

impl RenderSettings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: RenderSettings = serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Layer `overrides` on top of these settings; set fields in `overrides` win.
    pub fn merge(self, overrides: RenderSettings) -> Self {
        Self {
            image_width: overrides.image_width.or(self.image_width),
            samples_per_pixel: overrides.samples_per_pixel.or(self.samples_per_pixel),
            max_depth: overrides.max_depth.or(self.max_depth),
            seed: overrides.seed.or(self.seed),
            output: overrides.output.or(self.output),
        }
    }

    /// Copy the camera-related fields that are set onto `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        if let Some(width) = self.image_width {
            camera.image_width = width;
        }
        if let Some(samples) = self.samples_per_pixel {
            camera.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            camera.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            camera.seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial() {
        let settings: RenderSettings = serde_json::from_str(r#"{ "image_width": 640, "seed": 3 }"#).unwrap();
        assert_eq!(settings.image_width, Some(640));
        assert_eq!(settings.seed, Some(3));
        assert_eq!(settings.samples_per_pixel, None);
        assert_eq!(settings.output, None);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result: serde_json::Result<RenderSettings> = serde_json::from_str(r#"{ "width": 640 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = RenderSettings {
            image_width: Some(800),
            samples_per_pixel: Some(100),
            max_depth: None,
            seed: Some(1),
            output: Some(PathBuf::from("file.ppm")),
        };
        let flags = RenderSettings {
            image_width: Some(200),
            max_depth: Some(4),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.image_width, Some(200));
        assert_eq!(merged.samples_per_pixel, Some(100));
        assert_eq!(merged.max_depth, Some(4));
        assert_eq!(merged.seed, Some(1));
        assert_eq!(merged.output, Some(PathBuf::from("file.ppm")));
    }

    #[test]
    fn test_apply_to_camera() {
        let mut camera = Camera::new().with_quality(10, 10);
        let settings = RenderSettings {
            samples_per_pixel: Some(3),
            seed: Some(99),
            ..Default::default()
        };
        settings.apply(&mut camera);

        assert_eq!(camera.samples_per_pixel, 3);
        assert_eq!(camera.max_depth, 10);
        assert_eq!(camera.seed, 99);
        assert_eq!(camera.image_width, 100);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lumen-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{ "max_depth": 12, "output": "render.png" }"#).unwrap();

        let settings = RenderSettings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.max_depth, Some(12));
        assert_eq!(settings.output, Some(PathBuf::from("render.png")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RenderSettings::load(Path::new("/nonexistent/lumen.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }
}
