use serde::Deserialize;
use std::path::Path;

use crate::error::{PetriError, PetriResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub lod: LodConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Viewport limits and the layout margin around the simulation area.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,
    /// Factor applied per zoom-in step; zoom-out divides by it.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Pixels left empty on every side of the simulation area.
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_width")]
    pub default_width: u32,
    #[serde(default = "default_height")]
    pub default_height: u32,
}

fn default_min_scale() -> f64 {
    0.1
}
fn default_max_scale() -> f64 {
    20.0
}
fn default_zoom_step() -> f64 {
    1.2
}
fn default_margin() -> f64 {
    20.0
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            zoom_step: default_zoom_step(),
            margin: default_margin(),
            default_width: default_width(),
            default_height: default_height(),
        }
    }
}

/// Quadtree shape limits.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_max_items_per_node")]
    pub max_items_per_node: usize,
    /// Leaves at this depth never split, even when over-full.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_items_per_node() -> usize {
    8
}
fn default_max_depth() -> u32 {
    8
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_items_per_node: default_max_items_per_node(),
            max_depth: default_max_depth(),
        }
    }
}

/// Entity-count bands and scale cutoffs for level-of-detail selection.
#[derive(Debug, Clone, Deserialize)]
pub struct LodConfig {
    #[serde(default = "default_full_max")]
    pub full_max: usize,
    #[serde(default = "default_medium_max")]
    pub medium_max: usize,
    #[serde(default = "default_dense_max")]
    pub dense_max: usize,
    /// Below this scale the `medium_max..=dense_max` band drops to low detail.
    #[serde(default = "default_medium_band_scale_cutoff")]
    pub medium_band_scale_cutoff: f64,
    /// Below this scale the band above `dense_max` is culled.
    #[serde(default = "default_dense_band_scale_cutoff")]
    pub dense_band_scale_cutoff: f64,
}

fn default_full_max() -> usize {
    1000
}
fn default_medium_max() -> usize {
    2000
}
fn default_dense_max() -> usize {
    4000
}
fn default_medium_band_scale_cutoff() -> f64 {
    0.75
}
fn default_dense_band_scale_cutoff() -> f64 {
    0.5
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            full_max: default_full_max(),
            medium_max: default_medium_max(),
            dense_max: default_dense_max(),
            medium_band_scale_cutoff: default_medium_band_scale_cutoff(),
            dense_band_scale_cutoff: default_dense_band_scale_cutoff(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Bacterium disc radius in layout pixels.
    #[serde(default = "default_point_radius")]
    pub point_radius: f64,
    /// Extra screen pixels searched around the pointer during hit tests.
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance: f64,
    /// Screen pixels added around the viewport before culling entities.
    #[serde(default = "default_cull_padding")]
    pub cull_padding: f64,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub show_zones: bool,
    #[serde(default)]
    pub show_hud: bool,
}

fn default_point_radius() -> f64 {
    3.0
}
fn default_hit_tolerance() -> f64 {
    2.0
}
fn default_cull_padding() -> f64 {
    20.0
}
fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_radius: default_point_radius(),
            hit_tolerance: default_hit_tolerance(),
            cull_padding: default_cull_padding(),
            show_grid: true,
            show_zones: true,
            show_hud: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> PetriResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PetriError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback chain: explicit path, then ./config/default.toml,
    /// then hardcoded defaults.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Self {
        if let Some(path) = explicit_path {
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {e}", path.display());
                }
            }
        }

        let default_path = Path::new("config/default.toml");
        if default_path.exists() {
            match Self::load(default_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load default config: {e}");
                }
            }
        }

        tracing::info!("Using hardcoded default configuration");
        Self::default()
    }

    pub fn validate(&self) -> PetriResult<()> {
        let view = &self.view;
        if view.min_scale.is_nan() || view.min_scale <= 0.0 || !view.max_scale.is_finite() {
            return Err(PetriError::InvalidConfig(
                "view.min_scale must be positive and view.max_scale finite".into(),
            ));
        }
        if view.min_scale > view.max_scale {
            return Err(PetriError::InvalidConfig(format!(
                "view.min_scale ({}) exceeds view.max_scale ({})",
                view.min_scale, view.max_scale
            )));
        }
        if view.zoom_step.is_nan() || view.zoom_step <= 1.0 {
            return Err(PetriError::InvalidConfig(
                "view.zoom_step must be greater than 1".into(),
            ));
        }
        if self.index.max_items_per_node == 0 {
            return Err(PetriError::InvalidConfig(
                "index.max_items_per_node must be at least 1".into(),
            ));
        }
        let lod = &self.lod;
        if !(lod.full_max <= lod.medium_max && lod.medium_max <= lod.dense_max) {
            return Err(PetriError::InvalidConfig(
                "lod bands must satisfy full_max <= medium_max <= dense_max".into(),
            ));
        }
        if self.render.point_radius.is_nan() || self.render.point_radius <= 0.0 {
            return Err(PetriError::InvalidConfig(
                "render.point_radius must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.view.zoom_step, 1.2);
        assert_eq!(cfg.index.max_items_per_node, 8);
        assert_eq!(cfg.lod.dense_max, 4000);
        assert!(cfg.render.show_grid);
        assert!(!cfg.render.show_hud);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: AppConfig = toml::from_str("[index]\nmax_depth = 3\n").unwrap();
        assert_eq!(cfg.index.max_depth, 3);
        assert_eq!(cfg.index.max_items_per_node, 8);
        assert_eq!(cfg.view.max_scale, 20.0);
    }

    #[test]
    fn inverted_scale_range_is_rejected() {
        let cfg: AppConfig =
            toml::from_str("[view]\nmin_scale = 5.0\nmax_scale = 2.0\n").unwrap();
        assert!(matches!(cfg.validate(), Err(PetriError::InvalidConfig(_))));
    }

    #[test]
    fn nan_bounds_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.view.min_scale = f64::NAN;
        assert!(cfg.validate().is_err());
        let mut cfg = AppConfig::default();
        cfg.view.zoom_step = f64::NAN;
        assert!(cfg.validate().is_err());
        let mut cfg = AppConfig::default();
        cfg.render.point_radius = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_leaf_capacity_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.index.max_items_per_node = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reads_file_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petri.toml");
        std::fs::write(&path, "[render]\npoint_radius = 4.5\nshow_zones = false\n").unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.render.point_radius, 4.5);
        assert!(!cfg.render.show_zones);

        std::fs::write(&path, "[view]\nzoom_step = 0.5\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn missing_explicit_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_or_default(Some(Path::new("/nonexistent/petri.toml")));
        assert_eq!(cfg.view.min_scale, 0.1);
    }
}
