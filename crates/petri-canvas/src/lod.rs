//! Level-of-detail tiers for the entity layer, ordered from least to most detail.

use petri_core::config::LodConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DetailLevel {
    /// Entity layer skipped for the frame.
    Culled,
    /// Single-pixel dots.
    Low,
    /// Disc + outline.
    Medium,
    /// Disc + outline + fitness ring.
    Full,
}

impl DetailLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Culled => "culled",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Full => "full",
        }
    }
}

/// Pick a tier from the entity count band, gated by scale in the two densest bands.
pub fn select_lod(entity_count: usize, scale: f64, thresholds: &LodConfig) -> DetailLevel {
    if entity_count <= thresholds.full_max {
        DetailLevel::Full
    } else if entity_count <= thresholds.medium_max {
        DetailLevel::Medium
    } else if entity_count <= thresholds.dense_max {
        if scale >= thresholds.medium_band_scale_cutoff {
            DetailLevel::Medium
        } else {
            DetailLevel::Low
        }
    } else if scale >= thresholds.dense_band_scale_cutoff {
        DetailLevel::Low
    } else {
        DetailLevel::Culled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lod(count: usize, scale: f64) -> DetailLevel {
        select_lod(count, scale, &LodConfig::default())
    }

    #[test]
    fn full_for_small_populations() {
        assert_eq!(lod(0, 0.1), DetailLevel::Full);
        assert_eq!(lod(1000, 0.1), DetailLevel::Full);
    }

    #[test]
    fn medium_band_ignores_scale() {
        assert_eq!(lod(1001, 0.1), DetailLevel::Medium);
        assert_eq!(lod(2000, 20.0), DetailLevel::Medium);
    }

    #[test]
    fn dense_band_drops_below_cutoff() {
        assert_eq!(lod(3000, 0.75), DetailLevel::Medium);
        assert_eq!(lod(3000, 0.74), DetailLevel::Low);
    }

    #[test]
    fn largest_band_culls_at_low_scale() {
        assert_eq!(lod(10_000, 1.0), DetailLevel::Low);
        assert_eq!(lod(10_000, 0.5), DetailLevel::Low);
        assert_eq!(lod(10_000, 0.49), DetailLevel::Culled);
    }

    #[test]
    fn boundary_values() {
        assert_eq!(lod(4000, 0.1), DetailLevel::Low);
        assert_eq!(lod(4001, 0.1), DetailLevel::Culled);
    }

    #[test]
    fn tiers_are_ordered_by_detail() {
        assert!(DetailLevel::Full > DetailLevel::Medium);
        assert!(DetailLevel::Medium > DetailLevel::Low);
        assert!(DetailLevel::Low > DetailLevel::Culled);
    }
}
