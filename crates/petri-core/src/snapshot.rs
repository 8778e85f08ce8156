//! Snapshot data contract delivered by the simulation feed.
//!
//! A snapshot is immutable and authoritative: every delivery replaces the
//! previous one wholesale. Missing arrays deserialize as empty.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PetriError, PetriResult};

/// Domain extent used when the grid metadata carries no usable dimension.
pub const FALLBACK_EXTENT: f64 = 100.0;

/// A position in simulation (domain) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacteriumStatus {
    Sensitive,
    Intermediate,
    Resistant,
}

impl BacteriumStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sensitive => "sensitive",
            Self::Intermediate => "intermediate",
            Self::Resistant => "resistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bacterium {
    pub id: String,
    pub position: Coordinate,
    pub status: BacteriumStatus,
    #[serde(default)]
    pub fitness: f64,
    #[serde(default)]
    pub generation: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntibioticZone {
    pub id: String,
    pub center: Coordinate,
    /// Radius in domain units.
    pub radius: f64,
    /// Concentration in `[0, 1]`.
    #[serde(default)]
    pub concentration: f64,
}

impl AntibioticZone {
    pub fn contains(&self, point: Coordinate) -> bool {
        self.center.distance_to(point) <= self.radius
    }
}

/// Grid geometry and population ratios reported alongside each snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridMeta {
    /// Number of grid cells along x.
    #[serde(default)]
    pub width: u32,
    /// Number of grid cells along y.
    #[serde(default)]
    pub height: u32,
    /// Extent of the simulation along x, in domain units.
    #[serde(default)]
    pub physical_width: f64,
    /// Extent of the simulation along y, in domain units.
    #[serde(default)]
    pub physical_height: f64,
    #[serde(default)]
    pub occupancy_ratio: f64,
    #[serde(default)]
    pub coverage_ratio: f64,
}

impl GridMeta {
    /// Domain extent `(width, height)`, falling back to the cell counts and
    /// then to [`FALLBACK_EXTENT`] when a dimension is not positive.
    pub fn domain_extent(&self) -> (f64, f64) {
        fn pick(physical: f64, cells: u32) -> f64 {
            if physical.is_finite() && physical > 0.0 {
                physical
            } else if cells > 0 {
                cells as f64
            } else {
                FALLBACK_EXTENT
            }
        }
        (
            pick(self.physical_width, self.width),
            pick(self.physical_height, self.height),
        )
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub bacteria: Vec<Bacterium>,
    #[serde(default)]
    pub zones: Vec<AntibioticZone>,
    #[serde(default)]
    pub grid: GridMeta,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> PetriResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> PetriResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PetriError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn is_empty(&self) -> bool {
        self.bacteria.is_empty() && self.zones.is_empty()
    }

    pub fn bacterium(&self, id: &str) -> Option<&Bacterium> {
        self.bacteria.iter().find(|b| b.id == id)
    }
}
