use petri_core::snapshot::BacteriumStatus;

use crate::painter::Color;

pub const BG: Color = Color::new(0.055, 0.055, 0.063, 1.0); // #0e0e10
pub const BORDER: Color = Color::new(0.30, 0.30, 0.34, 1.0);
pub const GRID_LINE: Color = Color::new(0.15, 0.15, 0.17, 1.0);
pub const TEXT_PRIMARY: Color = Color::new(0.9, 0.9, 0.9, 1.0);
pub const TEXT_DIM: Color = Color::new(0.6, 0.6, 0.6, 1.0);
pub const HUD_BG: Color = Color::new(0.08, 0.08, 0.10, 0.85);

// Bacterium status fills
pub const SENSITIVE: Color = Color::new(0.40, 0.75, 0.45, 1.0); // green
pub const INTERMEDIATE: Color = Color::new(0.85, 0.65, 0.30, 1.0); // amber
pub const RESISTANT: Color = Color::new(0.85, 0.35, 0.35, 1.0); // red
pub const ENTITY_OUTLINE: Color = Color::new(0.0, 0.0, 0.0, 0.6);
pub const SELECTED_STROKE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

// Fitness ring ramp, low → high
pub const FITNESS_LOW: Color = Color::new(0.55, 0.55, 0.55, 0.9); // gray
pub const FITNESS_HIGH: Color = Color::new(0.45, 0.65, 0.85, 0.9); // light blue

// Antibiotic zones
pub const ZONE_FILL: Color = Color::new(0.65, 0.45, 0.80, 1.0); // purple, alpha set per zone
pub const ZONE_OUTLINE: Color = Color::new(0.65, 0.45, 0.80, 0.9);

pub fn status_color(status: BacteriumStatus) -> Color {
    match status {
        BacteriumStatus::Sensitive => SENSITIVE,
        BacteriumStatus::Intermediate => INTERMEDIATE,
        BacteriumStatus::Resistant => RESISTANT,
    }
}

/// Ring color for a fitness score; scores outside `[0, 1]` are clamped.
pub fn fitness_color(fitness: f64) -> Color {
    let t = if fitness.is_finite() { fitness as f32 } else { 0.0 };
    FITNESS_LOW.lerp(FITNESS_HIGH, t)
}

/// Zone disc fill; denser concentrations are more opaque.
pub fn zone_fill(concentration: f64) -> Color {
    let c = if concentration.is_finite() {
        concentration.clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    ZONE_FILL.with_alpha(0.08 + 0.32 * c)
}
