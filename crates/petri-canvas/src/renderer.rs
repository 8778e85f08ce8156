//! Layered render pipeline: background, grid, zones, entities, then the HUD.
//!
//! The pipeline is a pure function of its inputs; it never mutates the
//! viewport or the snapshot.

use petri_core::config::{LodConfig, RenderConfig};
use petri_core::interfaces::DisplayFlags;
use petri_core::snapshot::{AntibioticZone, Bacterium, Coordinate, GridMeta, Snapshot};
use serde::Serialize;

use crate::colors::*;
use crate::geometry::{Point, Rect};
use crate::lod::{select_lod, DetailLevel};
use crate::painter::{Dash, Painter};
use crate::viewport::ViewTransform;

const OUTLINE_WIDTH: f64 = 0.75;
const FITNESS_RING_GAP: f64 = 1.5;
const FITNESS_RING_WIDTH: f64 = 1.0;
const SELECTION_GAP: f64 = 2.5;
const SELECTION_WIDTH: f64 = 2.0;
const ZONE_DASH: Dash = Dash { on: 6.0, off: 4.0 };
const HUD_HEIGHT: f64 = 28.0;

/// Display toggles owned by the host; the pipeline only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub show_grid: bool,
    pub show_zones: bool,
    pub show_hud: bool,
    /// Bacterium radius in layout pixels.
    pub point_radius: f64,
    /// Screen pixels added around the viewport before culling.
    pub cull_padding: f64,
    pub selected_id: Option<String>,
}

impl DisplayOptions {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            show_grid: config.show_grid,
            show_zones: config.show_zones,
            show_hud: config.show_hud,
            point_radius: config.point_radius,
            cull_padding: config.cull_padding,
            selected_id: None,
        }
    }

    /// Apply the flags that are set. Returns whether anything changed.
    pub fn apply(&mut self, flags: &DisplayFlags) -> bool {
        let before = self.clone();
        if let Some(v) = flags.show_grid {
            self.show_grid = v;
        }
        if let Some(v) = flags.show_zones {
            self.show_zones = v;
        }
        if let Some(v) = flags.show_hud {
            self.show_hud = v;
        }
        if let Some(r) = flags.point_radius {
            if r.is_finite() && r > 0.0 {
                self.point_radius = r;
            }
        }
        before != *self
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

/// Everything one frame is drawn from.
pub struct Scene<'a> {
    pub snapshot: &'a Snapshot,
    pub transform: &'a ViewTransform,
    pub options: &'a DisplayOptions,
    pub lod: &'a LodConfig,
}

/// What a frame ended up drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub detail: DetailLevel,
    pub grid_drawn: bool,
    pub zones_drawn: usize,
    pub entities_drawn: usize,
    pub entities_culled: usize,
}

/// Draw one frame. Returns `None` without drawing when the surface has no area.
pub fn render_frame<P: Painter + ?Sized>(
    painter: &mut P,
    scene: &Scene<'_>,
) -> Option<FrameReport> {
    let t = scene.transform;
    if !t.view.has_area() {
        return None;
    }

    let scale = t.view.scale;
    let snapshot = scene.snapshot;
    let detail = select_lod(snapshot.bacteria.len(), scale, scene.lod);
    let visible = t.visible_domain(scene.options.cull_padding);

    painter.set_clip(Some(Rect::new(0.0, 0.0, t.view.width, t.view.height)));

    draw_background(painter, t);

    let grid_drawn = scene.options.show_grid
        && select_lod(snapshot.grid.cell_count(), scale, scene.lod) != DetailLevel::Culled
        && draw_grid(painter, t, &snapshot.grid, &visible);

    let zones_drawn = if scene.options.show_zones {
        draw_zones(painter, t, &snapshot.zones, &visible)
    } else {
        0
    };

    let (entities_drawn, entities_culled) = if detail == DetailLevel::Culled {
        (0, snapshot.bacteria.len())
    } else {
        draw_entities(painter, t, &snapshot.bacteria, &visible, detail, scene.options)
    };

    let report = FrameReport {
        detail,
        grid_drawn,
        zones_drawn,
        entities_drawn,
        entities_culled,
    };

    if scene.options.show_hud {
        draw_hud(painter, scene, &report);
    }

    painter.set_clip(None);
    Some(report)
}

fn draw_background<P: Painter + ?Sized>(painter: &mut P, t: &ViewTransform) {
    painter.fill_rect(Rect::new(0.0, 0.0, t.view.width, t.view.height), BG);

    let bounds = t.layout_bounds();
    let a = t.layout_to_screen(Point::new(bounds.min_x, bounds.min_y));
    let b = t.layout_to_screen(Point::new(bounds.max_x, bounds.max_y));
    painter.stroke_rect(Rect::new(a.x, a.y, b.x, b.y), BORDER, 1.0);
}

/// Cell boundary lines inside the visible domain. Returns whether the grid
/// metadata described a grid at all.
fn draw_grid<P: Painter + ?Sized>(
    painter: &mut P,
    t: &ViewTransform,
    grid: &GridMeta,
    visible: &Rect,
) -> bool {
    if grid.width == 0 || grid.height == 0 {
        return false;
    }
    let (ew, eh) = grid.domain_extent();
    let cell_w = ew / grid.width as f64;
    let cell_h = eh / grid.height as f64;
    let top = t.to_pixel(Coordinate::new(0.0, 0.0));
    let bottom = t.to_pixel(Coordinate::new(ew, eh));

    for i in 0..=grid.width {
        let x = i as f64 * cell_w;
        if x < visible.min_x || x > visible.max_x {
            continue;
        }
        let sx = t.to_pixel(Coordinate::new(x, 0.0)).x;
        painter.stroke_line(Point::new(sx, top.y), Point::new(sx, bottom.y), GRID_LINE, 1.0);
    }
    for j in 0..=grid.height {
        let y = j as f64 * cell_h;
        if y < visible.min_y || y > visible.max_y {
            continue;
        }
        let sy = t.to_pixel(Coordinate::new(0.0, y)).y;
        painter.stroke_line(Point::new(top.x, sy), Point::new(bottom.x, sy), GRID_LINE, 1.0);
    }
    true
}

fn draw_zones<P: Painter + ?Sized>(
    painter: &mut P,
    t: &ViewTransform,
    zones: &[AntibioticZone],
    visible: &Rect,
) -> usize {
    let mut drawn = 0;
    for zone in zones {
        let Some((c, r)) = t.zone_disc(zone) else {
            continue;
        };
        let center = Point::new(zone.center.x, zone.center.y);
        if !visible.intersects_circle(center, zone.radius) {
            continue;
        }

        painter.fill_circle(c, r, zone_fill(zone.concentration));
        painter.stroke_circle(c, r, ZONE_OUTLINE, 1.5, Some(ZONE_DASH));

        let label = format!("{:.0}%", zone.concentration.clamp(0.0, 1.0) * 100.0);
        painter.draw_text(Point::new(c.x - 10.0, c.y + 4.0), &label, 11.0, TEXT_PRIMARY);
        drawn += 1;
    }
    drawn
}

/// Returns `(drawn, culled)`.
fn draw_entities<P: Painter + ?Sized>(
    painter: &mut P,
    t: &ViewTransform,
    bacteria: &[Bacterium],
    visible: &Rect,
    detail: DetailLevel,
    options: &DisplayOptions,
) -> (usize, usize) {
    let radius = options.point_radius * t.view.scale;
    let mut drawn = 0;
    let mut selected_at = None;

    for b in bacteria {
        let domain = Point::new(b.position.x, b.position.y);
        if !domain.is_finite() || !visible.contains(domain) {
            continue;
        }
        let p = t.to_pixel(b.position);
        let fill = status_color(b.status);

        match detail {
            DetailLevel::Full => {
                painter.fill_circle(p, radius, fill);
                painter.stroke_circle(p, radius, ENTITY_OUTLINE, OUTLINE_WIDTH, None);
                painter.stroke_circle(
                    p,
                    radius + FITNESS_RING_GAP,
                    fitness_color(b.fitness),
                    FITNESS_RING_WIDTH,
                    None,
                );
            }
            DetailLevel::Medium => {
                painter.fill_circle(p, radius, fill);
                painter.stroke_circle(p, radius, ENTITY_OUTLINE, OUTLINE_WIDTH, None);
            }
            DetailLevel::Low => {
                painter.fill_rect(Rect::from_xywh(p.x.floor(), p.y.floor(), 1.0, 1.0), fill);
            }
            DetailLevel::Culled => {}
        }

        if options.selected_id.as_deref() == Some(b.id.as_str()) {
            selected_at = Some(p);
        }
        drawn += 1;
    }

    if let Some(p) = selected_at {
        painter.stroke_circle(p, radius + SELECTION_GAP, SELECTED_STROKE, SELECTION_WIDTH, None);
    }

    (drawn, bacteria.len() - drawn)
}

fn draw_hud<P: Painter + ?Sized>(painter: &mut P, scene: &Scene<'_>, report: &FrameReport) {
    let view = &scene.transform.view;
    painter.fill_rect(Rect::new(0.0, 0.0, view.width, HUD_HEIGHT), HUD_BG);

    let info = format!(
        "Bacteria: {}  |  Zones: {}  |  Zoom: {}%  |  LOD: {}",
        scene.snapshot.bacteria.len(),
        scene.snapshot.zones.len(),
        (view.scale * 100.0).round() as i64,
        report.detail.label(),
    );
    painter.draw_text(Point::new(10.0, 18.0), &info, 12.0, TEXT_DIM);
}
