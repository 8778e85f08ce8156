//! Viewport state and the domain ↔ pixel transform.
//!
//! screen = layout(domain) * scale + pan, where `layout` is the pair of
//! per-axis linear scales mapping the simulation extent into the surface
//! minus a fixed margin.

use petri_core::config::ViewConfig;
use petri_core::interfaces::ViewportState;
use petri_core::snapshot::{AntibioticZone, Coordinate};

use crate::geometry::{LinearScale, Point, Rect};

/// Pan/zoom controller. Rejects invalid input and keeps the last valid state.
#[derive(Debug, Clone)]
pub struct Viewport {
    state: ViewportState,
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, config: &ViewConfig) -> Self {
        Self {
            state: ViewportState::new(width.max(0.0), height.max(0.0)),
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            zoom_step: config.zoom_step,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            tracing::debug!(width, height, "ignoring invalid surface size");
            return false;
        }
        if width == self.state.width && height == self.state.height {
            return false;
        }
        self.state.width = width;
        self.state.height = height;
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            tracing::debug!(dx, dy, "ignoring non-finite pan delta");
            return false;
        }
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.state.pan_x += dx;
        self.state.pan_y += dy;
        true
    }

    /// Multiply the scale by `factor`, keeping the domain point under
    /// `(px, py)` fixed on screen.
    pub fn zoom_to_point(&mut self, px: f64, py: f64, factor: f64) -> bool {
        if !px.is_finite() || !py.is_finite() || !factor.is_finite() || factor <= 0.0 {
            tracing::debug!(px, py, factor, "ignoring invalid zoom request");
            return false;
        }
        let old = self.state.scale;
        let new = (old * factor).clamp(self.min_scale, self.max_scale);
        if (new - old).abs() <= f64::EPSILON * old {
            return false;
        }
        let ratio = new / old;
        self.state.pan_x = px - (px - self.state.pan_x) * ratio;
        self.state.pan_y = py - (py - self.state.pan_y) * ratio;
        self.state.scale = new;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        let (cx, cy) = self.center();
        self.zoom_to_point(cx, cy, self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        let (cx, cy) = self.center();
        self.zoom_to_point(cx, cy, 1.0 / self.zoom_step)
    }

    /// Scroll-wheel zoom: negative delta zooms in, anchored at the pointer.
    pub fn wheel(&mut self, px: f64, py: f64, delta_y: f64) -> bool {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return false;
        }
        let factor = if delta_y < 0.0 {
            self.zoom_step
        } else {
            1.0 / self.zoom_step
        };
        self.zoom_to_point(px, py, factor)
    }

    pub fn reset(&mut self) -> bool {
        let before = self.state;
        self.state.pan_x = 0.0;
        self.state.pan_y = 0.0;
        self.state.scale = 1.0_f64.clamp(self.min_scale, self.max_scale);
        before != self.state
    }

    /// Replace pan and scale outright; scale is clamped, non-finite input rejected.
    pub fn set_view(&mut self, pan_x: f64, pan_y: f64, scale: f64) -> bool {
        if !pan_x.is_finite() || !pan_y.is_finite() || !scale.is_finite() || scale <= 0.0 {
            tracing::debug!(pan_x, pan_y, scale, "ignoring invalid view state");
            return false;
        }
        let before = self.state;
        self.state.pan_x = pan_x;
        self.state.pan_y = pan_y;
        self.state.scale = scale.clamp(self.min_scale, self.max_scale);
        before != self.state
    }

    fn center(&self) -> (f64, f64) {
        (self.state.width * 0.5, self.state.height * 0.5)
    }
}

/// Domain ↔ layout ↔ screen mapping for one viewport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: LinearScale,
    pub y: LinearScale,
    pub view: ViewportState,
}

impl ViewTransform {
    pub fn new(extent: (f64, f64), view: ViewportState, margin: f64) -> Self {
        let (ew, eh) = extent;
        Self {
            x: LinearScale::new(0.0, ew, margin, view.width - margin),
            y: LinearScale::new(0.0, eh, margin, view.height - margin),
            view,
        }
    }

    pub fn to_layout(&self, c: Coordinate) -> Point {
        Point::new(self.x.apply(c.x), self.y.apply(c.y))
    }

    pub fn from_layout(&self, p: Point) -> Coordinate {
        Coordinate::new(self.x.invert(p.x), self.y.invert(p.y))
    }

    pub fn layout_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.view.scale + self.view.pan_x,
            p.y * self.view.scale + self.view.pan_y,
        )
    }

    pub fn screen_to_layout(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.view.pan_x) / self.view.scale,
            (p.y - self.view.pan_y) / self.view.scale,
        )
    }

    pub fn to_pixel(&self, c: Coordinate) -> Point {
        self.layout_to_screen(self.to_layout(c))
    }

    pub fn to_domain(&self, p: Point) -> Coordinate {
        self.from_layout(self.screen_to_layout(p))
    }

    /// Layout-space box covering the simulation extent; quadtree root bounds.
    pub fn layout_bounds(&self) -> Rect {
        let a = Point::new(self.x.range_min, self.y.range_min);
        let b = Point::new(self.x.range_max, self.y.range_max);
        Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Screen pixels per domain unit along x.
    pub fn pixels_per_unit(&self) -> f64 {
        self.x.ratio() * self.view.scale
    }

    /// Centre pixel and pixel radius of the disc drawn for `zone`. `None` when
    /// the zone has no drawable extent.
    pub fn zone_disc(&self, zone: &AntibioticZone) -> Option<(Point, f64)> {
        if zone.radius.is_nan() || zone.radius <= 0.0 || !zone.center.is_finite() {
            return None;
        }
        Some((self.to_pixel(zone.center), zone.radius * self.pixels_per_unit()))
    }

    /// Domain-space rectangle visible on screen, grown by `padding` screen pixels.
    pub fn visible_domain(&self, padding: f64) -> Rect {
        let (w, h) = (self.view.width, self.view.height);
        let corners = [
            Point::new(-padding, -padding),
            Point::new(w + padding, -padding),
            Point::new(-padding, h + padding),
            Point::new(w + padding, h + padding),
        ]
        .map(|p| {
            let c = self.to_domain(p);
            Point::new(c.x, c.y)
        });
        Rect::bounding(&corners).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }
}
