//! Minimal 2-D drawing capability the render pipeline targets.
//!
//! All coordinates are screen pixels. Backends: [`RecordingPainter`] (headless,
//! tests) and the Skia raster surface behind the `skia` feature.

use serde::Serialize;

use crate::geometry::{Point, Rect};

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linearly interpolate towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

/// On/off dash lengths in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dash {
    pub on: f32,
    pub off: f32,
}

pub trait Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
        width: f64,
        dash: Option<Dash>,
    );
    fn draw_text(&mut self, origin: Point, text: &str, size: f64, color: Color);
    /// Restrict drawing to `clip`; `None` removes the clip.
    fn set_clip(&mut self, clip: Option<Rect>);
}

/// A drawing surface: a painter that may not be attached or sized yet.
pub trait Surface: Painter {
    /// Pixel size, or `None` while the surface is unavailable.
    fn size(&self) -> Option<(f64, f64)>;
    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        color: Color,
        width: f64,
        dash: Option<Dash>,
    },
    DrawText {
        origin: Point,
        text: String,
        size: f64,
        color: Color,
    },
    SetClip {
        clip: Option<Rect>,
    },
}

/// Records every call as a [`DrawCommand`].
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    pub commands: Vec<DrawCommand>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
        width: f64,
        dash: Option<Dash>,
    ) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            width,
            dash,
        });
    }

    fn draw_text(&mut self, origin: Point, text: &str, size: f64, color: Color) {
        self.commands.push(DrawCommand::DrawText {
            origin,
            text: text.to_string(),
            size,
            color,
        });
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.commands.push(DrawCommand::SetClip { clip });
    }
}

/// Headless surface backed by a [`RecordingPainter`]. Each frame replaces the
/// previous frame's commands.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Option<(f64, f64)>,
    painter: RecordingPainter,
    frames: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Some((width, height)),
            ..Self::default()
        }
    }

    /// A surface that is not attached yet.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, width: f64, height: f64) {
        self.size = Some((width, height));
    }

    pub fn detach(&mut self) {
        self.size = None;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.painter.commands
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Painter for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.painter.fill_rect(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.painter.stroke_rect(rect, color, width);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.painter.stroke_line(from, to, color, width);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.painter.fill_circle(center, radius, color);
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
        width: f64,
        dash: Option<Dash>,
    ) {
        self.painter
            .stroke_circle(center, radius, color, width, dash);
    }

    fn draw_text(&mut self, origin: Point, text: &str, size: f64, color: Color) {
        self.painter.draw_text(origin, text, size, color);
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.painter.set_clip(clip);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Option<(f64, f64)> {
        self.size.filter(|&(w, h)| w > 0.0 && h > 0.0)
    }

    fn begin_frame(&mut self) {
        self.painter.commands.clear();
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_color_at_zero() {
        let a = Color::new(0.1, 0.2, 0.3, 1.0);
        let b = Color::new(0.9, 0.8, 0.7, 0.5);
        assert_eq!(a.lerp(b, 0.0), a);
    }

    #[test]
    fn lerp_color_at_one() {
        let a = Color::new(0.1, 0.2, 0.3, 1.0);
        let b = Color::new(0.9, 0.8, 0.7, 0.5);
        let c = a.lerp(b, 1.0);
        assert!((c.r - b.r).abs() < 0.001);
        assert!((c.a - b.a).abs() < 0.001);
    }

    #[test]
    fn lerp_color_clamps_t() {
        let a = Color::new(0.0, 0.0, 0.0, 1.0);
        let b = Color::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(a.lerp(b, 3.0), a.lerp(b, 1.0));
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let mut p = RecordingPainter::new();
        p.fill_circle(Point::new(1.0, 2.0), 3.0, Color::new(1.0, 0.0, 0.0, 1.0));
        let json = serde_json::to_string(&p.commands).unwrap();
        assert!(json.contains(r#""op":"fill_circle""#), "{json}");
    }

    #[test]
    fn detached_surface_has_no_size() {
        let mut s = RecordingSurface::detached();
        assert!(s.size().is_none());
        s.attach(0.0, 100.0);
        assert!(s.size().is_none());
        s.attach(640.0, 480.0);
        assert_eq!(s.size(), Some((640.0, 480.0)));
    }
}
