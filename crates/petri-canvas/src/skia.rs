//! Raster Skia backend.

use anyhow::{anyhow, Context};
use skia_safe::{surfaces, Color4f, EncodedImageFormat, Font, Paint, PaintStyle, PathEffect};

use crate::geometry::{Point, Rect};
use crate::painter::{Color, Dash, Painter, Surface};

/// CPU raster surface.
pub struct SkiaSurface {
    surface: skia_safe::Surface,
    width: i32,
    height: i32,
    clipped: bool,
}

impl SkiaSurface {
    pub fn new(width: u32, height: u32) -> anyhow::Result<Self> {
        let w = i32::try_from(width).context("surface width")?;
        let h = i32::try_from(height).context("surface height")?;
        let surface = surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| anyhow!("failed to create {w}x{h} raster surface"))?;
        Ok(Self {
            surface,
            width: w,
            height: h,
            clipped: false,
        })
    }

    /// Encode the current pixels as PNG.
    pub fn encode_png(&mut self) -> anyhow::Result<Vec<u8>> {
        let image = self.surface.image_snapshot();
        let data = image
            .encode(None, EncodedImageFormat::PNG, 100)
            .ok_or_else(|| anyhow!("PNG encoding failed"))?;
        Ok(data.as_bytes().to_vec())
    }
}

fn color4f(c: Color) -> Color4f {
    Color4f::new(c.r, c.g, c.b, c.a)
}

fn fill_paint(color: Color) -> Paint {
    let mut paint = Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(PaintStyle::Fill);
    paint.set_color4f(color4f(color), None);
    paint
}

fn stroke_paint(color: Color, width: f64) -> Paint {
    let mut paint = fill_paint(color);
    paint.set_style(PaintStyle::Stroke);
    paint.set_stroke_width(width as f32);
    paint
}

fn sk_rect(r: Rect) -> skia_safe::Rect {
    skia_safe::Rect::new(r.min_x as f32, r.min_y as f32, r.max_x as f32, r.max_y as f32)
}

fn sk_point(p: Point) -> skia_safe::Point {
    skia_safe::Point::new(p.x as f32, p.y as f32)
}

impl Painter for SkiaSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let paint = fill_paint(color);
        self.surface.canvas().draw_rect(sk_rect(rect), &paint);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        let paint = stroke_paint(color, width);
        self.surface.canvas().draw_rect(sk_rect(rect), &paint);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        let paint = stroke_paint(color, width);
        self.surface
            .canvas()
            .draw_line(sk_point(from), sk_point(to), &paint);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let paint = fill_paint(color);
        self.surface
            .canvas()
            .draw_circle(sk_point(center), radius as f32, &paint);
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
        width: f64,
        dash: Option<Dash>,
    ) {
        let mut paint = stroke_paint(color, width);
        if let Some(d) = dash {
            paint.set_path_effect(PathEffect::dash(&[d.on, d.off], 0.0));
        }
        self.surface
            .canvas()
            .draw_circle(sk_point(center), radius as f32, &paint);
    }

    fn draw_text(&mut self, origin: Point, text: &str, size: f64, color: Color) {
        let font = Font::default()
            .with_size(size as f32)
            .unwrap_or_else(Font::default);
        let paint = fill_paint(color);
        self.surface
            .canvas()
            .draw_str(text, sk_point(origin), &font, &paint);
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        let canvas = self.surface.canvas();
        if self.clipped {
            canvas.restore();
            self.clipped = false;
        }
        if let Some(r) = clip {
            canvas.save();
            canvas.clip_rect(sk_rect(r), None, Some(true));
            self.clipped = true;
        }
    }
}

impl Surface for SkiaSurface {
    fn size(&self) -> Option<(f64, f64)> {
        (self.width > 0 && self.height > 0).then_some((self.width as f64, self.height as f64))
    }

    fn begin_frame(&mut self) {
        self.surface.canvas().clear(color4f(crate::colors::BG));
    }
}
