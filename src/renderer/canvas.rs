//! 2D canvas backend

use std::f64::consts::TAU;

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::{Color, Renderer};

/// Draws onto a `CanvasRenderingContext2d`
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    /// Opaque clear (start of a run)
    pub fn clear(&mut self) {
        self.ctx.set_fill_style_str(&Color::BLACK.to_css());
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_path(&mut self, points: impl IntoIterator<Item = Vec2>, color: Color) {
        self.ctx.begin_path();
        let mut points = points.into_iter();
        if let Some(first) = points.next() {
            self.ctx.move_to(first.x as f64, first.y as f64);
            for p in points {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }
}

impl Renderer for CanvasRenderer {
    fn clear_with_fade(&mut self, alpha: f32) {
        self.ctx
            .set_fill_style_str(&Color::BLACK.with_alpha(alpha).to_css());
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn draw_polygon(&mut self, center: Vec2, radius: f32, sides: u32, color: Color) {
        let sides = sides.max(3);
        let step = std::f32::consts::TAU / sides as f32;
        // First vertex points up
        let start = -std::f32::consts::FRAC_PI_2;
        let points =
            (0..sides).map(|i| center + Vec2::from_angle(start + step * i as f32) * radius);
        self.fill_path(points, color);
    }

    fn draw_triangle(&mut self, center: Vec2, size: f32, angle: f32, color: Color) {
        let dir = Vec2::from_angle(angle);
        let perp = dir.perp();
        let points = [
            center + dir * size * 1.5,
            center - dir * size + perp * size,
            center - dir * size - perp * size,
        ];
        self.fill_path(points, color);
    }
}
