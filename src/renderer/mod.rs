//! Rendering module
//!
//! The simulation never draws. `draw_scene` walks the game state and issues
//! primitive calls on a `Renderer`, picking shape and color from each entity's
//! tag. The browser backend is a 2D canvas (`canvas` module).

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::sim::{Entity, EntityKind, GameState, UpgradeKind};

/// RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Boss orbs
    pub const BOSS: Color = Color::rgb(0.85, 0.1, 0.1);
    /// Projectiles fired under Double Damage & Points
    pub const EMPOWERED: Color = Color::rgb(1.0, 0.55, 0.1);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// HSL to RGB; hue in degrees, saturation/lightness in 0..=1
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        Self::rgb(r + m, g + m, b + m)
    }

    /// CSS `rgba(...)` string for canvas fill styles
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Drawing primitives the game needs
pub trait Renderer {
    /// Low-alpha fill over the whole canvas (motion trails)
    fn clear_with_fade(&mut self, alpha: f32);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Regular polygon with `sides` vertices inscribed in `radius`
    fn draw_polygon(&mut self, center: Vec2, radius: f32, sides: u32, color: Color);
    /// Isosceles triangle pointing along `angle`
    fn draw_triangle(&mut self, center: Vec2, size: f32, angle: f32, color: Color);
}

/// Polygon sides and color for an upgrade pickup
pub fn upgrade_style(kind: UpgradeKind) -> (u32, Color) {
    match kind {
        UpgradeKind::AutoShoot => (4, Color::rgb(0.3, 0.8, 1.0)),
        UpgradeKind::TripleShot => (3, Color::rgb(0.4, 1.0, 0.4)),
        UpgradeKind::DoubleDamageAndPoints => (5, Color::rgb(1.0, 0.85, 0.2)),
        UpgradeKind::PiercingShot => (6, Color::rgb(0.8, 0.4, 1.0)),
    }
}

/// Draw one entity according to its tag
pub fn draw_entity(entity: &Entity, renderer: &mut dyn Renderer) {
    match &entity.kind {
        EntityKind::Player { facing } => {
            renderer.draw_triangle(entity.pos, entity.radius, *facing, Color::WHITE);
        }
        EntityKind::Enemy { boss: true, .. } => {
            renderer.draw_circle(entity.pos, entity.radius, Color::BOSS);
        }
        EntityKind::Enemy { boss: false, hue } => {
            renderer.draw_circle(entity.pos, entity.radius, Color::from_hsl(*hue, 0.5, 0.5));
        }
        EntityKind::Projectile { empowered, .. } => {
            let color = if *empowered {
                Color::EMPOWERED
            } else {
                Color::WHITE
            };
            renderer.draw_circle(entity.pos, entity.radius, color);
        }
        EntityKind::Upgrade { kind } => {
            let (sides, color) = upgrade_style(*kind);
            renderer.draw_polygon(entity.pos, entity.radius, sides, color);
        }
    }
}

/// Draw a full frame: fade, then pickups, enemies, projectiles, player on top
pub fn draw_scene(state: &GameState, renderer: &mut dyn Renderer) {
    renderer.clear_with_fade(state.tuning.trail_fade_alpha);
    for upgrade in &state.upgrades {
        draw_entity(upgrade, renderer);
    }
    for enemy in &state.enemies {
        draw_entity(enemy, renderer);
    }
    for projectile in &state.projectiles {
        draw_entity(projectile, renderer);
    }
    draw_entity(&state.player, renderer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Arena;
    use crate::tuning::Tuning;

    #[derive(Debug, PartialEq)]
    enum Call {
        Fade(f32),
        Circle(Vec2, f32, Color),
        Polygon(Vec2, f32, u32, Color),
        Triangle(Vec2, f32, f32, Color),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Renderer for Recorder {
        fn clear_with_fade(&mut self, alpha: f32) {
            self.calls.push(Call::Fade(alpha));
        }
        fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.calls.push(Call::Circle(center, radius, color));
        }
        fn draw_polygon(&mut self, center: Vec2, radius: f32, sides: u32, color: Color) {
            self.calls.push(Call::Polygon(center, radius, sides, color));
        }
        fn draw_triangle(&mut self, center: Vec2, size: f32, angle: f32, color: Color) {
            self.calls.push(Call::Triangle(center, size, angle, color));
        }
    }

    #[test]
    fn test_hsl_primaries() {
        let red = Color::from_hsl(0.0, 1.0, 0.5);
        assert!((red.r - 1.0).abs() < 1e-6 && red.g.abs() < 1e-6 && red.b.abs() < 1e-6);
        let blue = Color::from_hsl(240.0, 1.0, 0.5);
        assert!(blue.r.abs() < 1e-6 && blue.g.abs() < 1e-6 && (blue.b - 1.0).abs() < 1e-6);
        let grey = Color::from_hsl(123.0, 0.0, 0.5);
        assert!((grey.r - 0.5).abs() < 1e-6 && (grey.g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_css_string() {
        assert_eq!(Color::BLACK.with_alpha(0.1).to_css(), "rgba(0, 0, 0, 0.1)");
        assert_eq!(Color::WHITE.to_css(), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn test_scene_dispatch_by_tag() {
        let mut state = GameState::new(Tuning::default(), Arena::new(800.0, 600.0), 9);
        state.start(0.0);
        state
            .upgrades
            .push(Entity::upgrade(100, Vec2::new(50.0, 50.0), UpgradeKind::TripleShot));
        state
            .enemies
            .push(Entity::boss(101, Vec2::new(0.0, 0.0), Vec2::ZERO));
        state.projectiles.push(Entity::projectile(
            102,
            Vec2::new(10.0, 10.0),
            Vec2::X,
            true,
        ));

        let mut recorder = Recorder::default();
        draw_scene(&state, &mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                Call::Fade(0.1),
                Call::Polygon(Vec2::new(50.0, 50.0), 15.0, 3, Color::rgb(0.4, 1.0, 0.4)),
                Call::Circle(Vec2::ZERO, 60.0, Color::BOSS),
                Call::Circle(Vec2::new(10.0, 10.0), 5.0, Color::EMPOWERED),
                Call::Triangle(Vec2::new(400.0, 300.0), 10.0, 0.0, Color::WHITE),
            ]
        );
    }
}
