//! Orb Siege - a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, spawning, upgrades, game state)
//! - `renderer`: Drawing abstraction and the 2D canvas backend
//! - `platform`: Browser/native platform abstraction (time, input, storage)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Ranked leaderboard

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step (60 Hz, one "frame" of movement)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Entity radii (fixed sizes, not part of `Tuning`)
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const UPGRADE_RADIUS: f32 = 15.0;
    pub const BOSS_RADIUS: f32 = 60.0;

    /// Regular enemies spawn with a radius in [MIN, MIN + RANGE)
    pub const ENEMY_MIN_SPAWN_RADIUS: f32 = 10.0;
    pub const ENEMY_SPAWN_RADIUS_RANGE: f32 = 15.0;

    /// Circles closer than this (edge to edge) count as touching
    pub const COLLISION_TOLERANCE: f32 = 1.0;

    /// A spawn timer that fell behind fires at most this many times per poll
    pub const MAX_CATCHUP_FIRES: u32 = 8;
}

/// Angle (radians) of the direction from `from` toward `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Velocity of the given speed pointing along `angle`
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

/// Wrap a position into `[0, width) x [0, height)`
#[inline]
pub fn wrap_position(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(pos.x.rem_euclid(width), pos.y.rem_euclid(height))
}
