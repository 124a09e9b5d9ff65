//! Circular bodies shared by every game object
//!
//! Player, enemies, projectiles and upgrades all use the same `Entity` struct;
//! the `EntityKind` tag carries the per-variant data and drives behavior and
//! drawing via `match` instead of per-type overrides.

use glam::Vec2;

use super::collision::circles_touch;
use super::upgrades::UpgradeKind;
use crate::consts::*;
use crate::wrap_position;

/// Variant tag for an entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// The player glyph; `facing` is the aim angle toward the pointer
    Player { facing: f32 },
    /// Homing orb. `hue` is its display color (degrees), bosses use a fixed one
    Enemy { boss: bool, hue: f32 },
    /// A shot fired by the player
    Projectile {
        /// Fired while Double Damage & Points was active
        empowered: bool,
        /// Enemy IDs this projectile already damaged (piercing shots only)
        struck: Vec<u32>,
    },
    /// A collectible upgrade
    Upgrade { kind: UpgradeKind },
}

/// A positioned, moving circle
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Entity {
    pub fn player(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind: EntityKind::Player { facing: 0.0 },
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
        }
    }

    pub fn enemy(id: u32, pos: Vec2, radius: f32, hue: f32, vel: Vec2) -> Self {
        Self {
            id,
            kind: EntityKind::Enemy { boss: false, hue },
            pos,
            vel,
            radius,
        }
    }

    pub fn boss(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind: EntityKind::Enemy {
                boss: true,
                hue: 0.0,
            },
            pos,
            vel,
            radius: BOSS_RADIUS,
        }
    }

    pub fn projectile(id: u32, pos: Vec2, vel: Vec2, empowered: bool) -> Self {
        Self {
            id,
            kind: EntityKind::Projectile {
                empowered,
                struck: Vec::new(),
            },
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
        }
    }

    pub fn upgrade(id: u32, pos: Vec2, kind: UpgradeKind) -> Self {
        Self {
            id,
            kind: EntityKind::Upgrade { kind },
            pos,
            vel: Vec2::ZERO,
            radius: UPGRADE_RADIUS,
        }
    }

    /// Advance one frame: `pos += vel`, no damping
    #[inline]
    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    /// Wrap the position into the arena (player wrap-around option)
    pub fn wrap_within(&mut self, width: f32, height: f32) {
        self.pos = wrap_position(self.pos, width, height);
    }

    /// Generous overlap test: edges closer than `COLLISION_TOLERANCE` count
    #[inline]
    pub fn collides_with(&self, other: &Entity) -> bool {
        circles_touch(self.pos, self.radius, other.pos, other.radius)
    }

    /// Pure pursuit: point the velocity straight at `target` with the given speed
    pub fn steer_toward(&mut self, target: Vec2, speed: f32) {
        self.vel = (target - self.pos).normalize_or_zero() * speed;
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy { boss: true, .. })
    }

    pub fn upgrade_kind(&self) -> Option<UpgradeKind> {
        match self.kind {
            EntityKind::Upgrade { kind } => Some(kind),
            _ => None,
        }
    }

    /// Player aim angle, zero for every other kind
    pub fn facing(&self) -> f32 {
        match self.kind {
            EntityKind::Player { facing } => facing,
            _ => 0.0,
        }
    }

    pub fn set_facing(&mut self, angle: f32) {
        if let EntityKind::Player { facing } = &mut self.kind {
            *facing = angle;
        }
    }

    /// Whether this (piercing) projectile already damaged the enemy `id`
    pub fn has_struck(&self, id: u32) -> bool {
        match &self.kind {
            EntityKind::Projectile { struck, .. } => struck.contains(&id),
            _ => false,
        }
    }

    pub fn mark_struck(&mut self, id: u32) {
        if let EntityKind::Projectile { struck, .. } = &mut self.kind {
            struck.push(id);
        }
    }
}
