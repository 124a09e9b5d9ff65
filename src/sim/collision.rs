//! Collision detection and resolution for circular entities
//!
//! Everything here is circle-vs-circle with a 1 unit tolerance. Removals are
//! mark-and-compact: a pass flags indices, then each collection is filtered
//! once, so nothing is spliced while it is being iterated.

use glam::Vec2;

use super::entity::Entity;
use super::state::Arena;
use super::upgrades::UpgradeKind;
use crate::consts::COLLISION_TOLERANCE;
use crate::tuning::Tuning;

/// True when two circles overlap or their edges are within the tolerance.
///
/// Radii are summed before subtracting so the result is symmetric in its
/// arguments.
#[inline]
pub fn circles_touch(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    (a - b).length() - (a_radius + b_radius) < COLLISION_TOLERANCE
}

/// Damage and scoring parameters for one projectile/enemy pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRules {
    /// Radius removed from an enemy per hit
    pub damage: f32,
    /// Enemies whose radius would drop to or below this are destroyed
    pub radius_floor: f32,
    /// Enemies above this radius (before the hit) award `large_points`
    pub large_radius: f32,
    pub large_points: u64,
    pub small_points: u64,
    /// Score multiplier
    pub multiplier: u32,
    /// Projectiles survive enemy contact
    pub piercing: bool,
}

impl HitRules {
    /// Rules for the current upgrade state; `multiplier` scales damage and points
    pub fn from_tuning(tuning: &Tuning, multiplier: u32, piercing: bool) -> Self {
        Self {
            damage: tuning.base_damage * multiplier as f32,
            radius_floor: tuning.enemy_radius_floor,
            large_radius: tuning.large_enemy_radius,
            large_points: tuning.large_enemy_points,
            small_points: tuning.small_enemy_points,
            multiplier,
            piercing,
        }
    }

    /// Points for hitting an enemy of the given (pre-hit) radius
    pub fn points_for(&self, radius: f32) -> u64 {
        let base = if radius > self.large_radius {
            self.large_points
        } else {
            self.small_points
        };
        base * u64::from(self.multiplier)
    }
}

/// What a projectile/enemy pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitOutcome {
    /// Points earned this pass
    pub points: u64,
    /// Number of projectile-enemy hits
    pub hits: u32,
    /// IDs of enemies destroyed (in hit order)
    pub destroyed: Vec<u32>,
    /// Projectiles consumed by hits
    pub projectiles_spent: usize,
}

/// Test every projectile against every live enemy and apply hits.
///
/// Iteration is in collection order. A non-piercing projectile stops at the
/// first enemy it touches (first match wins) and is removed. A piercing one
/// keeps going and damages each enemy at most once over its lifetime.
/// Destroyed enemies are skipped for the rest of the pass.
pub fn projectile_enemy_pass(
    projectiles: &mut Vec<Entity>,
    enemies: &mut Vec<Entity>,
    rules: &HitRules,
) -> HitOutcome {
    let mut outcome = HitOutcome::default();
    let mut spent = vec![false; projectiles.len()];
    let mut destroyed = vec![false; enemies.len()];

    for (pi, projectile) in projectiles.iter_mut().enumerate() {
        for (ei, enemy) in enemies.iter_mut().enumerate() {
            if destroyed[ei] || projectile.has_struck(enemy.id) {
                continue;
            }
            if !projectile.collides_with(enemy) {
                continue;
            }

            outcome.points += rules.points_for(enemy.radius);
            outcome.hits += 1;

            if enemy.radius - rules.damage <= rules.radius_floor {
                destroyed[ei] = true;
                outcome.destroyed.push(enemy.id);
            } else {
                enemy.radius -= rules.damage;
            }

            if rules.piercing {
                projectile.mark_struck(enemy.id);
            } else {
                spent[pi] = true;
                break;
            }
        }
    }

    outcome.projectiles_spent = spent.iter().filter(|s| **s).count();
    compact(projectiles, &spent);
    compact(enemies, &destroyed);
    outcome
}

/// ID of the first enemy touching the player, if any
pub fn enemy_touching_player(player: &Entity, enemies: &[Entity]) -> Option<u32> {
    enemies
        .iter()
        .find(|enemy| enemy.collides_with(player))
        .map(|enemy| enemy.id)
}

/// Remove every upgrade the player touches and return their kinds in order
pub fn take_touching_upgrades(player: &Entity, upgrades: &mut Vec<Entity>) -> Vec<UpgradeKind> {
    let touched: Vec<bool> = upgrades.iter().map(|u| u.collides_with(player)).collect();
    let kinds = upgrades
        .iter()
        .zip(&touched)
        .filter(|(_, hit)| **hit)
        .filter_map(|(u, _)| u.upgrade_kind())
        .collect();
    compact(upgrades, &touched);
    kinds
}

/// True once the whole circle has left the arena on any side
#[inline]
pub fn is_out_of_bounds(entity: &Entity, arena: &Arena) -> bool {
    let r = entity.radius;
    entity.pos.x + r < 0.0
        || entity.pos.y + r < 0.0
        || entity.pos.x - r > arena.width
        || entity.pos.y - r > arena.height
}

/// Drop projectiles that left the arena, returning how many were removed
pub fn cull_out_of_bounds(projectiles: &mut Vec<Entity>, arena: &Arena) -> usize {
    let before = projectiles.len();
    projectiles.retain(|p| !is_out_of_bounds(p, arena));
    before - projectiles.len()
}

/// Keep only the items whose flag is false (flags are index-aligned)
fn compact(items: &mut Vec<Entity>, removed: &[bool]) {
    let mut flags = removed.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}
