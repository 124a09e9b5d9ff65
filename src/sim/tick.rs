//! Per-frame simulation step
//!
//! Order within a frame: fire, move player, move projectiles, steer and move
//! enemies, projectile/enemy hits, enemy/player contact, upgrade pickup,
//! projectile culling, spawn timers, upgrade expiry.

use glam::Vec2;

use super::collision::{self, HitRules};
use super::entity::{Entity, EntityKind};
use super::spawn::run_spawners;
use super::state::{GameEvent, GameState};
use super::upgrades::UpgradeKind;
use crate::{heading, velocity_from_angle};

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// Per-axis direction in {-1, 0, 1}; right beats left, down beats up
    pub fn direction(&self) -> Vec2 {
        let x = if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        };
        let y = if self.down {
            1.0
        } else if self.up {
            -1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub keys: MoveKeys,
    /// Pointer position in arena coordinates
    pub pointer: Vec2,
    /// Fire button went down since the last frame
    pub fire_pressed: bool,
    /// Fire button is currently held
    pub fire_held: bool,
}

/// Advance the game by one frame at time `now_ms`
pub fn tick(state: &mut GameState, input: &FrameInput, now_ms: f64) {
    if !state.is_running() {
        return;
    }

    state.time_ms = now_ms;
    state.frame += 1;

    handle_fire(state, input, now_ms);
    move_player(state, input);

    for projectile in &mut state.projectiles {
        projectile.update();
    }

    let target = state.player.pos;
    for enemy in &mut state.enemies {
        let speed = homing_speed(enemy, state.tuning.enemy_speed, state.tuning.boss_speed);
        enemy.steer_toward(target, speed);
        enemy.update();
    }

    // 1. Projectiles vs enemies
    let rules = HitRules::from_tuning(
        &state.tuning,
        state.effects.multiplier(),
        state.effects.is_active(UpgradeKind::PiercingShot),
    );
    let outcome =
        collision::projectile_enemy_pass(&mut state.projectiles, &mut state.enemies, &rules);
    state.award(outcome.points);
    for id in outcome.destroyed {
        state.push_event(GameEvent::EnemyDestroyed { id });
    }

    // 2. Enemies vs player: the run ends right here
    if let Some(id) = collision::enemy_touching_player(&state.player, &state.enemies) {
        log::debug!("Enemy {} reached the player", id);
        state.end_run();
        return;
    }

    // 3. Upgrades vs player
    for kind in collision::take_touching_upgrades(&state.player, &mut state.upgrades) {
        let refreshed = state
            .effects
            .activate(kind, now_ms, state.tuning.upgrade_duration_ms);
        log::debug!("Upgrade {:?} activated (refreshed: {})", kind, refreshed);
        state.push_event(GameEvent::UpgradeActivated { kind, refreshed });
    }

    // 4. Projectiles vs bounds
    collision::cull_out_of_bounds(&mut state.projectiles, &state.arena);

    run_spawners(state, now_ms);

    for kind in state.effects.expire(now_ms) {
        log::debug!("Upgrade {:?} expired", kind);
        state.push_event(GameEvent::UpgradeExpired(kind));
    }
}

/// Pursuit speed for an enemy (bosses are slower), zero for other kinds
fn homing_speed(entity: &Entity, enemy_speed: f32, boss_speed: f32) -> f32 {
    match entity.kind {
        EntityKind::Enemy { boss: true, .. } => boss_speed,
        EntityKind::Enemy { boss: false, .. } => enemy_speed,
        _ => 0.0,
    }
}

/// Velocity straight from the keys, no acceleration; facing follows the pointer
fn move_player(state: &mut GameState, input: &FrameInput) {
    let player = &mut state.player;
    player.vel = input.keys.direction() * state.tuning.player_speed;
    player.update();
    if state.tuning.wrap_around {
        player.wrap_within(state.arena.width, state.arena.height);
    }
    player.set_facing(heading(player.pos, input.pointer));
}

/// A press always fires; with Auto Shoot a held button refires on a cadence
fn handle_fire(state: &mut GameState, input: &FrameInput, now_ms: f64) {
    let auto_ready = input.fire_held
        && state.effects.is_active(UpgradeKind::AutoShoot)
        && state
            .last_shot_ms
            .is_none_or(|last| now_ms - last >= state.tuning.auto_shoot_interval_ms);

    if input.fire_pressed || auto_ready {
        shoot(state, input.pointer, now_ms);
    }
}

/// Fire toward `aim` from the player's position
pub fn shoot(state: &mut GameState, aim: Vec2, now_ms: f64) {
    let origin = state.player.pos;
    let angle = heading(origin, aim);
    let empowered = state.effects.is_active(UpgradeKind::DoubleDamageAndPoints);
    let speed = state.tuning.projectile_speed;

    let spread = state.tuning.triple_shot_spread;
    let angles = if state.effects.is_active(UpgradeKind::TripleShot) {
        vec![angle, angle - spread, angle + spread]
    } else {
        vec![angle]
    };

    for a in angles {
        let id = state.next_entity_id();
        state.projectiles.push(Entity::projectile(
            id,
            origin,
            velocity_from_angle(a, speed),
            empowered,
        ));
    }
    state.last_shot_ms = Some(now_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Arena, GamePhase};
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(Tuning::default(), Arena::new(800.0, 600.0), 12345);
        state.start(0.0);
        state.drain_events();
        state
    }

    #[test]
    fn test_direction_priorities() {
        let keys = MoveKeys {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(keys.direction(), Vec2::new(1.0, 1.0));
        let keys = MoveKeys {
            up: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(keys.direction(), Vec2::new(-1.0, -1.0));
        assert_eq!(MoveKeys::default().direction(), Vec2::ZERO);
    }

    #[test]
    fn test_idle_and_game_over_do_not_tick() {
        let mut state = GameState::new(Tuning::default(), Arena::new(800.0, 600.0), 1);
        tick(&mut state, &FrameInput::default(), 16.0);
        assert_eq!(state.frame, 0);

        let mut state = running();
        state.end_run();
        let pos = state.player.pos;
        let input = FrameInput {
            keys: MoveKeys {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, 16.0);
        assert_eq!(state.player.pos, pos);
    }

    #[test]
    fn test_player_moves_two_units() {
        let mut state = running();
        let input = FrameInput {
            keys: MoveKeys {
                right: true,
                up: true,
                ..Default::default()
            },
            pointer: Vec2::new(402.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, 16.0);
        assert_eq!(state.player.pos, Vec2::new(402.0, 298.0));
        assert!((state.player.facing() + std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_player_wraps_when_enabled() {
        let mut state = running();
        state.tuning.wrap_around = true;
        state.player.pos = Vec2::new(799.0, 300.0);
        let input = FrameInput {
            keys: MoveKeys {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, 16.0);
        assert_eq!(state.player.pos, Vec2::new(1.0, 300.0));
    }

    #[test]
    fn test_press_fires_one_projectile() {
        let mut state = running();
        let input = FrameInput {
            pointer: Vec2::new(600.0, 300.0),
            fire_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &input, 16.0);
        assert_eq!(state.projectiles.len(), 1);
        // Fired then advanced once along +x at speed 5
        assert!((state.projectiles[0].pos - Vec2::new(405.0, 300.0)).length() < 1e-4);
    }

    #[test]
    fn test_holding_without_auto_shoot_does_not_refire() {
        let mut state = running();
        let input = FrameInput {
            pointer: Vec2::new(600.0, 300.0),
            fire_held: true,
            ..Default::default()
        };
        tick(&mut state, &input, 16.0);
        tick(&mut state, &input, 200.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_auto_shoot_cadence() {
        let mut state = running();
        state
            .effects
            .activate(UpgradeKind::AutoShoot, 0.0, state.tuning.upgrade_duration_ms);
        let input = FrameInput {
            pointer: Vec2::new(600.0, 300.0),
            fire_held: true,
            ..Default::default()
        };
        tick(&mut state, &input, 16.0); // first shot
        tick(&mut state, &input, 50.0); // too soon
        tick(&mut state, &input, 96.0); // 80ms later
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_triple_shot_spread() {
        let mut state = running();
        state
            .effects
            .activate(UpgradeKind::TripleShot, 0.0, state.tuning.upgrade_duration_ms);
        shoot(&mut state, Vec2::new(600.0, 300.0), 0.0);

        let angles: Vec<f32> = state
            .projectiles
            .iter()
            .map(|p| p.vel.y.atan2(p.vel.x))
            .collect();
        assert_eq!(angles.len(), 3);
        assert!(angles[0].abs() < 1e-6);
        assert!((angles[1] + 0.1).abs() < 1e-5);
        assert!((angles[2] - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_empowered_flag_follows_double_damage() {
        let mut state = running();
        shoot(&mut state, Vec2::new(600.0, 300.0), 0.0);
        state
            .effects
            .activate(UpgradeKind::DoubleDamageAndPoints, 0.0, 1_000.0);
        shoot(&mut state, Vec2::new(600.0, 300.0), 0.0);

        let flags: Vec<bool> = state
            .projectiles
            .iter()
            .map(|p| matches!(p.kind, EntityKind::Projectile { empowered: true, .. }))
            .collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_enemy_homes_on_player() {
        let mut state = running();
        let id = state.next_entity_id();
        state.enemies.push(Entity::enemy(
            id,
            Vec2::new(100.0, 300.0),
            20.0,
            0.0,
            Vec2::new(0.0, 5.0),
        ));
        let bid = state.next_entity_id();
        state.enemies.push(Entity::boss(bid, Vec2::new(400.0, 0.0), Vec2::ZERO));

        tick(&mut state, &FrameInput::default(), 16.0);

        assert!((state.enemies[0].vel - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert!((state.enemies[0].pos - Vec2::new(101.0, 300.0)).length() < 1e-4);
        assert!((state.enemies[1].vel - Vec2::new(0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_enemy_contact_ends_run() {
        let mut state = running();
        state.award(250);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Entity::enemy(id, Vec2::new(420.0, 300.0), 15.0, 0.0, Vec2::ZERO));

        tick(&mut state, &FrameInput::default(), 16.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.scheduler.is_running());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::GameOver { final_score: 250 })
        );
    }

    #[test]
    fn test_pickup_activates_upgrade() {
        let mut state = running();
        let id = state.next_entity_id();
        state.upgrades.push(Entity::upgrade(
            id,
            Vec2::new(410.0, 300.0),
            UpgradeKind::PiercingShot,
        ));

        tick(&mut state, &FrameInput::default(), 16.0);

        assert!(state.upgrades.is_empty());
        assert!(state.effects.is_active(UpgradeKind::PiercingShot));
        assert_eq!(
            state.effects.expires_at(UpgradeKind::PiercingShot),
            Some(16.0 + state.tuning.upgrade_duration_ms)
        );
        assert!(state.drain_events().contains(&GameEvent::UpgradeActivated {
            kind: UpgradeKind::PiercingShot,
            refreshed: false
        }));
    }

    #[test]
    fn test_upgrade_expires_during_tick() {
        let mut state = running();
        state.effects.activate(UpgradeKind::TripleShot, 0.0, 100.0);
        tick(&mut state, &FrameInput::default(), 50.0);
        assert!(state.effects.is_active(UpgradeKind::TripleShot));
        tick(&mut state, &FrameInput::default(), 100.0);
        assert!(!state.effects.is_active(UpgradeKind::TripleShot));
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::UpgradeExpired(UpgradeKind::TripleShot))
        );
    }

    #[test]
    fn test_spawn_timers_fire_from_tick() {
        let mut state = running();
        tick(&mut state, &FrameInput::default(), 499.0);
        assert!(state.enemies.is_empty());
        tick(&mut state, &FrameInput::default(), 500.0);
        assert_eq!(state.enemies.len(), 1);
        tick(&mut state, &FrameInput::default(), 10_000.0);
        assert_eq!(state.upgrades.len(), 1);
    }

    #[test]
    fn test_zero_sized_arena_still_spawns() {
        let tuning = Tuning {
            upgrade_spawn_interval_ms: 500.0,
            boss_interval_ms: 500.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, Arena::new(0.0, 0.0), 1);
        state.start(0.0);
        tick(&mut state, &FrameInput::default(), 500.0);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.upgrades.len(), 1);
    }
}
