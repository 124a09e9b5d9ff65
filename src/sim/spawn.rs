//! Spawn scheduling and producers
//!
//! Three interval timers (enemy, upgrade, boss) are owned by the game state
//! and polled from the frame clock. Each start issues a new generation handle,
//! so timers from a previous run cannot fire into the next one.

use glam::Vec2;
use rand::Rng;

use super::entity::Entity;
use super::state::{Arena, GameEvent, GameState};
use super::upgrades::UpgradeKind;
use crate::consts::*;
use crate::tuning::Tuning;

/// What a timer produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEvent {
    Enemy,
    Upgrade,
    Boss,
}

/// Identifies the run a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerHandle {
    pub generation: u32,
}

/// A cancelable repeating timer driven by polling
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    handle: TimerHandle,
    interval_ms: f64,
    next_fire_ms: f64,
    active: bool,
}

impl IntervalTimer {
    fn idle() -> Self {
        Self {
            handle: TimerHandle::default(),
            interval_ms: 0.0,
            next_fire_ms: 0.0,
            active: false,
        }
    }

    /// First fire is one full interval after `now_ms`
    pub fn start(handle: TimerHandle, now_ms: f64, interval_ms: f64) -> Self {
        Self {
            handle,
            interval_ms,
            next_fire_ms: now_ms + interval_ms,
            active: true,
        }
    }

    /// Restart at a new cadence, keeping the handle
    pub fn restart(&mut self, now_ms: f64, interval_ms: f64) {
        self.interval_ms = interval_ms;
        self.next_fire_ms = now_ms + interval_ms;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn handle(&self) -> TimerHandle {
        self.handle
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn next_fire_ms(&self) -> f64 {
        self.next_fire_ms
    }

    /// Number of times the timer fired up to `now_ms`.
    ///
    /// A timer far behind (e.g. a hidden tab) fires at most
    /// `MAX_CATCHUP_FIRES` times and then resyncs to `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        if !self.active {
            return 0;
        }
        let mut fires = 0;
        while now_ms >= self.next_fire_ms && fires < MAX_CATCHUP_FIRES {
            fires += 1;
            self.next_fire_ms += self.interval_ms;
        }
        if now_ms >= self.next_fire_ms {
            self.next_fire_ms = now_ms + self.interval_ms;
        }
        fires
    }
}

/// The three spawn timers of a run
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnScheduler {
    generation: u32,
    enemy: IntervalTimer,
    upgrade: IntervalTimer,
    boss: IntervalTimer,
    escalations: u32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnScheduler {
    /// A scheduler with no running timers
    pub fn new() -> Self {
        Self {
            generation: 0,
            enemy: IntervalTimer::idle(),
            upgrade: IntervalTimer::idle(),
            boss: IntervalTimer::idle(),
            escalations: 0,
        }
    }

    /// Cancel whatever is running and start fresh timers at default intervals
    pub fn start(&mut self, now_ms: f64, tuning: &Tuning) -> TimerHandle {
        self.teardown();
        self.generation = self.generation.wrapping_add(1);
        let handle = TimerHandle {
            generation: self.generation,
        };
        self.enemy = IntervalTimer::start(handle, now_ms, tuning.enemy_spawn_interval_ms);
        self.upgrade = IntervalTimer::start(handle, now_ms, tuning.upgrade_spawn_interval_ms);
        self.boss = IntervalTimer::start(handle, now_ms, tuning.boss_interval_ms);
        self.escalations = 0;
        handle
    }

    /// Cancel all timers
    pub fn teardown(&mut self) {
        self.enemy.cancel();
        self.upgrade.cancel();
        self.boss.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.enemy.is_active() || self.upgrade.is_active() || self.boss.is_active()
    }

    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            generation: self.generation,
        }
    }

    /// Due spawns, grouped by producer: enemies, then upgrades, then bosses.
    ///
    /// A timer whose handle is not the current generation belongs to an
    /// earlier run; it is cancelled and never fires.
    pub fn poll(&mut self, now_ms: f64) -> Vec<SpawnEvent> {
        let current = self.handle();
        let mut events = Vec::new();
        for (timer, event) in [
            (&mut self.enemy, SpawnEvent::Enemy),
            (&mut self.upgrade, SpawnEvent::Upgrade),
            (&mut self.boss, SpawnEvent::Boss),
        ] {
            if timer.handle() != current {
                timer.cancel();
                continue;
            }
            let fires = timer.poll(now_ms);
            events.extend(std::iter::repeat_n(event, fires as usize));
        }
        events
    }

    /// Halve the enemy and upgrade intervals and restart both at the new cadence.
    /// One-way: only `start` brings the defaults back.
    pub fn escalate(&mut self, now_ms: f64, tuning: &Tuning) -> u32 {
        let floor = tuning.min_spawn_interval_ms;
        let enemy = (self.enemy.interval_ms() * 0.5).max(floor);
        let upgrade = (self.upgrade.interval_ms() * 0.5).max(floor);
        self.enemy.restart(now_ms, enemy);
        self.upgrade.restart(now_ms, upgrade);
        self.escalations += 1;
        self.escalations
    }

    pub fn enemy_interval_ms(&self) -> f64 {
        self.enemy.interval_ms()
    }

    pub fn upgrade_interval_ms(&self) -> f64 {
        self.upgrade.interval_ms()
    }

    pub fn escalations(&self) -> u32 {
        self.escalations
    }
}

/// A point just outside a random arena edge, `radius` beyond it
fn edge_position<R: Rng + ?Sized>(rng: &mut R, arena: &Arena, radius: f32) -> Vec2 {
    if rng.random_bool(0.5) {
        let x = if rng.random_bool(0.5) {
            -radius
        } else {
            arena.width + radius
        };
        Vec2::new(x, rng.random_range(0.0..arena.height))
    } else {
        let y = if rng.random_bool(0.5) {
            -radius
        } else {
            arena.height + radius
        };
        Vec2::new(rng.random_range(0.0..arena.width), y)
    }
}

/// Spawn a regular enemy on a random edge, aimed at the player
pub fn spawn_enemy(state: &mut GameState) {
    let id = state.next_entity_id();
    let rng = &mut state.rng;
    let radius = ENEMY_MIN_SPAWN_RADIUS + rng.random_range(0.0..ENEMY_SPAWN_RADIUS_RANGE);
    let pos = edge_position(rng, &state.arena, radius);
    let hue = rng.random_range(0.0..360.0);

    let mut enemy = Entity::enemy(id, pos, radius, hue, Vec2::ZERO);
    enemy.steer_toward(state.player.pos, state.tuning.enemy_speed);
    log::debug!("Enemy {} spawned at ({:.0}, {:.0}) r={:.1}", id, pos.x, pos.y, radius);
    state.enemies.push(enemy);
}

/// Spawn an upgrade at a uniformly random point inside the arena
pub fn spawn_upgrade(state: &mut GameState) {
    let id = state.next_entity_id();
    let rng = &mut state.rng;
    let pos = Vec2::new(
        rng.random_range(0.0..state.arena.width),
        rng.random_range(0.0..state.arena.height),
    );
    let kind = UpgradeKind::random(rng);
    log::debug!("Upgrade {:?} spawned at ({:.0}, {:.0})", kind, pos.x, pos.y);
    state.upgrades.push(Entity::upgrade(id, pos, kind));
}

/// Spawn a boss on a random edge, aimed at the player
pub fn spawn_boss(state: &mut GameState) {
    let id = state.next_entity_id();
    let pos = edge_position(&mut state.rng, &state.arena, BOSS_RADIUS);
    let mut boss = Entity::boss(id, pos, Vec2::ZERO);
    boss.steer_toward(state.player.pos, state.tuning.boss_speed);
    state.enemies.push(boss);
}

/// Poll the timers and run every due producer.
///
/// A boss also escalates difficulty, restarting the other two timers.
pub fn run_spawners(state: &mut GameState, now_ms: f64) {
    for event in state.scheduler.poll(now_ms) {
        match event {
            SpawnEvent::Enemy => spawn_enemy(state),
            SpawnEvent::Upgrade => spawn_upgrade(state),
            SpawnEvent::Boss => {
                spawn_boss(state);
                let level = state.scheduler.escalate(now_ms, &state.tuning);
                log::info!(
                    "Boss #{} spawned, enemy interval {:.0}ms, upgrade interval {:.0}ms",
                    level,
                    state.scheduler.enemy_interval_ms(),
                    state.scheduler.upgrade_interval_ms()
                );
                state.push_event(GameEvent::BossSpawned { escalation: level });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_timer_fires_on_interval() {
        let mut timer = IntervalTimer::start(TimerHandle::default(), 0.0, 500.0);
        assert_eq!(timer.poll(499.0), 0);
        assert_eq!(timer.poll(500.0), 1);
        assert_eq!(timer.poll(999.0), 0);
        assert_eq!(timer.poll(1600.0), 2);
        assert_eq!(timer.next_fire_ms(), 2000.0);
    }

    #[test]
    fn test_timer_catchup_is_capped() {
        let mut timer = IntervalTimer::start(TimerHandle::default(), 0.0, 100.0);
        assert_eq!(timer.poll(10_000.0), MAX_CATCHUP_FIRES);
        assert_eq!(timer.next_fire_ms(), 10_100.0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timer = IntervalTimer::start(TimerHandle::default(), 0.0, 100.0);
        timer.cancel();
        assert_eq!(timer.poll(1_000.0), 0);
    }

    #[test]
    fn test_scheduler_orders_events() {
        let tuning = Tuning {
            enemy_spawn_interval_ms: 100.0,
            upgrade_spawn_interval_ms: 100.0,
            boss_interval_ms: 100.0,
            ..Tuning::default()
        };
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(0.0, &tuning);
        assert_eq!(
            scheduler.poll(100.0),
            vec![SpawnEvent::Enemy, SpawnEvent::Upgrade, SpawnEvent::Boss]
        );
    }

    #[test]
    fn test_stale_generation_never_fires() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(0.0, &tuning);
        let stale = scheduler.enemy.clone();

        scheduler.start(0.0, &tuning);
        scheduler.enemy = stale;

        assert!(!scheduler.poll(500.0).contains(&SpawnEvent::Enemy));
        assert!(!scheduler.enemy.is_active());
    }

    #[test]
    fn test_degenerate_arena_spawns_without_panicking() {
        let mut rng = Pcg32::seed_from_u64(5);
        let arena = Arena::new(0.0, 0.0);
        let p = edge_position(&mut rng, &arena, 10.0);
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn test_escalation_halves_and_restart_resets() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::new();
        let first = scheduler.start(0.0, &tuning);

        scheduler.escalate(150_000.0, &tuning);
        scheduler.escalate(300_000.0, &tuning);
        assert_eq!(scheduler.enemy_interval_ms(), 125.0);
        assert_eq!(scheduler.upgrade_interval_ms(), 2_500.0);
        assert_eq!(scheduler.escalations(), 2);

        let second = scheduler.start(400_000.0, &tuning);
        assert_ne!(first, second);
        assert_eq!(scheduler.enemy_interval_ms(), 500.0);
        assert_eq!(scheduler.upgrade_interval_ms(), 10_000.0);
        assert_eq!(scheduler.escalations(), 0);
    }

    #[test]
    fn test_escalation_respects_floor() {
        let tuning = Tuning {
            min_spawn_interval_ms: 200.0,
            ..Tuning::default()
        };
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(0.0, &tuning);
        for _ in 0..10 {
            scheduler.escalate(0.0, &tuning);
        }
        assert_eq!(scheduler.enemy_interval_ms(), 200.0);
        assert_eq!(scheduler.upgrade_interval_ms(), 200.0);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::new();
        assert!(!scheduler.is_running());
        scheduler.start(0.0, &tuning);
        assert!(scheduler.is_running());
        scheduler.teardown();
        assert!(!scheduler.is_running());
        assert!(scheduler.poll(1_000_000.0).is_empty());
    }

    #[test]
    fn test_edge_position_is_outside() {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let p = edge_position(&mut rng, &arena, 12.0);
            let on_vertical_edge = p.x == -12.0 || p.x == 812.0;
            let on_horizontal_edge = p.y == -12.0 || p.y == 612.0;
            assert!(on_vertical_edge || on_horizontal_edge);
        }
    }
}
