//! Game state and run lifecycle
//!
//! Everything the frame update and the spawn producers touch lives in
//! `GameState`; there is no global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::Entity;
use super::score::ScoreKeeper;
use super::spawn::SpawnScheduler;
use super::upgrades::{ActiveUpgrades, UpgradeKind};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Before the first start
    Idle,
    /// Loop and spawners active
    Running,
    /// Player was caught; score frozen until restart
    GameOver,
}

/// Things the UI layer reacts to, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted,
    ScoreChanged(u64),
    EnemyDestroyed { id: u32 },
    UpgradeActivated { kind: UpgradeKind, refreshed: bool },
    UpgradeExpired(UpgradeKind),
    BossSpawned { escalation: u32 },
    GameOver { final_score: u64 },
}

/// Playfield size (canvas size at load, not resized afterwards)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    /// Each side is at least one unit, so spawn ranges are never empty
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub arena: Arena,
    pub phase: GamePhase,
    pub player: Entity,
    /// Live enemies, in spawn order
    pub enemies: Vec<Entity>,
    /// Live projectiles, in fire order
    pub projectiles: Vec<Entity>,
    /// Uncollected upgrades, in spawn order
    pub upgrades: Vec<Entity>,
    pub score: ScoreKeeper,
    pub effects: ActiveUpgrades,
    pub scheduler: SpawnScheduler,
    /// Timestamp of the last tick (or of the run start)
    pub time_ms: f64,
    /// Timestamp the current run started
    pub run_started_ms: f64,
    /// Frames simulated this run
    pub frame: u64,
    /// When the player last fired (auto-shoot cadence)
    pub last_shot_ms: Option<f64>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle game; call `start` to begin a run
    pub fn new(tuning: Tuning, arena: Arena, seed: u64) -> Self {
        Self {
            tuning,
            arena,
            phase: GamePhase::Idle,
            player: Entity::player(0, arena.center()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            upgrades: Vec::new(),
            score: ScoreKeeper::new(),
            effects: ActiveUpgrades::new(),
            scheduler: SpawnScheduler::new(),
            time_ms: 0.0,
            run_started_ms: 0.0,
            frame: 0,
            last_shot_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Begin a run (first start or restart)
    pub fn start(&mut self, now_ms: f64) {
        self.reset(now_ms);
        self.phase = GamePhase::Running;
        self.push_event(GameEvent::RunStarted);
        log::info!("Run started");
    }

    /// Clear the previous run: cancel stale timers first, then rebuild
    /// everything at defaults and start fresh timers
    pub fn reset(&mut self, now_ms: f64) {
        self.teardown();

        self.enemies.clear();
        self.projectiles.clear();
        self.upgrades.clear();
        self.score.reset();
        self.effects.clear();
        self.events.clear();
        self.last_shot_ms = None;
        self.frame = 0;
        self.time_ms = now_ms;
        self.run_started_ms = now_ms;

        let id = self.next_entity_id();
        self.player = Entity::player(id, self.arena.center());

        self.scheduler.start(now_ms, &self.tuning);
    }

    /// Cancel all live timers
    pub fn teardown(&mut self) {
        self.scheduler.teardown();
    }

    /// Stop the run, freeze the score and drop active upgrades
    pub fn end_run(&mut self) {
        self.teardown();
        self.effects.clear();
        self.phase = GamePhase::GameOver;
        let final_score = self.score.value();
        log::info!("Game over, final score {}", final_score);
        self.push_event(GameEvent::GameOver { final_score });
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Milliseconds survived in the current run
    pub fn elapsed_ms(&self) -> f64 {
        self.time_ms - self.run_started_ms
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add points and report the new total
    pub fn award(&mut self, points: u64) {
        if points > 0 {
            let total = self.score.add(points);
            self.push_event(GameEvent::ScoreChanged(total));
        }
    }
}
