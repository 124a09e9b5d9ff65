//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Time is passed in as a millisecond timestamp
//! - Seeded RNG only
//! - Stable iteration order (collections keep spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use collision::{HitOutcome, HitRules, circles_touch, projectile_enemy_pass};
pub use entity::{Entity, EntityKind};
pub use score::ScoreKeeper;
pub use spawn::{SpawnEvent, SpawnScheduler, TimerHandle};
pub use state::{Arena, GameEvent, GamePhase, GameState};
pub use tick::{FrameInput, MoveKeys, tick};
pub use upgrades::{ActiveUpgrades, UpgradeKind};
