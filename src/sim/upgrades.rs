//! Temporary upgrades and their expiry
//!
//! Only an expiry timestamp is stored per kind. Countdown text is derived from
//! the current time on demand, so there is no second timer per activation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upgrade types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Holding fire shoots continuously
    AutoShoot,
    /// Each shot fires three projectiles
    TripleShot,
    /// Projectiles deal double damage and kills score double
    DoubleDamageAndPoints,
    /// Projectiles pass through enemies
    PiercingShot,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::AutoShoot,
        UpgradeKind::TripleShot,
        UpgradeKind::DoubleDamageAndPoints,
        UpgradeKind::PiercingShot,
    ];

    fn index(self) -> usize {
        match self {
            UpgradeKind::AutoShoot => 0,
            UpgradeKind::TripleShot => 1,
            UpgradeKind::DoubleDamageAndPoints => 2,
            UpgradeKind::PiercingShot => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpgradeKind::AutoShoot => "Auto Shoot",
            UpgradeKind::TripleShot => "Triple Shot",
            UpgradeKind::DoubleDamageAndPoints => "Double Damage & Points",
            UpgradeKind::PiercingShot => "Piercing Shot",
        }
    }

    /// Uniform pick over all kinds
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Active upgrade timers, one slot per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveUpgrades {
    expires_at: [Option<f64>; 4],
}

impl ActiveUpgrades {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer for `kind`.
    /// Returns true if the kind was already running (timer refreshed, not stacked).
    pub fn activate(&mut self, kind: UpgradeKind, now_ms: f64, duration_ms: f64) -> bool {
        let slot = &mut self.expires_at[kind.index()];
        let was_active = slot.is_some();
        *slot = Some(now_ms + duration_ms);
        was_active
    }

    #[inline]
    pub fn is_active(&self, kind: UpgradeKind) -> bool {
        self.expires_at[kind.index()].is_some()
    }

    pub fn expires_at(&self, kind: UpgradeKind) -> Option<f64> {
        self.expires_at[kind.index()]
    }

    /// Clear every kind whose timer ran out, returning them in `ALL` order
    pub fn expire(&mut self, now_ms: f64) -> Vec<UpgradeKind> {
        let mut expired = Vec::new();
        for kind in UpgradeKind::ALL {
            let slot = &mut self.expires_at[kind.index()];
            if slot.is_some_and(|at| now_ms >= at) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }

    /// Whole seconds left (rounded up), None if inactive
    pub fn remaining_secs(&self, kind: UpgradeKind, now_ms: f64) -> Option<u32> {
        self.expires_at(kind)
            .map(|at| ((at - now_ms).max(0.0) / 1000.0).ceil() as u32)
    }

    pub fn active_kinds(&self) -> impl Iterator<Item = UpgradeKind> + '_ {
        UpgradeKind::ALL.into_iter().filter(|k| self.is_active(*k))
    }

    pub fn any_active(&self) -> bool {
        self.expires_at.iter().any(Option::is_some)
    }

    /// HUD text, e.g. "Triple Shot: 4s | Piercing Shot: 9s" (empty when none)
    pub fn countdown_text(&self, now_ms: f64) -> String {
        self.active_kinds()
            .filter_map(|kind| {
                self.remaining_secs(kind, now_ms)
                    .map(|secs| format!("{}: {}s", kind.label(), secs))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Damage and score multiplier from Double Damage & Points
    pub fn multiplier(&self) -> u32 {
        if self.is_active(UpgradeKind::DoubleDamageAndPoints) {
            2
        } else {
            1
        }
    }

    pub fn clear(&mut self) {
        self.expires_at = [None; 4];
    }
}
