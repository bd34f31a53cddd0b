use std::time::Duration;

use serde::{Deserialize, Serialize};

use lightpath_core::powerup;
use lightpath_core::time::Timestamp;

/// Timed modifiers a cycle can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    SpeedBoost,
    ThinTrail,
    Invincible,
    ReverseControls,
    GhostMode,
    ThickTrail,
    /// Applied to every other living cycle by the slow-others pickup.
    Slowed,
}

impl EffectKind {
    pub const COUNT: usize = 7;

    pub const ALL: [EffectKind; Self::COUNT] = [
        EffectKind::SpeedBoost,
        EffectKind::ThinTrail,
        EffectKind::Invincible,
        EffectKind::ReverseControls,
        EffectKind::GhostMode,
        EffectKind::ThickTrail,
        EffectKind::Slowed,
    ];

    const fn index(self) -> usize {
        match self {
            EffectKind::SpeedBoost => 0,
            EffectKind::ThinTrail => 1,
            EffectKind::Invincible => 2,
            EffectKind::ReverseControls => 3,
            EffectKind::GhostMode => 4,
            EffectKind::ThickTrail => 5,
            EffectKind::Slowed => 6,
        }
    }
}

/// Active effects of one cycle: one optional absolute expiry per kind.
/// An empty slot means the effect is inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTable {
    expiries: [Option<Timestamp>; EffectKind::COUNT],
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `kind` until `now + duration`, replacing any earlier expiry.
    pub fn grant(&mut self, kind: EffectKind, now: Timestamp, duration: Duration) {
        self.expiries[kind.index()] = Some(now + duration);
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.expiries[kind.index()].is_some()
    }

    pub fn expiry(&self, kind: EffectKind) -> Option<Timestamp> {
        self.expiries[kind.index()]
    }

    /// Time left on `kind` at `now`, if active.
    pub fn remaining(&self, kind: EffectKind, now: Timestamp) -> Option<Duration> {
        self.expiry(kind)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Remove every effect whose expiry is at or before `now`.
    /// Returns the kinds that lapsed.
    pub fn prune(&mut self, now: Timestamp) -> Vec<EffectKind> {
        let mut lapsed = Vec::new();
        for kind in EffectKind::ALL {
            let slot = &mut self.expiries[kind.index()];
            if slot.is_some_and(|at| now >= at) {
                *slot = None;
                lapsed.push(kind);
            }
        }
        lapsed
    }

    /// Push every outstanding expiry forward by `by`.
    pub fn shift(&mut self, by: Duration) {
        for at in self.expiries.iter_mut().flatten() {
            *at += by;
        }
    }

    pub fn active_kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        EffectKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
    }

    pub fn clear(&mut self) {
        self.expiries = [None; EffectKind::COUNT];
    }

    /// Invincible and ghost mode both make the holder immune to collisions.
    pub fn grants_immunity(&self) -> bool {
        self.is_active(EffectKind::Invincible) || self.is_active(EffectKind::GhostMode)
    }
}

/// Pickup kinds the spawner places in power-up mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    ThinTrail,
    Invincible,
    ReverseControls,
    GhostMode,
    ThickTrail,
    SlowOthers,
    ClearTrail,
    Teleport,
}

/// What collecting a pickup does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    /// Timed effect on the collector.
    OnSelf(EffectKind),
    /// Timed effect on every other living cycle.
    OnOthers(EffectKind),
    ClearOwnTrail,
    Teleport,
}

impl PowerUpKind {
    pub fn effect(self) -> PickupEffect {
        match self {
            PowerUpKind::SpeedBoost => PickupEffect::OnSelf(EffectKind::SpeedBoost),
            PowerUpKind::ThinTrail => PickupEffect::OnSelf(EffectKind::ThinTrail),
            PowerUpKind::Invincible => PickupEffect::OnSelf(EffectKind::Invincible),
            PowerUpKind::ReverseControls => PickupEffect::OnSelf(EffectKind::ReverseControls),
            PowerUpKind::GhostMode => PickupEffect::OnSelf(EffectKind::GhostMode),
            PowerUpKind::ThickTrail => PickupEffect::OnSelf(EffectKind::ThickTrail),
            PowerUpKind::SlowOthers => PickupEffect::OnOthers(EffectKind::Slowed),
            PowerUpKind::ClearTrail => PickupEffect::ClearOwnTrail,
            PowerUpKind::Teleport => PickupEffect::Teleport,
        }
    }
}

impl powerup::PowerUpKind for PowerUpKind {
    const ALL: &'static [Self] = &[
        PowerUpKind::SpeedBoost,
        PowerUpKind::ThinTrail,
        PowerUpKind::Invincible,
        PowerUpKind::ReverseControls,
        PowerUpKind::GhostMode,
        PowerUpKind::ThickTrail,
        PowerUpKind::SlowOthers,
        PowerUpKind::ClearTrail,
        PowerUpKind::Teleport,
    ];

    fn label(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "speed boost",
            PowerUpKind::ThinTrail => "thin trail",
            PowerUpKind::Invincible => "invincible",
            PowerUpKind::ReverseControls => "reverse controls",
            PowerUpKind::GhostMode => "ghost mode",
            PowerUpKind::ThickTrail => "thick trail",
            PowerUpKind::SlowOthers => "slow others",
            PowerUpKind::ClearTrail => "clear trail",
            PowerUpKind::Teleport => "teleport",
        }
    }
}

/// Spawned pickup in the arena.
pub type SpawnedPowerUp = powerup::SpawnedPowerUp<PowerUpKind>;
