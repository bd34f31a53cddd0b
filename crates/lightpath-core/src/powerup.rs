use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::time::Timestamp;

/// Trait for game-specific power-up kind enums.
pub trait PowerUpKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Every kind the spawner may choose from.
    const ALL: &'static [Self];

    /// Short human-readable name for HUDs and logs.
    fn label(&self) -> &'static str;
}

/// A pickup lying in the arena, generic over the kind enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SpawnedPowerUp<K: PowerUpKind> {
    pub id: u32,
    pub kind: K,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub created_at: Timestamp,
}

impl<K: PowerUpKind> SpawnedPowerUp<K> {
    /// Whether the pickup has outlived `lifetime` at `now`.
    pub fn is_expired(&self, now: Timestamp, lifetime: Duration) -> bool {
        now >= self.created_at + lifetime
    }

    /// Circle overlap test against a head at `(x, y)` with radius `radius`.
    pub fn touches(&self, x: f32, y: f32, radius: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        let reach = radius + self.radius;
        dx * dx + dy * dy < reach * reach
    }

    /// Push the creation time forward, extending the remaining lifetime.
    pub fn shift(&mut self, by: Duration) {
        self.created_at += by;
    }
}
