use std::time::Duration;

use serde::{Deserialize, Serialize};

use lightpath_core::game::PlayerId;
use lightpath_core::time::Timestamp;

use crate::Cycle;
use crate::effects::SpawnedPowerUp;

/// Everything that lives for one round: cycles, pickups, elimination
/// order and the spawner clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundContext {
    pub players: Vec<Cycle>,
    pub powerups: Vec<SpawnedPowerUp>,
    /// Ids in the order they died this round.
    pub elimination_order: Vec<PlayerId>,
    pub next_powerup_id: u32,
    /// Reference time of the last spawn decision.
    pub last_spawn_at: Timestamp,
    /// Wait after `last_spawn_at` before the next spawn (ms).
    pub spawn_interval_ms: u64,
}

impl RoundContext {
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|c| c.alive).count()
    }

    pub fn survivors(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|c| c.alive)
            .map(|c| c.id)
            .collect()
    }

    /// Mark the cycle at `index` dead and record it. No-op if already dead.
    pub fn eliminate(&mut self, index: usize) -> Option<PlayerId> {
        let cycle = self.players.get_mut(index)?;
        if !cycle.alive {
            return None;
        }
        cycle.alive = false;
        if !self.elimination_order.contains(&cycle.id) {
            self.elimination_order.push(cycle.id);
        }
        Some(cycle.id)
    }

    /// A multi-player round ends at one survivor or fewer; a solo round
    /// ends when its only player dies.
    pub fn is_over(&self) -> bool {
        match self.players.len() {
            0 => false,
            1 => self.alive_count() == 0,
            _ => self.alive_count() <= 1,
        }
    }

    pub fn next_spawn_at(&self) -> Timestamp {
        self.last_spawn_at + Duration::from_millis(self.spawn_interval_ms)
    }

    /// Move every stored absolute time forward by `by`, so time spent
    /// paused does not count against effects, pickups or the spawner.
    pub fn shift_timestamps(&mut self, by: Duration) {
        for cycle in &mut self.players {
            cycle.effects.shift(by);
        }
        for pu in &mut self.powerups {
            pu.shift(by);
        }
        self.last_spawn_at += by;
    }
}
