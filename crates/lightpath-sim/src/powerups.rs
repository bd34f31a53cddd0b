use std::collections::HashSet;

use rand::Rng;

use lightpath_core::game::PlayerId;
use lightpath_core::powerup::PowerUpKind as _;
use lightpath_core::time::Timestamp;

use crate::arena;
use crate::config::LightpathConfig;
use crate::effects::{PickupEffect, PowerUpKind, SpawnedPowerUp};
use crate::physics::trail_width;
use crate::round::RoundContext;
use crate::trail::TrailPoint;

/// A pickup claimed during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub player_id: PlayerId,
    pub powerup_id: u32,
    pub kind: PowerUpKind,
}

/// Draw the wait before the next spawn.
pub fn draw_spawn_interval<R: Rng + ?Sized>(rng: &mut R, config: &LightpathConfig) -> u64 {
    let lo = config.spawn_interval_min_ms;
    let hi = config.spawn_interval_max_ms.max(lo);
    rng.random_range(lo..=hi)
}

/// Remove pickups that outlived their lifetime.
pub fn expire(round: &mut RoundContext, now: Timestamp, config: &LightpathConfig) {
    let lifetime = config.powerup_lifetime();
    round.powerups.retain(|pu| {
        let expired = pu.is_expired(now, lifetime);
        if expired {
            tracing::debug!(powerup_id = pu.id, kind = pu.kind.label(), "Pickup expired");
        }
        !expired
    });
}

/// Spawn a pickup once the current interval has elapsed. The interval is
/// redrawn either way; a full arena skips the spawn.
pub fn maybe_spawn<R: Rng + ?Sized>(
    round: &mut RoundContext,
    now: Timestamp,
    rng: &mut R,
    config: &LightpathConfig,
) -> Option<u32> {
    if now < round.next_spawn_at() {
        return None;
    }
    round.last_spawn_at = now;
    round.spawn_interval_ms = draw_spawn_interval(rng, config);

    if round.powerups.len() >= config.max_active_powerups {
        return None;
    }

    let kinds = PowerUpKind::ALL;
    let kind = kinds[rng.random_range(0..kinds.len())];
    let (x, y) = arena::random_position(
        rng,
        config.arena_width,
        config.arena_height,
        config.spawn_buffer,
    );
    let id = round.next_powerup_id;
    round.next_powerup_id = round.next_powerup_id.wrapping_add(1);
    round.powerups.push(SpawnedPowerUp {
        id,
        kind,
        x,
        y,
        radius: config.powerup_radius,
        created_at: now,
    });
    tracing::debug!(powerup_id = id, kind = kind.label(), x, y, "Pickup spawned");
    Some(id)
}

/// Find every pickup touched by a living head. Each pickup goes to the
/// first cycle (in seat order) that touches it, exactly once.
pub fn find_pickups(round: &RoundContext) -> Vec<Pickup> {
    let mut collected: HashSet<u32> = HashSet::new();
    let mut pickups = Vec::new();
    for cycle in round.players.iter().filter(|c| c.alive) {
        for pu in &round.powerups {
            if collected.contains(&pu.id) {
                continue;
            }
            if pu.touches(cycle.x, cycle.y, cycle.radius) {
                collected.insert(pu.id);
                pickups.push(Pickup {
                    player_id: cycle.id,
                    powerup_id: pu.id,
                    kind: pu.kind,
                });
            }
        }
    }
    pickups
}

/// Collect touched pickups, apply their effects and remove them.
pub fn collect<R: Rng + ?Sized>(
    round: &mut RoundContext,
    now: Timestamp,
    rng: &mut R,
    config: &LightpathConfig,
) -> Vec<Pickup> {
    let pickups = find_pickups(round);
    if pickups.is_empty() {
        return pickups;
    }
    let taken: HashSet<u32> = pickups.iter().map(|p| p.powerup_id).collect();
    round.powerups.retain(|pu| !taken.contains(&pu.id));

    for pickup in &pickups {
        tracing::debug!(
            player_id = pickup.player_id,
            powerup_id = pickup.powerup_id,
            kind = pickup.kind.label(),
            "Pickup collected"
        );
        apply_pickup(round, pickup.player_id, pickup.kind, now, rng, config);
    }
    pickups
}

/// Apply the effect of `kind` collected by `collector`.
pub fn apply_pickup<R: Rng + ?Sized>(
    round: &mut RoundContext,
    collector: PlayerId,
    kind: PowerUpKind,
    now: Timestamp,
    rng: &mut R,
    config: &LightpathConfig,
) {
    match kind.effect() {
        PickupEffect::OnSelf(effect) => {
            let duration = config.effect_durations.for_kind(effect);
            if let Some(cycle) = round.players.iter_mut().find(|c| c.id == collector) {
                cycle.effects.grant(effect, now, duration);
            }
        },
        PickupEffect::OnOthers(effect) => {
            let duration = config.effect_durations.for_kind(effect);
            for cycle in round
                .players
                .iter_mut()
                .filter(|c| c.alive && c.id != collector)
            {
                cycle.effects.grant(effect, now, duration);
            }
        },
        PickupEffect::ClearOwnTrail => {
            if let Some(cycle) = round.players.iter_mut().find(|c| c.id == collector) {
                let anchor = cycle.trail.last_point().unwrap_or(TrailPoint {
                    x: cycle.x,
                    y: cycle.y,
                    width: trail_width(cycle, config),
                });
                cycle.trail.reset_to(anchor);
                tracing::debug!(player_id = collector, "Trail cleared");
            }
        },
        PickupEffect::Teleport => {
            if let Some(cycle) = round.players.iter_mut().find(|c| c.id == collector) {
                let (x, y) = arena::random_position(
                    rng,
                    config.arena_width,
                    config.arena_height,
                    config.spawn_buffer,
                );
                cycle.x = x;
                cycle.y = y;
                let width = trail_width(cycle, config);
                cycle.trail.relocate_head(TrailPoint { x, y, width });
                tracing::debug!(player_id = collector, x, y, "Teleported");
            }
        },
    }
}
