use std::f32::consts::TAU;

use crate::Cycle;
use crate::config::LightpathConfig;
use crate::controls::TurnIntent;
use crate::effects::{EffectKind, EffectTable};
use crate::trail::TrailPoint;

/// Apply reverse controls to the raw intent.
pub fn resolve_turn(raw: TurnIntent, effects: &EffectTable) -> TurnIntent {
    if effects.is_active(EffectKind::ReverseControls) {
        raw.swapped()
    } else {
        raw
    }
}

/// Wrap an angle into `[0, TAU)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Base speed scaled by boost and slow; both compose multiplicatively.
pub fn effective_speed(cycle: &Cycle, config: &LightpathConfig) -> f32 {
    let mut speed = cycle.speed;
    if cycle.effects.is_active(EffectKind::SpeedBoost) {
        speed *= config.speed_boost_multiplier;
    }
    if cycle.effects.is_active(EffectKind::Slowed) {
        speed *= config.slow_multiplier;
    }
    speed
}

/// Width newly emitted trail points are drawn with.
pub fn trail_width(cycle: &Cycle, config: &LightpathConfig) -> f32 {
    let mut width = config.base_trail_width;
    if cycle.effects.is_active(EffectKind::ThinTrail) {
        width *= config.thin_trail_multiplier;
    }
    if cycle.effects.is_active(EffectKind::ThickTrail) {
        width *= config.thick_trail_multiplier;
    }
    width
}

/// Turn, move and record the trail for one step. Dead cycles are inert.
pub fn advance(cycle: &mut Cycle, intent: TurnIntent, config: &LightpathConfig) {
    if !cycle.alive {
        return;
    }

    if intent.left {
        cycle.angle -= cycle.turn_speed;
    }
    if intent.right {
        cycle.angle += cycle.turn_speed;
    }
    cycle.angle = normalize_angle(cycle.angle);

    let speed = effective_speed(cycle, config);
    cycle.x += speed * cycle.angle.cos();
    cycle.y += speed * cycle.angle.sin();

    if cycle.making_hole {
        cycle.trail.push_gap();
    } else {
        let width = trail_width(cycle, config);
        cycle.trail.push_point(TrailPoint {
            x: cycle.x,
            y: cycle.y,
            width,
        });
    }
}
