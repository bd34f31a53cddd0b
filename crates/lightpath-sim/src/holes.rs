use rand::Rng;

use crate::Cycle;
use crate::config::LightpathConfig;

/// Advance the hole generator of one cycle by a step.
///
/// A running hole counts down and ends at zero. A cycle not in a hole
/// then gets a Bernoulli trial to start a new one. Returns whether a
/// hole started this step.
pub fn update_hole<R: Rng + ?Sized>(
    cycle: &mut Cycle,
    rng: &mut R,
    config: &LightpathConfig,
) -> bool {
    if cycle.making_hole {
        cycle.hole_timer = cycle.hole_timer.saturating_sub(1);
        if cycle.hole_timer == 0 {
            cycle.making_hole = false;
        }
    }

    // random_bool panics outside [0, 1]; NaN survives clamp.
    let p = if config.hole_probability.is_finite() {
        config.hole_probability.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if !cycle.making_hole && rng.random_bool(p) {
        cycle.making_hole = true;
        cycle.hole_timer = config.hole_duration_steps;
        tracing::debug!(player_id = cycle.id, steps = cycle.hole_timer, "Hole started");
        return true;
    }
    false
}
