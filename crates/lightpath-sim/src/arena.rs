use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A spawn position with starting heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// Range of coordinates at least `buffer` away from both ends of
/// `[0, extent]`. Collapses to the midpoint when the buffer eats the
/// whole extent.
pub fn safe_range(extent: f32, buffer: f32) -> (f32, f32) {
    let lo = buffer.max(0.0);
    let hi = extent - lo;
    if lo >= hi {
        let mid = extent / 2.0;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}

/// Random position inside the safe zone.
pub fn random_position<R: Rng + ?Sized>(
    rng: &mut R,
    width: f32,
    height: f32,
    buffer: f32,
) -> (f32, f32) {
    let x = sample(rng, safe_range(width, buffer));
    let y = sample(rng, safe_range(height, buffer));
    (x, y)
}

/// Random position inside the safe zone with a uniformly random heading.
pub fn random_spawn<R: Rng + ?Sized>(
    rng: &mut R,
    width: f32,
    height: f32,
    buffer: f32,
) -> SpawnPoint {
    let (x, y) = random_position(rng, width, height, buffer);
    let angle = rng.random_range(0.0..TAU);
    SpawnPoint { x, y, angle }
}
