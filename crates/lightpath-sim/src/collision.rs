use lightpath_core::game::PlayerId;

use crate::Cycle;

/// Why a cycle died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCause {
    Boundary,
    /// Hit the trail owned by `owner` (possibly itself).
    Trail { owner: PlayerId },
}

/// Whether the head leaves `[0, width] x [0, height]`.
pub fn check_boundary(cycle: &Cycle, width: f32, height: f32) -> bool {
    cycle.x - cycle.radius < 0.0
        || cycle.x + cycle.radius > width
        || cycle.y - cycle.radius < 0.0
        || cycle.y + cycle.radius > height
}

/// First trail the head overlaps, testing every recorded point of every
/// cycle and skipping the newest `self_exclusion` points of its own.
pub fn check_trail_collision(
    cycle: &Cycle,
    all: &[Cycle],
    self_exclusion: usize,
) -> Option<PlayerId> {
    for other in all {
        let skip = if other.id == cycle.id {
            self_exclusion
        } else {
            0
        };
        let reach = cycle.radius + other.radius;
        let reach_sq = reach * reach;
        let hit = other.trail.points_excluding_recent(skip).any(|p| {
            let dx = cycle.x - p.x;
            let dy = cycle.y - p.y;
            dx * dx + dy * dy < reach_sq
        });
        if hit {
            return Some(other.id);
        }
    }
    None
}

/// Full collision test in priority order. Holes, invincibility and ghost
/// mode grant immunity to both boundary and trails.
pub fn collision_cause(
    cycle: &Cycle,
    width: f32,
    height: f32,
    all: &[Cycle],
    self_exclusion: usize,
) -> Option<CollisionCause> {
    if cycle.making_hole || cycle.effects.grants_immunity() {
        return None;
    }
    if check_boundary(cycle, width, height) {
        return Some(CollisionCause::Boundary);
    }
    check_trail_collision(cycle, all, self_exclusion).map(|owner| CollisionCause::Trail { owner })
}

pub fn check_collision(
    cycle: &Cycle,
    width: f32,
    height: f32,
    all: &[Cycle],
    self_exclusion: usize,
) -> bool {
    collision_cause(cycle, width, height, all, self_exclusion).is_some()
}
