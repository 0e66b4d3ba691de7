//! Spawn placement and enemy roster selection

use glam::Vec2;
use rand::Rng;

use super::collision::{Bounds, distance};
use super::enemy::EnemyTypeSpec;
use crate::error::PlacementError;

/// Rejection-sample a box position at least `min(w, h) / 2` away from `exclude`.
///
/// Samples uniformly in `[0, w - box] x [0, h - box]`. Gives up after
/// `max_attempts` draws instead of spinning forever on a canvas where the
/// clearance ring leaves no room.
pub fn place_away_from<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: Bounds,
    box_size: f32,
    exclude: Vec2,
    max_attempts: u32,
) -> Result<Vec2, PlacementError> {
    let min_distance = bounds.spawn_clearance();
    let span = Vec2::new(
        (bounds.width - box_size).max(0.0),
        (bounds.height - box_size).max(0.0),
    );

    for _ in 0..max_attempts {
        let candidate = Vec2::new(rng.random::<f32>() * span.x, rng.random::<f32>() * span.y);
        if distance(candidate, exclude) >= min_distance {
            return Ok(candidate);
        }
    }

    Err(PlacementError {
        attempts: max_attempts,
        min_distance,
    })
}

/// Pick a template uniformly from the roster
pub fn pick_enemy_type<R: Rng + ?Sized>(
    rng: &mut R,
    roster: &[EnemyTypeSpec],
) -> Option<EnemyTypeSpec> {
    if roster.is_empty() {
        return None;
    }
    Some(roster[rng.random_range(0..roster.len())])
}
