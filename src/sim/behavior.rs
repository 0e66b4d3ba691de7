//! Enemy behavior state machines
//!
//! Each behavior kind implements [`Behavior`]; [`EnemyBehavior`] is the sum
//! type an enemy carries, holding the per-instance state of its kind. A new
//! kind is a new struct plus a new variant: existing kinds stay untouched.
//!
//! Behaviors only run while the enemy is not collision-stunned; the tick
//! handles that gate.

use glam::Vec2;
use serde::Serialize;

use super::collision::{Bounds, WallStep, overlaps, unit_toward};
use super::enemy::{BehaviorKind, Body, Color, Enemy, EnemyTypeSpec};

/// Other enemies an enemy may bump into this tick.
///
/// Borrowed as the slices on either side of the enemy being advanced, so
/// positions already updated earlier in the tick are seen.
#[derive(Debug, Clone, Copy)]
pub struct Crowd<'a> {
    before: &'a [Enemy],
    after: &'a [Enemy],
}

impl<'a> Crowd<'a> {
    pub fn new(before: &'a [Enemy], after: &'a [Enemy]) -> Self {
        Self { before, after }
    }

    pub fn empty() -> Self {
        Self {
            before: &[],
            after: &[],
        }
    }

    /// Whether a box at `pos` would overlap any crowd member
    pub fn blocks(&self, pos: Vec2, box_size: f32) -> bool {
        self.before
            .iter()
            .chain(self.after)
            .filter(|other| other.joins_crowd())
            .any(|other| overlaps(pos, other.pos(), box_size))
    }
}

/// Everything a behavior may read while advancing one enemy
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub player: Vec2,
    pub bounds: Bounds,
    pub box_size: f32,
    pub now_ms: f64,
    pub crowd: Crowd<'a>,
}

/// Advance-one-tick contract shared by all behavior kinds
pub trait Behavior {
    /// Move the body and update internal state for one tick
    fn advance(&mut self, body: &mut Body, spec: &EnemyTypeSpec, env: &Surroundings<'_>);

    /// Whether enemies of this kind block each other's movement
    fn joins_crowd(&self) -> bool;

    /// Display color derived from the current internal state
    fn display_color(&self, spec: &EnemyTypeSpec) -> Color {
        spec.color
    }
}

/// Chases the player at constant speed, never overlapping fellow chasers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FollowPlayer;

impl Behavior for FollowPlayer {
    fn advance(&mut self, body: &mut Body, spec: &EnemyTypeSpec, env: &Surroundings<'_>) {
        // Standing on the player: direction undefined, hold still
        let Ok(dir) = unit_toward(body.pos, env.player) else {
            return;
        };

        let next = body.pos + dir * spec.speed;
        let candidate = match env.bounds.confine(body.pos, next, env.box_size) {
            WallStep::Inside(pos) => pos,
            WallStep::HitWall(pinned) => pinned,
        };

        if !env.crowd.blocks(candidate, env.box_size) {
            body.pos = candidate;
        }
    }

    fn joins_crowd(&self) -> bool {
        true
    }
}

/// Phase of the rush cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RushPhase {
    /// Aiming at the player, not moving
    Targeting,
    /// Dashing along the locked direction until a wall
    Rushing,
    /// Dazed after hitting a wall
    Stunned,
}

/// Aims, dashes in a straight line, slams into a wall, recovers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RushStraight {
    pub targeting_ms: f64,
    pub rush_delay_ms: f64,
    pub phase: RushPhase,
    pub phase_started_ms: f64,
    /// Unit direction of the next/current dash
    pub target_dir: Option<Vec2>,
}

impl RushStraight {
    pub fn new(targeting_ms: f64, rush_delay_ms: f64, now_ms: f64) -> Self {
        Self {
            targeting_ms,
            rush_delay_ms,
            phase: RushPhase::Targeting,
            phase_started_ms: now_ms,
            target_dir: None,
        }
    }

    fn elapsed(&self, now_ms: f64) -> f64 {
        now_ms - self.phase_started_ms
    }

    fn enter(&mut self, phase: RushPhase, now_ms: f64) {
        log::debug!("rusher {:?} -> {:?} at {:.0}ms", self.phase, phase, now_ms);
        if phase == RushPhase::Targeting {
            self.target_dir = None;
        }
        self.phase = phase;
        self.phase_started_ms = now_ms;
    }
}

impl Behavior for RushStraight {
    fn advance(&mut self, body: &mut Body, spec: &EnemyTypeSpec, env: &Surroundings<'_>) {
        let now = env.now_ms;
        match self.phase {
            RushPhase::Targeting => {
                // Re-aim every tick; keep the last good aim if we sit on the player
                if let Ok(dir) = unit_toward(body.pos, env.player) {
                    self.target_dir = Some(dir);
                }
                if self.elapsed(now) >= self.targeting_ms {
                    self.enter(RushPhase::Rushing, now);
                }
            }
            RushPhase::Rushing => match self.target_dir {
                // Never got an aim: nothing to dash along
                None => self.enter(RushPhase::Targeting, now),
                Some(dir) => {
                    let next = body.pos + dir * spec.speed;
                    match env.bounds.confine(body.pos, next, env.box_size) {
                        WallStep::Inside(pos) => body.pos = pos,
                        WallStep::HitWall(pinned) => {
                            body.pos = pinned;
                            self.enter(RushPhase::Stunned, now);
                        }
                    }
                }
            },
            RushPhase::Stunned => {
                if self.elapsed(now) >= self.rush_delay_ms {
                    self.enter(RushPhase::Targeting, now);
                }
            }
        }
        body.color = self.display_color(spec);
    }

    fn joins_crowd(&self) -> bool {
        false
    }

    fn display_color(&self, spec: &EnemyTypeSpec) -> Color {
        match self.phase {
            RushPhase::Targeting => spec.color.with_alpha(0.6),
            RushPhase::Rushing => spec.color,
            RushPhase::Stunned => spec.color.with_alpha(0.3),
        }
    }
}

/// Per-instance behavior state, one variant per kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EnemyBehavior {
    FollowPlayer(FollowPlayer),
    RushStraight(RushStraight),
}

impl EnemyBehavior {
    pub fn for_kind(kind: BehaviorKind, now_ms: f64) -> Self {
        match kind {
            BehaviorKind::FollowPlayer => Self::FollowPlayer(FollowPlayer),
            BehaviorKind::RushStraight {
                targeting_ms,
                rush_delay_ms,
            } => Self::RushStraight(RushStraight::new(targeting_ms, rush_delay_ms, now_ms)),
        }
    }

    pub fn rush_phase(&self) -> Option<RushPhase> {
        match self {
            Self::RushStraight(rush) => Some(rush.phase),
            Self::FollowPlayer(_) => None,
        }
    }

    fn as_behavior(&self) -> &dyn Behavior {
        match self {
            Self::FollowPlayer(b) => b,
            Self::RushStraight(b) => b,
        }
    }

    fn as_behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Self::FollowPlayer(b) => b,
            Self::RushStraight(b) => b,
        }
    }
}

impl Behavior for EnemyBehavior {
    fn advance(&mut self, body: &mut Body, spec: &EnemyTypeSpec, env: &Surroundings<'_>) {
        self.as_behavior_mut().advance(body, spec, env);
    }

    fn joins_crowd(&self) -> bool {
        self.as_behavior().joins_crowd()
    }

    fn display_color(&self, spec: &EnemyTypeSpec) -> Color {
        self.as_behavior().display_color(spec)
    }
}
