//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, inputs and tick
//! timestamps, a session plays out identically:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod collision;
pub mod enemy;
pub mod spawn;
pub mod state;
pub mod tick;

pub use behavior::{
    Behavior, Crowd, EnemyBehavior, FollowPlayer, RushPhase, RushStraight, Surroundings,
};
pub use collision::{Bounds, WallStep, distance, overlaps, unit_toward};
pub use enemy::{BehaviorKind, Body, Color, Enemy, EnemyTypeSpec};
pub use spawn::{pick_enemy_type, place_away_from};
pub use state::{GameEvent, GameState, Pickup, Player};
pub use tick::{TickInput, TickReport, tick};
