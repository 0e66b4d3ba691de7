//! Game state and core simulation types
//!
//! One owned aggregate per play session: the driver holds it, the tick is its
//! only mutator, the renderer only reads it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::Bounds;
use super::enemy::{Enemy, EnemyTypeSpec};
use super::spawn::{pick_enemy_type, place_away_from};
use crate::config::GameConfig;
use crate::error::{PlacementError, SimError};
use crate::input::Direction;

/// The player's square
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    /// Latest input direction (last write wins)
    pub direction: Direction,
    /// When the player last took damage (drives the immunity window)
    pub last_hit_ms: Option<f64>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            direction: Direction::Right,
            last_hit_ms: None,
        }
    }

    /// Whether the player is still invulnerable from the previous hit
    pub fn is_immune(&self, now_ms: f64, immunity_ms: f64) -> bool {
        self.last_hit_ms
            .is_some_and(|hit| now_ms - hit < immunity_ms)
    }
}

/// The point pickup; relocated, never destroyed
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pickup {
    pub pos: Vec2,
    /// Cleared when a collection could not move the pickup away; it can only
    /// be collected again after the player has stepped off it
    pub armed: bool,
}

/// Things that happened during a tick, for the HUD and logs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// An enemy landed a hit; `health` is the value after the hit
    PlayerHit { enemy_id: u32, health: u8 },
    /// An enemy's collision-stun ran out
    EnemyRecovered { enemy_id: u32 },
    /// The pickup was collected; `score` is the new total
    PointScored { score: u64 },
    /// A milestone brought in a new enemy
    EnemySpawned { enemy_id: u32, kind: &'static str },
    /// Health reached zero
    GameOver { score: u64 },
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub bounds: Bounds,
    pub player: Player,
    /// Active enemies in spawn order; only ever grows
    pub enemies: Vec<Enemy>,
    pub pickup: Pickup,
    pub score: u64,
    pub health: u8,
    /// Simulation tick counter (frozen ticks are not counted)
    pub time_ticks: u64,
    /// Milestone enemies earned but not yet placed
    pub pending_spawns: u32,
    #[serde(skip)]
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Build a fresh session for the given canvas.
    ///
    /// Fails if the canvas cannot hold a box or if the first enemy or the
    /// pickup cannot be placed.
    pub fn new(
        bounds: Bounds,
        config: GameConfig,
        seed: u64,
        now_ms: f64,
    ) -> Result<Self, SimError> {
        if !bounds.can_hold(config.box_size) {
            return Err(SimError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
                box_size: config.box_size,
            });
        }

        let player = Player::new(bounds.center());
        let health = config.max_health;
        let mut state = Self {
            seed,
            config,
            bounds,
            player,
            enemies: Vec::new(),
            pickup: Pickup {
                pos: Vec2::ZERO,
                armed: true,
            },
            score: 0,
            health,
            time_ticks: 0,
            pending_spawns: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        let first = state.config.initial_enemy;
        state.spawn_enemy(first, now_ms)?;
        state.relocate_pickup()?;

        log::info!(
            "Session started: {}x{} canvas, seed {}",
            bounds.width,
            bounds.height,
            seed
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Health is gone: motion and input are frozen
    pub fn is_game_over(&self) -> bool {
        self.health == 0
    }

    /// Sample a position clear of the player
    fn place_clear_of_player(&mut self) -> Result<Vec2, PlacementError> {
        place_away_from(
            &mut self.rng,
            self.bounds,
            self.config.box_size,
            self.player.pos,
            self.config.placement_max_attempts,
        )
    }

    /// Add one enemy of the given template away from the player
    pub fn spawn_enemy(&mut self, spec: EnemyTypeSpec, now_ms: f64) -> Result<u32, PlacementError> {
        let pos = self.place_clear_of_player()?;
        let id = self.next_entity_id();
        self.enemies.push(Enemy::spawn(id, spec, pos, now_ms));
        log::debug!(
            "Spawned {} enemy {} at ({:.0}, {:.0})",
            spec.behavior.name(),
            id,
            pos.x,
            pos.y
        );
        Ok(id)
    }

    /// Add one enemy with a template drawn from the milestone roster
    pub fn spawn_milestone_enemy(&mut self, now_ms: f64) -> Result<Option<u32>, PlacementError> {
        let Some(spec) = pick_enemy_type(&mut self.rng, &self.config.milestone_roster) else {
            return Ok(None);
        };
        self.spawn_enemy(spec, now_ms).map(Some)
    }

    /// Move the pickup to a fresh spot away from the player
    pub fn relocate_pickup(&mut self) -> Result<(), PlacementError> {
        self.pickup.pos = self.place_clear_of_player()?;
        Ok(())
    }
}
