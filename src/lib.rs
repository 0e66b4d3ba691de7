//! Box Survivor - a 2D survival arcade loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, enemy behaviors, collisions, spawning)
//! - `driver`: Fixed-rate frame loop with cancellation
//! - `renderer`: Draw-list composition and render sinks
//! - `input`: Key mapping and the demo autopilot
//! - `config`: Data-driven timing and enemy templates

pub mod config;
pub mod driver;
pub mod error;
pub mod input;
pub mod renderer;
pub mod sim;
pub mod viewport;

pub use config::GameConfig;
pub use driver::{DriverHandle, FrameDriver};
pub use error::{ConfigError, PlacementError, SimError};

/// Game configuration constants
pub mod consts {
    /// Frame rate of the driver loop (display refresh, not configurable)
    pub const FRAME_RATE: u32 = 60;
    /// Duration of one frame in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / FRAME_RATE as f64;

    /// Side length of every entity square
    pub const BOX_SIZE: f32 = 50.0;
    /// Player movement per tick along the current direction
    pub const PLAYER_SPEED: f32 = 2.0;
    /// Health at session start
    pub const MAX_HEALTH: u8 = 4;

    /// How long an enemy stays stunned after hitting the player
    pub const COLLISION_STUN_MS: f64 = 2000.0;
    /// Player invulnerability after taking damage
    pub const PLAYER_IMMUNITY_MS: f64 = 500.0;

    /// Every multiple of this score spawns one more enemy
    pub const SPAWN_MILESTONE: u64 = 10;
    /// Retry ceiling for rejection-sampled spawn placement
    pub const PLACEMENT_MAX_ATTEMPTS: u32 = 10_000;

    /// Canvas size caps (phone-shaped playfield)
    pub const MAX_CANVAS_WIDTH: f32 = 430.0;
    pub const MAX_CANVAS_HEIGHT: f32 = 932.0;
    /// Vertical space reserved for the HUD strip above the canvas
    pub const HUD_HEIGHT: f32 = 50.0;
}
