//! Frame composition and render sinks
//!
//! The simulation never draws. Each frame the driver turns the current
//! [`GameState`] into a [`Frame`] (a flat draw list plus HUD values) and
//! hands it to a [`RenderSink`].

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSink;

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Bounds, Color, GameState};

/// What a rect depicts; the draw list is ordered by layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Pickup,
    Player,
    Enemy,
}

/// One filled square
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawRect {
    pub layer: Layer,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub color: Color,
}

/// Values shown in the HUD strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub health: u8,
    pub max_health: u8,
    pub game_over: bool,
}

/// Everything a sink needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub bounds: Bounds,
    /// Pickup, then player, then enemies in spawn order
    pub rects: Vec<DrawRect>,
    pub hud: Hud,
}

impl Frame {
    /// First rect on the given layer
    pub fn first(&self, layer: Layer) -> Option<&DrawRect> {
        self.rects.iter().find(|r| r.layer == layer)
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.rects.iter().filter(|r| r.layer == layer).count()
    }
}

/// Build the draw list for the current state.
///
/// Pure read of the state; a frozen (game over) session still composes a
/// full frame.
pub fn compose_frame(state: &GameState) -> Frame {
    let size = state.config.box_size;
    let mut rects = Vec::with_capacity(2 + state.enemies.len());

    rects.push(DrawRect {
        layer: Layer::Pickup,
        pos: state.pickup.pos,
        size,
        color: Color::YELLOW,
    });
    rects.push(DrawRect {
        layer: Layer::Player,
        pos: state.player.pos,
        size,
        color: Color::WHITE,
    });
    rects.extend(state.enemies.iter().map(|enemy| DrawRect {
        layer: Layer::Enemy,
        pos: enemy.pos(),
        size,
        color: enemy.draw_color(),
    }));

    Frame {
        bounds: state.bounds,
        rects,
        hud: Hud {
            score: state.score,
            health: state.health,
            max_health: state.config.max_health,
            game_over: state.is_game_over(),
        },
    }
}

/// Consumer of composed frames
pub trait RenderSink {
    fn present(&mut self, frame: &Frame);
}

/// Closures work as sinks (headless runs, tests)
impl<F: FnMut(&Frame)> RenderSink for F {
    fn present(&mut self, frame: &Frame) {
        self(frame)
    }
}
