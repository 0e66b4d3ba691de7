//! Player input: key mapping and the demo autopilot

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::renderer::{Frame, Layer};

/// One of the four axis-aligned movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value (arrows and WASD)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            _ => None,
        }
    }

    /// Decode the compact form stored in the driver handle (0 = no input yet)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Up),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            4 => Some(Self::Right),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Per-tick displacement at the given speed (screen y grows downward)
    pub fn velocity(self, speed: f32) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -speed),
            Self::Down => Vec2::new(0.0, speed),
            Self::Left => Vec2::new(-speed, 0.0),
            Self::Right => Vec2::new(speed, 0.0),
        }
    }
}

/// Distance under which the autopilot dodges instead of chasing the pickup
const DANGER_RADIUS: f32 = 120.0;

/// Free space between the player box and the wall in `dir`
fn room_toward(frame: &Frame, player: Vec2, size: f32, dir: Direction) -> f32 {
    match dir {
        Direction::Up => player.y,
        Direction::Down => frame.bounds.height - (player.y + size),
        Direction::Left => player.x,
        Direction::Right => frame.bounds.width - (player.x + size),
    }
}

/// Demo/idle steering: head for the pickup, sidestep enemies that get close.
///
/// Works from the composed frame only, like a human looking at the screen.
pub fn autopilot(frame: &Frame) -> Option<Direction> {
    let player_rect = frame.first(Layer::Player)?;
    let player = player_rect.pos;
    let pickup = frame.first(Layer::Pickup)?.pos;

    let threat = frame
        .rects
        .iter()
        .filter(|r| r.layer == Layer::Enemy)
        .map(|r| r.pos)
        .min_by(|a, b| {
            a.distance(player)
                .partial_cmp(&b.distance(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(enemy) = threat {
        let away = player - enemy;
        if away.length() < DANGER_RADIUS {
            let horizontal = if away.x >= 0.0 { Direction::Right } else { Direction::Left };
            let vertical = if away.y >= 0.0 { Direction::Down } else { Direction::Up };
            let (first, second) = if away.x.abs() >= away.y.abs() {
                (horizontal, vertical)
            } else {
                (vertical, horizontal)
            };
            // Pinned against a wall: slide sideways instead
            let room = room_toward(frame, player, player_rect.size, first);
            return Some(if room > player_rect.size / 2.0 { first } else { second });
        }
    }

    let gap = pickup - player;
    Some(if gap.x.abs() >= gap.y.abs() {
        if gap.x >= 0.0 { Direction::Right } else { Direction::Left }
    } else if gap.y >= 0.0 {
        Direction::Down
    } else {
        Direction::Up
    })
}
