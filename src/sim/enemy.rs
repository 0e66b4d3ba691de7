//! Enemy templates and instances

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::{Behavior, EnemyBehavior, RushPhase};

/// RGBA display color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity 0-1
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Overlay for collision-stunned enemies
    pub const STUNNED: Self = Self {
        r: 0,
        g: 255,
        b: 0,
        a: 0.5,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string for Canvas2D fill styles
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Which state machine an enemy template runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Walk straight at the player every tick
    FollowPlayer,
    /// Aim, dash in a straight line to a wall, recover
    RushStraight {
        /// Time spent aiming before the dash
        targeting_ms: f64,
        /// Recovery after slamming into a wall
        rush_delay_ms: f64,
    },
}

impl BehaviorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FollowPlayer => "follow_player",
            Self::RushStraight { .. } => "rush_straight",
        }
    }
}

/// Immutable enemy template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTypeSpec {
    pub color: Color,
    /// Pixels moved per tick
    pub speed: f32,
    pub behavior: BehaviorKind,
}

impl EnemyTypeSpec {
    /// Slow green chaser
    pub const BASIC: Self = Self {
        color: Color::GREEN,
        speed: 0.5,
        behavior: BehaviorKind::FollowPlayer,
    };

    /// Fast red dasher
    pub const RUSHER: Self = Self {
        color: Color::RED,
        speed: 6.0,
        behavior: BehaviorKind::RushStraight {
            targeting_ms: 2000.0,
            rush_delay_ms: 1500.0,
        },
    };
}

/// The movable, drawable part of an enemy handed to its behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub pos: Vec2,
    /// Per-instance display color (phase feedback lives here, never in the template)
    pub color: Color,
}

/// An active hostile
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub spec: EnemyTypeSpec,
    /// Collision-stun: set after damaging the player
    pub is_stunned: bool,
    pub last_collision_ms: f64,
    /// Cleared on a hit, restored when the collision-stun ends
    pub can_attack: bool,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    pub fn spawn(id: u32, spec: EnemyTypeSpec, pos: Vec2, now_ms: f64) -> Self {
        let behavior = EnemyBehavior::for_kind(spec.behavior, now_ms);
        let body = Body {
            pos,
            color: behavior.display_color(&spec),
        };
        Self {
            id,
            body,
            spec,
            is_stunned: false,
            last_collision_ms: 0.0,
            can_attack: true,
            behavior,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Whether this enemy blocks (and is blocked by) other crowd members
    pub fn joins_crowd(&self) -> bool {
        self.behavior.joins_crowd()
    }

    /// Rush phase, if this enemy runs the rush state machine
    pub fn rush_phase(&self) -> Option<RushPhase> {
        self.behavior.rush_phase()
    }

    /// Put the enemy into collision-stun after it damaged the player
    pub fn stun(&mut self, now_ms: f64) {
        self.is_stunned = true;
        self.can_attack = false;
        self.last_collision_ms = now_ms;
    }

    /// Clear the collision-stun once its window has elapsed.
    ///
    /// Returns true only on the call that actually clears it, so calling it
    /// twice with the same `now_ms` is harmless.
    pub fn recover_if_elapsed(&mut self, now_ms: f64, stun_ms: f64) -> bool {
        if !self.is_stunned || now_ms - self.last_collision_ms < stun_ms {
            return false;
        }
        self.is_stunned = false;
        self.can_attack = true;
        true
    }

    /// Color the renderer should use this frame
    pub fn draw_color(&self) -> Color {
        if self.is_stunned {
            Color::STUNNED
        } else {
            self.body.color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_rusher_starts_targeting() {
        let enemy = Enemy::spawn(1, EnemyTypeSpec::RUSHER, Vec2::new(10.0, 10.0), 500.0);
        assert_eq!(enemy.rush_phase(), Some(RushPhase::Targeting));
        assert!(!enemy.joins_crowd());
        assert!(enemy.can_attack);

        let basic = Enemy::spawn(2, EnemyTypeSpec::BASIC, Vec2::ZERO, 0.0);
        assert_eq!(basic.rush_phase(), None);
        assert!(basic.joins_crowd());
        assert_eq!(basic.body.color, Color::GREEN);
    }

    #[test]
    fn test_recovery_is_idempotent() {
        let mut enemy = Enemy::spawn(1, EnemyTypeSpec::BASIC, Vec2::ZERO, 0.0);
        enemy.stun(1000.0);
        assert!(enemy.is_stunned);
        assert!(!enemy.can_attack);
        assert_eq!(enemy.draw_color(), Color::STUNNED);

        // Window not elapsed yet
        assert!(!enemy.recover_if_elapsed(2999.0, 2000.0));
        assert!(enemy.is_stunned);

        assert!(enemy.recover_if_elapsed(3000.0, 2000.0));
        assert!(!enemy.recover_if_elapsed(3000.0, 2000.0));
        assert!(!enemy.is_stunned);
        assert!(enemy.can_attack);
    }

    #[test]
    fn test_instance_color_does_not_touch_template() {
        let mut a = Enemy::spawn(1, EnemyTypeSpec::RUSHER, Vec2::ZERO, 0.0);
        let b = Enemy::spawn(2, EnemyTypeSpec::RUSHER, Vec2::ZERO, 0.0);
        a.body.color = Color::WHITE;
        assert_eq!(a.spec.color, Color::RED);
        assert_eq!(b.spec.color, Color::RED);
        assert_ne!(b.body.color, Color::WHITE);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(Color::STUNNED.to_css(), "rgba(0, 255, 0, 0.5)");
        assert_eq!(Color::YELLOW.to_css(), "rgba(255, 255, 0, 1)");
    }
}
