//! Collision detection and wall confinement
//!
//! Every entity is a square of the same side length anchored at its top-left
//! corner, so overlap is a plain axis-aligned box test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::DegenerateVector;

/// Axis-aligned box overlap for two squares of side `box_size`
#[inline]
pub fn overlaps(a: Vec2, b: Vec2, box_size: f32) -> bool {
    (a.x - b.x).abs() < box_size && (a.y - b.y).abs() < box_size
}

/// Euclidean distance between two positions
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector pointing from `from` to `to`
pub fn unit_toward(from: Vec2, to: Vec2) -> Result<Vec2, DegenerateVector> {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 {
        Ok(delta / dist)
    } else {
        Err(DegenerateVector)
    }
}

/// Canvas extent in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Outcome of confining a proposed move to the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallStep {
    /// The box stays fully inside at the proposed position
    Inside(Vec2),
    /// The box would leave the canvas; offending axes pinned one pixel inside
    HitWall(Vec2),
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a `box_size` square fits with room for the one-pixel wall pins
    pub fn can_hold(&self, box_size: f32) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width >= box_size + 2.0
            && self.height >= box_size + 2.0
    }

    /// Center of the canvas rounded down to whole pixels
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.width / 2.0).floor(), (self.height / 2.0).floor())
    }

    /// Radius every spawn keeps from the excluded point
    pub fn spawn_clearance(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    #[inline]
    pub fn fits_x(&self, x: f32, box_size: f32) -> bool {
        x >= 0.0 && x + box_size <= self.width
    }

    #[inline]
    pub fn fits_y(&self, y: f32, box_size: f32) -> bool {
        y >= 0.0 && y + box_size <= self.height
    }

    /// Whether a box at `pos` lies fully inside the canvas
    pub fn fits(&self, pos: Vec2, box_size: f32) -> bool {
        self.fits_x(pos.x, box_size) && self.fits_y(pos.y, box_size)
    }

    /// Check a move from `current` to `next`.
    ///
    /// On a wall hit the axes that left the canvas are pinned just inside the
    /// wall and the other axes keep their `current` value (the move is
    /// rejected, not slid along the wall).
    pub fn confine(&self, current: Vec2, next: Vec2, box_size: f32) -> WallStep {
        if self.fits(next, box_size) {
            return WallStep::Inside(next);
        }

        let mut pinned = current;
        if next.x < 0.0 {
            pinned.x = 1.0;
        }
        if next.x + box_size > self.width {
            pinned.x = self.width - box_size - 1.0;
        }
        if next.y < 0.0 {
            pinned.y = 1.0;
        }
        if next.y + box_size > self.height {
            pinned.y = self.height - box_size - 1.0;
        }
        WallStep::HitWall(pinned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_uses_box_side_not_center_distance() {
        // 49 px apart on both axes: corners still overlap
        assert!(overlaps(Vec2::new(0.0, 0.0), Vec2::new(49.0, 49.0), 50.0));
        // Exactly one box apart: touching edges do not overlap
        assert!(!overlaps(Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), 50.0));
        // Close on x, far on y
        assert!(!overlaps(Vec2::new(0.0, 0.0), Vec2::new(10.0, 80.0), 50.0));
    }

    #[test]
    fn test_distance() {
        let d = distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_unit_toward_degenerate() {
        let p = Vec2::new(12.0, 7.0);
        assert_eq!(unit_toward(p, p), Err(DegenerateVector));

        let dir = unit_toward(Vec2::ZERO, Vec2::new(0.0, -8.0)).unwrap();
        assert!((dir - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_confine_pins_offending_axis_only() {
        let bounds = Bounds::new(400.0, 400.0);
        let current = Vec2::new(345.0, 100.0);

        match bounds.confine(current, Vec2::new(352.0, 104.0), 50.0) {
            WallStep::HitWall(pos) => {
                assert_eq!(pos.x, 349.0);
                // y was legal but the move is rejected, so it keeps its old value
                assert_eq!(pos.y, 100.0);
            }
            other => panic!("expected wall hit, got {other:?}"),
        }

        match bounds.confine(Vec2::new(2.0, 3.0), Vec2::new(-1.0, -2.0), 50.0) {
            WallStep::HitWall(pos) => assert_eq!(pos, Vec2::new(1.0, 1.0)),
            other => panic!("expected wall hit, got {other:?}"),
        }

        let inside = Vec2::new(100.0, 100.0);
        assert_eq!(
            bounds.confine(current, inside, 50.0),
            WallStep::Inside(inside)
        );
    }

    #[test]
    fn test_can_hold() {
        assert!(Bounds::new(400.0, 300.0).can_hold(50.0));
        assert!(!Bounds::new(50.0, 300.0).can_hold(50.0));
        // Wall pins sit one pixel in from each side
        assert!(!Bounds::new(51.5, 300.0).can_hold(50.0));
        assert!(Bounds::new(52.0, 300.0).can_hold(50.0));
        assert!(!Bounds::new(f32::NAN, 300.0).can_hold(50.0));
    }

    #[test]
    fn test_pins_stay_inside_smallest_canvas() {
        let bounds = Bounds::new(52.0, 52.0);
        assert!(bounds.can_hold(50.0));
        for (current, next) in [
            (Vec2::new(1.0, 1.0), Vec2::new(3.0, 1.0)),
            (Vec2::new(1.0, 1.0), Vec2::new(-1.0, -1.0)),
            (Vec2::new(0.0, 2.0), Vec2::new(0.5, 4.5)),
        ] {
            match bounds.confine(current, next, 50.0) {
                WallStep::HitWall(pos) => assert!(bounds.fits(pos, 50.0), "{pos:?}"),
                WallStep::Inside(pos) => panic!("expected a wall hit, got {pos:?}"),
            }
        }
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -1000.0f32..1000.0,
            ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0,
            by in -1000.0f32..1000.0,
            size in 1.0f32..200.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(overlaps(a, b, size), overlaps(b, a, size));
        }

        #[test]
        fn unit_toward_has_unit_length(
            ax in -500.0f32..500.0,
            ay in -500.0f32..500.0,
            bx in -500.0f32..500.0,
            by in -500.0f32..500.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            if let Ok(dir) = unit_toward(a, b) {
                prop_assert!((dir.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
