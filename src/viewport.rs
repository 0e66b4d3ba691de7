//! Canvas sizing from the window size

use crate::consts::{HUD_HEIGHT, MAX_CANVAS_HEIGHT, MAX_CANVAS_WIDTH};
use crate::sim::Bounds;

/// Canvas that fits the window below the HUD strip, capped to a phone-sized
/// playfield. Fractional pixels are dropped; tiny windows give zero-sized
/// bounds rather than negative ones.
pub fn fit_canvas(window_width: f32, window_height: f32) -> Bounds {
    let width = window_width.min(MAX_CANVAS_WIDTH).floor().max(0.0);
    let height = (window_height - HUD_HEIGHT)
        .min(MAX_CANVAS_HEIGHT)
        .floor()
        .max(0.0);
    Bounds::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_large_windows() {
        assert_eq!(fit_canvas(1920.0, 1080.0), Bounds::new(430.0, 932.0));
    }

    #[test]
    fn test_small_window_reserves_hud() {
        assert_eq!(fit_canvas(375.5, 667.9), Bounds::new(375.0, 617.0));
    }

    #[test]
    fn test_degenerate_window() {
        let bounds = fit_canvas(30.0, 20.0);
        assert_eq!(bounds, Bounds::new(30.0, 0.0));
        assert!(!bounds.can_hold(50.0));
    }
}
