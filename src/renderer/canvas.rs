//! Canvas2D render sink (browser only)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Frame, RenderSink};
use crate::sim::Color;

const BACKGROUND: &str = "#111";
const HUD_FONT: &str = "bold 16px sans-serif";
const GAME_OVER_FONT: &str = "bold 32px sans-serif";
const PIP_SIZE: f64 = 16.0;
const PIP_GAP: f64 = 6.0;

/// Draws frames with `fill_rect` on a 2D context
pub struct CanvasSink {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSink {
    /// `None` if the canvas has no 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    fn fill(&self, color: &Color, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x, y, w, h);
    }

    fn draw_hud(&self, frame: &Frame) {
        let hud = &frame.hud;
        let width = frame.bounds.width as f64;

        self.ctx.set_font(HUD_FONT);
        self.ctx.set_fill_style_str("white");
        let _ = self
            .ctx
            .fill_text(&format!("Points: {}", hud.score), 10.0, 24.0);

        // Health pips, right-aligned; lost health is faded
        for i in 0..hud.max_health {
            let alpha = if i < hud.health { 1.0 } else { 0.3 };
            let x = width - 10.0 - (hud.max_health - i) as f64 * (PIP_SIZE + PIP_GAP) + PIP_GAP;
            self.fill(&Color::RED.with_alpha(alpha), x, 10.0, PIP_SIZE, PIP_SIZE);
        }

        if hud.game_over {
            self.ctx.set_font(GAME_OVER_FONT);
            self.ctx.set_fill_style_str("red");
            self.ctx.set_text_align("center");
            let _ = self.ctx.fill_text(
                "GAME OVER",
                width / 2.0,
                frame.bounds.height as f64 / 2.0,
            );
            self.ctx.set_text_align("start");
        }
    }
}

impl RenderSink for CanvasSink {
    fn present(&mut self, frame: &Frame) {
        let w = frame.bounds.width as f64;
        let h = frame.bounds.height as f64;

        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        for rect in &frame.rects {
            let size = rect.size as f64;
            self.fill(&rect.color, rect.pos.x as f64, rect.pos.y as f64, size, size);
        }

        self.draw_hud(frame);
    }
}
