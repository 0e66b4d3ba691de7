//! Box Survivor entry point
//!
//! Browser: sizes the canvas, wires keyboard and resize events into the
//! driver handle and steps the driver once per animation frame.
//! Native: headless runner with the autopilot at the controls.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, Window};

    use box_survivor::GameConfig;
    use box_survivor::driver::{DriverHandle, FrameDriver, FrameOutcome, PerformanceClock};
    use box_survivor::input::Direction;
    use box_survivor::renderer::CanvasSink;
    use box_survivor::sim::Bounds;
    use box_survivor::viewport::fit_canvas;

    fn js_err(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    fn window_bounds(window: &Window) -> Bounds {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or_default();
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or_default();
        fit_canvas(width as f32, height as f32)
    }

    fn resize_canvas(canvas: &HtmlCanvasElement, bounds: Bounds) {
        canvas.set_width(bounds.width as u32);
        canvas.set_height(bounds.height as u32);
    }

    /// Use the page's `#canvas`, or append one to the body
    fn find_or_create_canvas(document: &Document) -> Option<HtmlCanvasElement> {
        if let Some(el) = document.get_element_by_id("canvas") {
            return el.dyn_into().ok();
        }
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        canvas.set_id("canvas");
        document.body()?.append_child(&canvas).ok()?;
        Some(canvas)
    }

    fn setup_input_handlers(
        window: &Window,
        canvas: &HtmlCanvasElement,
        handle: &DriverHandle,
    ) -> Result<(), JsValue> {
        // Keyboard: arrows/WASD steer, Enter restarts
        {
            let handle = handle.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if let Some(direction) = Direction::from_key(&key) {
                    event.prevent_default();
                    handle.set_direction(direction);
                } else if key == "Enter" {
                    handle.request_restart();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize: new canvas size, new session
        {
            let handle = handle.clone();
            let canvas = canvas.clone();
            let win = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let bounds = window_bounds(&win);
                resize_canvas(&canvas, bounds);
                handle.request_bounds(bounds);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Resolves on the next `requestAnimationFrame` callback
    async fn next_animation_frame(window: &Window) -> Result<(), JsValue> {
        let mut scheduled = Ok(0);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            scheduled = window.request_animation_frame(&resolve);
        });
        scheduled?;
        JsFuture::from(promise).await?;
        Ok(())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&js_err("logger already installed"));
        }

        log::info!("Box Survivor starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;
        let canvas = find_or_create_canvas(&document).ok_or_else(|| js_err("no canvas"))?;
        let sink = CanvasSink::new(&canvas).ok_or_else(|| js_err("no 2d context"))?;

        let config = GameConfig::load();
        let seed = js_sys::Date::now() as u64;
        log::info!("Base seed: {}", seed);

        let handle = DriverHandle::new();
        let mut driver = FrameDriver::new(handle.clone(), config, seed, PerformanceClock::new(), sink);
        setup_input_handlers(&window, &canvas, &handle)?;

        let bounds = window_bounds(&window);
        resize_canvas(&canvas, bounds);
        handle.request_bounds(bounds);

        loop {
            next_animation_frame(&window).await?;
            match driver.step_frame() {
                Ok(FrameOutcome::Cancelled) => break,
                Ok(_) => {}
                // Stays idle until the next resize brings usable bounds
                Err(e) => log::error!("Could not start a session: {}", e),
            }
        }

        log::info!("Box Survivor stopped");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use serde::Serialize;

    use box_survivor::GameConfig;
    use box_survivor::driver::{DriverHandle, FrameClock, FrameDriver, RealtimeClock, RunStats, SteppedClock};
    use box_survivor::input::autopilot;
    use box_survivor::renderer::Frame;
    use box_survivor::sim::Bounds;

    #[derive(Parser, Debug)]
    #[command(name = "box-survivor")]
    #[command(about = "Run Box Survivor headless with the autopilot at the controls")]
    struct Cli {
        /// Base seed for the session RNG
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Frames to run (60 per simulated second)
        #[arg(long, default_value_t = 3_600)]
        frames: u64,

        /// Canvas width in pixels
        #[arg(long, default_value_t = 430.0)]
        width: f32,

        /// Canvas height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f32,

        /// JSON config file (defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pace frames at 60 Hz wall-clock instead of virtual time
        #[arg(long)]
        realtime: bool,
    }

    #[derive(Debug, Serialize)]
    struct Summary {
        seed: u64,
        bounds: Bounds,
        stats: RunStats,
        score: u64,
        health: u8,
        enemies: usize,
        game_over: bool,
    }

    fn drive<C: FrameClock>(cli: &Cli, config: GameConfig, clock: C) -> Result<Summary> {
        let handle = DriverHandle::new();
        let pilot = handle.clone();
        let sink = move |frame: &Frame| {
            if let Some(direction) = autopilot(frame) {
                pilot.set_direction(direction);
            }
        };

        let bounds = Bounds::new(cli.width, cli.height);
        let mut driver = FrameDriver::new(handle.clone(), config, cli.seed, clock, sink);
        handle.request_bounds(bounds);

        let stats = driver
            .run(Some(cli.frames))
            .context("failed to start a session")?;
        let state = driver.session().context("no session was started")?;

        Ok(Summary {
            seed: state.seed,
            bounds,
            stats,
            score: state.score,
            health: state.health,
            enemies: state.enemies.len(),
            game_over: state.is_game_over(),
        })
    }

    pub fn main() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let config = match &cli.config {
            Some(path) => GameConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GameConfig::load(),
        };

        log::info!(
            "Box Survivor (native) running {} frames on {}x{}",
            cli.frames,
            cli.width,
            cli.height
        );

        let summary = if cli.realtime {
            drive(&cli, config, RealtimeClock::new())?
        } else {
            drive(&cli, config, SteppedClock::new())?
        };

        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::main()
}
