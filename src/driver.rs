//! Frame driver
//!
//! Owns the session and runs one simulation tick per display frame. Other
//! parts of the program (key handlers, resize listeners, a UI thread) talk
//! to it only through a [`DriverHandle`].

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::config::GameConfig;
use crate::consts::FRAME_MS;
use crate::error::SimError;
use crate::input::Direction;
use crate::renderer::{RenderSink, compose_frame};
use crate::sim::{Bounds, GameState, TickInput, TickReport, tick};

/// Time source for the loop
pub trait FrameClock {
    /// Milliseconds on a monotonic timeline
    fn now_ms(&self) -> f64;

    /// Block until the next frame is due (no-op when something else paces us)
    fn wait_next_frame(&mut self) {}
}

/// Virtual time: every frame is exactly one nominal frame long, no sleeping
#[derive(Debug, Clone)]
pub struct SteppedClock {
    now_ms: f64,
    frame_ms: f64,
}

impl SteppedClock {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            frame_ms: FRAME_MS,
        }
    }
}

impl Default for SteppedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SteppedClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn wait_next_frame(&mut self) {
        self.now_ms += self.frame_ms;
    }
}

/// Wall clock that sleeps to the next frame deadline
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct RealtimeClock {
    start: std::time::Instant,
    next_frame: std::time::Instant,
    frame: std::time::Duration,
}

#[cfg(not(target_arch = "wasm32"))]
impl RealtimeClock {
    pub fn new() -> Self {
        let start = std::time::Instant::now();
        Self {
            start,
            next_frame: start,
            frame: std::time::Duration::from_secs_f64(FRAME_MS / 1000.0),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for RealtimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameClock for RealtimeClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn wait_next_frame(&mut self) {
        self.next_frame += self.frame;
        let now = std::time::Instant::now();
        if now < self.next_frame {
            std::thread::sleep(self.next_frame - now);
        } else {
            // Fell behind: don't try to catch up with a burst of frames
            self.next_frame = now;
        }
    }
}

/// `performance.now()`; `requestAnimationFrame` does the pacing
#[cfg(target_arch = "wasm32")]
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl FrameClock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.performance
            .as_ref()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

#[derive(Debug, Default)]
struct Shared {
    cancelled: AtomicBool,
    /// `Direction::code`, 0 when nothing new arrived
    direction: AtomicU8,
    restart: AtomicBool,
    pending_bounds: Mutex<Option<Bounds>>,
}

/// Cloneable remote control for a running [`FrameDriver`]
#[derive(Debug, Clone, Default)]
pub struct DriverHandle {
    shared: Arc<Shared>,
}

impl DriverHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the loop before its next tick
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Latest direction wins; earlier unconsumed ones are dropped
    pub fn set_direction(&self, direction: Direction) {
        self.shared.direction.store(direction.code(), Ordering::SeqCst);
    }

    fn take_direction(&self) -> Option<Direction> {
        Direction::from_code(self.shared.direction.swap(0, Ordering::SeqCst))
    }

    /// New canvas size: the current session is torn down and a fresh one
    /// starts on the next frame
    pub fn request_bounds(&self, bounds: Bounds) {
        let mut pending = self
            .shared
            .pending_bounds
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *pending = Some(bounds);
    }

    fn take_bounds(&self) -> Option<Bounds> {
        self.shared
            .pending_bounds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Fresh session on the same canvas
    pub fn request_restart(&self) {
        self.shared.restart.store(true, Ordering::SeqCst);
    }

    fn take_restart(&self) -> bool {
        self.shared.restart.swap(false, Ordering::SeqCst)
    }
}

/// What one call to [`FrameDriver::step_frame`] did
#[derive(Debug)]
pub enum FrameOutcome {
    /// The handle was cancelled; nothing ran
    Cancelled,
    /// No bounds yet; nothing to simulate or draw
    AwaitingBounds,
    /// Ticked and presented
    Ticked(TickReport),
    /// The tick failed part way; the frame was still presented
    TickFailed(SimError),
}

/// Totals for a `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub frames: u64,
    /// Frames where the simulation actually advanced
    pub ticks: u64,
    pub sessions: u64,
    pub tick_failures: u64,
}

pub struct FrameDriver<C: FrameClock, S: RenderSink> {
    config: GameConfig,
    base_seed: u64,
    clock: C,
    sink: S,
    handle: DriverHandle,
    bounds: Option<Bounds>,
    session: Option<GameState>,
    sessions_started: u64,
}

impl<C: FrameClock, S: RenderSink> FrameDriver<C, S> {
    pub fn new(handle: DriverHandle, config: GameConfig, base_seed: u64, clock: C, sink: S) -> Self {
        Self {
            config,
            base_seed,
            clock,
            sink,
            handle,
            bounds: None,
            session: None,
            sessions_started: 0,
        }
    }

    pub fn handle(&self) -> DriverHandle {
        self.handle.clone()
    }

    /// Current session, if bounds are known
    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn start_session(&mut self, bounds: Bounds) -> Result<(), SimError> {
        // Old session is gone even if the new one fails to build
        self.session = None;

        let seed = self.base_seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;
        let state = GameState::new(bounds, self.config.clone(), seed, self.clock.now_ms())?;
        log::info!("Session {} ready", self.sessions_started);
        self.session = Some(state);
        Ok(())
    }

    /// Run one frame: apply control requests, tick, present.
    ///
    /// Errors only when a new session cannot be set up.
    pub fn step_frame(&mut self) -> Result<FrameOutcome, SimError> {
        if self.handle.is_cancelled() {
            return Ok(FrameOutcome::Cancelled);
        }

        let restart = self.handle.take_restart();
        if let Some(bounds) = self.handle.take_bounds() {
            log::info!("Canvas resized to {}x{}", bounds.width, bounds.height);
            self.bounds = Some(bounds);
            self.start_session(bounds)?;
        } else if restart {
            if let Some(bounds) = self.bounds {
                log::info!("Restarting session");
                self.start_session(bounds)?;
            }
        }

        let Some(state) = self.session.as_mut() else {
            return Ok(FrameOutcome::AwaitingBounds);
        };

        let input = TickInput {
            direction: self.handle.take_direction(),
        };
        let outcome = match tick(state, &input, self.clock.now_ms()) {
            Ok(report) => FrameOutcome::Ticked(report),
            Err(e) => {
                log::error!("Tick {} failed: {}", state.time_ticks, e);
                FrameOutcome::TickFailed(e)
            }
        };

        let frame = compose_frame(state);
        self.sink.present(&frame);
        Ok(outcome)
    }

    /// Loop until cancelled or `frame_limit` frames have run
    pub fn run(&mut self, frame_limit: Option<u64>) -> Result<RunStats, SimError> {
        let mut stats = RunStats::default();
        let first_session = self.sessions_started;

        loop {
            if frame_limit.is_some_and(|limit| stats.frames >= limit) {
                break;
            }

            match self.step_frame()? {
                FrameOutcome::Cancelled => {
                    log::info!("Driver cancelled after {} frames", stats.frames);
                    break;
                }
                FrameOutcome::AwaitingBounds => {}
                FrameOutcome::Ticked(report) => {
                    if !report.frozen {
                        stats.ticks += 1;
                    }
                }
                FrameOutcome::TickFailed(_) => {
                    stats.ticks += 1;
                    stats.tick_failures += 1;
                }
            }

            stats.frames += 1;
            self.clock.wait_next_frame();
        }

        stats.sessions = self.sessions_started - first_session;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Frame;
    use crate::sim::GameEvent;
    use glam::Vec2;

    fn driver<S: RenderSink>(sink: S) -> FrameDriver<SteppedClock, S> {
        FrameDriver::new(
            DriverHandle::new(),
            GameConfig::default(),
            100,
            SteppedClock::new(),
            sink,
        )
    }

    #[test]
    fn test_waits_for_bounds() {
        let mut presented = 0;
        let mut d = driver(|_: &Frame| presented += 1);

        for _ in 0..3 {
            assert!(matches!(d.step_frame(), Ok(FrameOutcome::AwaitingBounds)));
        }
        assert!(d.session().is_none());

        d.handle().request_bounds(Bounds::new(400.0, 600.0));
        assert!(matches!(d.step_frame(), Ok(FrameOutcome::Ticked(_))));
        assert_eq!(d.session().unwrap().bounds, Bounds::new(400.0, 600.0));
        drop(d);
        assert_eq!(presented, 1);
    }

    #[test]
    fn test_cancel_stops_before_next_tick() {
        let handle = DriverHandle::new();
        let remote = handle.clone();
        let mut seen = 0;
        let sink = move |_: &Frame| {
            seen += 1;
            if seen == 5 {
                remote.cancel();
            }
        };
        let mut d = FrameDriver::new(handle, GameConfig::default(), 1, SteppedClock::new(), sink);
        d.handle().request_bounds(Bounds::new(430.0, 800.0));

        let stats = d.run(None).unwrap();
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.ticks, 5);
        assert_eq!(d.session().unwrap().time_ticks, 5);
        assert!(matches!(d.step_frame(), Ok(FrameOutcome::Cancelled)));
    }

    #[test]
    fn test_new_bounds_reset_the_session() {
        let mut d = driver(|_: &Frame| {});
        d.handle().request_bounds(Bounds::new(400.0, 600.0));
        d.run(Some(10)).unwrap();

        {
            let state = d.session.as_mut().unwrap();
            state.score = 7;
            state.health = 1;
            let id = state.next_entity_id();
            let extra = crate::sim::Enemy::spawn(id, crate::sim::EnemyTypeSpec::RUSHER, Vec2::ZERO, 0.0);
            state.enemies.push(extra);
        }

        d.handle().request_bounds(Bounds::new(300.0, 500.0));
        d.step_frame().unwrap();

        let state = d.session().unwrap();
        assert_eq!(state.bounds, Bounds::new(300.0, 500.0));
        assert_eq!(state.score, 0);
        assert_eq!(state.health, 4);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(d.sessions_started(), 2);
        // Each session gets its own seed
        assert_eq!(state.seed, 101);
    }

    #[test]
    fn test_restart_keeps_bounds() {
        let mut d = driver(|_: &Frame| {});
        d.handle().request_restart();
        assert!(matches!(d.step_frame(), Ok(FrameOutcome::AwaitingBounds)));

        d.handle().request_bounds(Bounds::new(400.0, 600.0));
        d.run(Some(3)).unwrap();
        d.handle().request_restart();
        d.step_frame().unwrap();

        assert_eq!(d.sessions_started(), 2);
        assert_eq!(d.session().unwrap().bounds, Bounds::new(400.0, 600.0));
        assert_eq!(d.session().unwrap().time_ticks, 1);
    }

    #[test]
    fn test_last_direction_wins() {
        let mut d = driver(|_: &Frame| {});
        d.handle().request_bounds(Bounds::new(400.0, 600.0));
        d.step_frame().unwrap();
        let start = d.session().unwrap().player.pos;

        d.handle().set_direction(Direction::Up);
        d.handle().set_direction(Direction::Down);
        d.handle().set_direction(Direction::Left);
        d.step_frame().unwrap();

        let player = &d.session().unwrap().player;
        assert_eq!(player.direction, Direction::Left);
        assert_eq!(player.pos, start - Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_setup_failure_propagates() {
        let mut d = driver(|_: &Frame| {});
        d.handle().request_bounds(Bounds::new(20.0, 20.0));
        assert!(matches!(
            d.step_frame(),
            Err(SimError::InvalidBounds { .. })
        ));
        assert!(d.session().is_none());
        assert!(matches!(d.step_frame(), Ok(FrameOutcome::AwaitingBounds)));
    }

    #[test]
    fn test_stepped_clock_feeds_tick_time() {
        let mut frames = Vec::new();
        let mut d = driver(|f: &Frame| frames.push(f.hud));
        d.handle().request_bounds(Bounds::new(400.0, 600.0));
        let stats = d.run(Some(120)).unwrap();
        assert_eq!(stats.frames, 120);
        assert_eq!(stats.sessions, 1);
        assert!((d.clock.now_ms() - 120.0 * FRAME_MS).abs() < 1e-6);
        drop(d);
        assert_eq!(frames.len(), 120);
    }

    #[test]
    fn test_game_over_frames_keep_presenting() {
        let mut d = driver(|_: &Frame| {});
        d.handle().request_bounds(Bounds::new(400.0, 600.0));
        d.step_frame().unwrap();
        d.session.as_mut().unwrap().health = 0;

        let stats = d.run(Some(10)).unwrap();
        assert_eq!(stats.frames, 10);
        assert_eq!(stats.ticks, 0);
        match d.step_frame() {
            Ok(FrameOutcome::Ticked(report)) => {
                assert!(report.frozen);
                assert!(!report.events.contains(&GameEvent::GameOver { score: 0 }));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
