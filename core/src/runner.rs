//! Frame scheduler that drives a [`Pong`] match for a host.
//!
//! Each quantum checks the stop signal, samples input once, advances the simulation by the elapsed time and
//! hands the renderer a snapshot. Hosts with their own frame callback call [`FrameLoop::frame`] from it; native
//! hosts can let [`FrameLoop::run_realtime`] own the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use web_time::{Duration, Instant};

use crate::pong::*;

/// Where the player's paddle should go, sampled once per frame.
pub trait InputSource {
    /// Returns the latest pointer position for the top of the player's paddle, if it moved. `view` is what
    /// the renderer was last given.
    fn sample(&mut self, view: &PongSnapshot) -> Option<f32>;
}

/// Draws whatever the simulation looks like after a frame.
pub trait Renderer {
    fn render(&mut self, snapshot: &PongSnapshot, events: &[PongEvent]);
}

impl<F: FnMut(&PongSnapshot) -> Option<f32>> InputSource for F {
    fn sample(&mut self, view: &PongSnapshot) -> Option<f32> {
        self(view)
    }
}

/// Input source for hosts that feed the paddle some other way.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn sample(&mut self, _view: &PongSnapshot) -> Option<f32> {
        None
    }
}

/// Shared cancellation flag. Once stopped, no further frames run.
#[derive(Debug, Default, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopControl {
    /// Keep scheduling frames.
    Continue,
    /// The stop handle was triggered.
    Stopped,
    /// The match reached game over.
    Finished,
}

pub struct FrameLoop<I, R> {
    pong: Pong,
    input: I,
    renderer: R,
    stop: StopHandle,
    last_frame: Option<Instant>,
    last_snapshot: PongSnapshot,
}

impl<I: InputSource, R: Renderer> FrameLoop<I, R> {
    pub fn new(pong: Pong, input: I, renderer: R) -> Self {
        let last_snapshot = pong.snapshot();
        Self {
            pong,
            input,
            renderer,
            stop: StopHandle::default(),
            last_frame: None,
            last_snapshot,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn pong(&self) -> &Pong {
        &self.pong
    }

    /// For start, pause and reset commands between frames.
    pub fn pong_mut(&mut self) -> &mut Pong {
        &mut self.pong
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_parts(self) -> (Pong, I, R) {
        (self.pong, self.input, self.renderer)
    }

    /// Runs one quantum covering `dt` simulated seconds. Quanta longer than [`MAX_DT`] are fed in pieces so
    /// none of the time is dropped.
    pub fn quantum(&mut self, dt: f32) -> LoopControl {
        self.run_quantum(|pong| {
            let mut events = TickEvents::new();
            let mut remaining = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            while remaining > 0.0 && pong.phase().is_running() {
                let chunk = remaining.min(MAX_DT);
                events.extend(pong.advance(chunk));
                remaining -= chunk;
            }
            events
        })
    }

    /// Runs one quantum timed by the wall clock. The first call counts as a single fixed frame, and a stall
    /// longer than [`MAX_DT`] is cut short.
    pub fn frame(&mut self, now: Instant) -> LoopControl {
        let dt = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => FIXED_DT,
        };
        self.last_frame = Some(now);
        self.run_quantum(|pong| pong.advance(dt))
    }

    fn run_quantum(&mut self, simulate: impl FnOnce(&mut Pong) -> TickEvents) -> LoopControl {
        if self.stop.is_stopped() {
            return LoopControl::Stopped;
        }

        if let Some(y) = self.input.sample(&self.last_snapshot) {
            self.pong.set_player_target(y);
        }
        let events = simulate(&mut self.pong);
        let snapshot = self.pong.snapshot();
        self.renderer.render(&snapshot, &events);
        self.last_snapshot = snapshot;

        if self.pong.winner().is_some() {
            LoopControl::Finished
        } else {
            LoopControl::Continue
        }
    }

    /// Runs up to `frames` quanta of `frame_dt` simulated seconds each, without sleeping.
    pub fn run_for(&mut self, frames: u64, frame_dt: f32) -> LoopControl {
        for _ in 0..frames {
            match self.quantum(frame_dt) {
                LoopControl::Continue => {}
                done => return done,
            }
        }
        LoopControl::Continue
    }

    /// Owns the thread, scheduling `fps` quanta per second until stopped or finished.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_realtime(&mut self, fps: u32) -> LoopControl {
        let budget = Duration::from_secs(1) / fps.max(1);
        loop {
            let started = Instant::now();
            match self.frame(started) {
                LoopControl::Continue => {}
                done => return done,
            }
            if let Some(idle) = budget.checked_sub(started.elapsed()) {
                std::thread::sleep(idle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<PongSnapshot>,
        events: Vec<PongEvent>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, snapshot: &PongSnapshot, events: &[PongEvent]) {
            self.frames.push(*snapshot);
            self.events.extend_from_slice(events);
        }
    }

    fn started(seed: u64) -> Pong {
        let mut pong = Pong::new(seed);
        pong.start();
        pong
    }

    #[test]
    fn renders_once_per_quantum() {
        let mut frame_loop = FrameLoop::new(started(1), NoInput, Recorder::default());

        assert_eq!(frame_loop.run_for(10, FIXED_DT), LoopControl::Continue);

        let frames = &frame_loop.renderer().frames;
        assert_eq!(frames.len(), 10);
        assert_eq!(frames.last().map(|s| s.frame), Some(10));
    }

    #[test]
    fn input_is_sampled_each_quantum() {
        let mut calls = 0;
        let input = |_: &PongSnapshot| {
            calls += 1;
            Some(-50.0)
        };
        let mut frame_loop = FrameLoop::new(started(2), input, Recorder::default());

        frame_loop.run_for(3, FIXED_DT);

        assert_eq!(frame_loop.pong().player_paddle().y, 0.0);
        drop(frame_loop);
        assert_eq!(calls, 3);
    }

    #[test]
    fn stop_handle_halts_ticks() {
        let mut frame_loop = FrameLoop::new(started(3), NoInput, Recorder::default());
        let stop = frame_loop.stop_handle();

        frame_loop.run_for(5, FIXED_DT);
        stop.stop();

        assert_eq!(frame_loop.run_for(5, FIXED_DT), LoopControl::Stopped);
        assert_eq!(frame_loop.pong().frame(), 5);
        assert_eq!(frame_loop.renderer().frames.len(), 5);
    }

    #[test]
    fn paused_match_renders_without_ticking() {
        let mut frame_loop = FrameLoop::new(started(4), NoInput, Recorder::default());
        frame_loop.pong_mut().toggle_pause();

        frame_loop.run_for(4, FIXED_DT);

        assert_eq!(frame_loop.pong().frame(), 0);
        assert_eq!(frame_loop.renderer().frames.len(), 4);
    }

    #[test]
    fn frame_uses_wall_clock_delta() {
        let mut frame_loop = FrameLoop::new(started(5), NoInput, Recorder::default());
        let start = Instant::now();

        frame_loop.frame(start);
        assert_eq!(frame_loop.pong().frame(), 1);

        frame_loop.frame(start + Duration::from_millis(100));
        assert_eq!(frame_loop.pong().frame(), 7);
    }

    #[test]
    fn long_quanta_keep_all_simulated_time() {
        let mut frame_loop = FrameLoop::new(started(7), NoInput, Recorder::default());

        // one quantum per second, as a 1 fps renderer would ask for
        assert_eq!(frame_loop.run_for(10, 1.0), LoopControl::Continue);

        let frame = frame_loop.pong().frame();
        assert!((599..=600).contains(&frame), "simulated {frame} frames");
        assert_eq!(frame_loop.renderer().frames.len(), 10);
    }

    #[test]
    fn wall_clock_stall_is_capped() {
        let mut frame_loop = FrameLoop::new(started(8), NoInput, Recorder::default());
        let start = Instant::now();

        frame_loop.frame(start);
        frame_loop.frame(start + Duration::from_secs(5));

        assert_eq!(frame_loop.pong().frame(), 7);
    }

    #[test]
    fn finishes_at_game_over() {
        // the player's paddle never moves
        let mut frame_loop = FrameLoop::new(started(6), NoInput, Recorder::default());

        assert_eq!(frame_loop.run_for(1_000_000, FIXED_DT), LoopControl::Finished);

        let (pong, _, recorder) = frame_loop.into_parts();
        let winner = pong.winner().unwrap();
        assert_eq!(pong.score().get(winner), WIN_SCORE);
        assert_eq!(recorder.events.last(), Some(&PongEvent::GameOver(winner)));
    }
}
