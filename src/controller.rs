//! Play/pause state and the per-frame step.
//!
//! Scheduling is cooperative: at most one frame request is outstanding, and
//! the next one is issued only after the current tick has finished. Pausing
//! or stopping withdraws the outstanding request, so no further scene is
//! evaluated until `play` issues a new one.

use std::time::Instant;

use tracing::debug;

use crate::clock::AnimationClock;
use crate::models::{self, VisualizationKind};
use crate::params::ParameterSet;
use crate::scene::{Scene, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Running,
    Paused,
}

impl PlayState {
    pub fn label(&self) -> &'static str {
        match self {
            PlayState::Stopped => "Stopped",
            PlayState::Running => "Running",
            PlayState::Paused => "Paused",
        }
    }
}

/// Handle for the one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameRequest(u64);

#[derive(Debug)]
pub struct Frame {
    pub request: FrameRequest,
    /// Simulated seconds the scene was evaluated at.
    pub time: f64,
    pub scene: Scene,
}

/// Everything one frame step reads or advances.
pub struct FrameState<'a> {
    pub kind: VisualizationKind,
    pub params: &'a ParameterSet,
    pub clock: &'a mut AnimationClock,
    pub viewport: Viewport,
}

/// Samples the clock and evaluates the model for this instant.
pub fn step(state: FrameState<'_>, now: Instant) -> (f64, Scene) {
    let t = state.clock.sample(now);
    (t, models::evaluate(state.kind, state.params, t, state.viewport))
}

#[derive(Debug)]
pub struct AnimationController {
    kind: VisualizationKind,
    state: PlayState,
    clock: AnimationClock,
    pending: Option<FrameRequest>,
    issued: u64,
    frames: u64,
}

impl AnimationController {
    pub fn new(kind: VisualizationKind) -> Self {
        Self {
            kind,
            state: PlayState::Stopped,
            clock: AnimationClock::new(),
            pending: None,
            issued: 0,
            frames: 0,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn play(&mut self, now: Instant) {
        if self.state == PlayState::Running {
            return;
        }
        self.clock.start(now);
        self.state = PlayState::Running;
        self.schedule();
        debug!(kind = self.kind.id(), elapsed = self.clock.elapsed(), "animation running");
    }

    pub fn pause(&mut self, now: Instant) {
        if self.state != PlayState::Running {
            return;
        }
        self.clock.halt(now);
        self.pending = None;
        self.state = PlayState::Paused;
        debug!(kind = self.kind.id(), elapsed = self.clock.elapsed(), "animation paused");
    }

    pub fn toggle(&mut self, now: Instant) {
        match self.state {
            PlayState::Running => self.pause(now),
            PlayState::Stopped | PlayState::Paused => self.play(now),
        }
    }

    pub fn set_speed(&mut self, multiplier: f64, now: Instant) -> f64 {
        let applied = self.clock.set_speed(multiplier, now);
        debug!(kind = self.kind.id(), requested = multiplier, applied, "speed changed");
        applied
    }

    /// Withdraws any pending frame. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if self.state == PlayState::Stopped && self.pending.is_none() {
            return;
        }
        self.pending = None;
        self.clock.freeze();
        self.state = PlayState::Stopped;
        debug!(kind = self.kind.id(), frames = self.frames, "animation stopped");
    }

    /// Runs the pending frame, if any, then issues the next request.
    pub fn tick(&mut self, now: Instant, params: &ParameterSet, viewport: Viewport) -> Option<Frame> {
        let request = self.pending.take()?;
        let (time, scene) = step(
            FrameState {
                kind: self.kind,
                params,
                clock: &mut self.clock,
                viewport,
            },
            now,
        );
        self.frames += 1;
        self.schedule();
        Some(Frame { request, time, scene })
    }

    /// Consumes the pending frame without evaluating a scene; simulated time
    /// still advances. Returns whether a frame was pending.
    pub fn skip(&mut self, now: Instant) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        self.clock.sample(now);
        self.schedule();
        true
    }

    fn schedule(&mut self) {
        self.issued += 1;
        self.pending = Some(FrameRequest(self.issued));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pendulum::PendulumParams;
    use std::time::Duration;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn params() -> ParameterSet {
        ParameterSet::defaults(VisualizationKind::Pendulum.info().params)
    }

    fn vp() -> Viewport {
        Viewport::new(160, 96)
    }

    #[test]
    fn test_starts_stopped_without_frames() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Pendulum);
        assert_eq!(c.state(), PlayState::Stopped);
        assert!(c.tick(t0, &params(), vp()).is_none());
    }

    #[test]
    fn test_one_request_outstanding_at_a_time() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Pendulum);
        c.play(t0);
        let first = c.pending().unwrap();
        c.play(t0 + ms(5));
        assert_eq!(c.pending(), Some(first));

        let frame = c.tick(t0 + ms(16), &params(), vp()).unwrap();
        assert_eq!(frame.request, first);
        assert!(c.pending().unwrap() > first);
    }

    #[test]
    fn test_pause_cancels_frames() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Pendulum);
        c.play(t0);
        c.pause(t0 + ms(100));
        assert_eq!(c.state(), PlayState::Paused);
        assert!(c.pending().is_none());
        assert!(c.tick(t0 + ms(116), &params(), vp()).is_none());
        assert_eq!(c.frames_rendered(), 0);
    }

    #[test]
    fn test_resume_has_no_phantom_advance() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Pendulum);
        c.play(t0);
        let before = c.tick(t0 + ms(1000), &params(), vp()).unwrap().time;

        c.pause(t0 + ms(1000));
        c.play(t0 + ms(5000));
        let after = c.tick(t0 + ms(5016), &params(), vp()).unwrap().time;

        assert!((after - before - 0.016).abs() < 1e-6, "advanced by {}", after - before);
    }

    #[test]
    fn test_frames_are_time_ordered() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Wave);
        let set = ParameterSet::new();
        c.play(t0);
        let mut last = -1.0;
        for i in 1..50u64 {
            if i == 20 {
                c.pause(t0 + ms(i * 16));
                c.play(t0 + ms(i * 16 + 400));
            }
            if i == 30 {
                c.set_speed(2.5, t0 + ms(i * 16 + 400));
            }
            let frame = c.tick(t0 + ms(i * 16 + if i >= 20 { 400 } else { 0 }), &set, vp()).unwrap();
            assert!(frame.time >= last);
            last = frame.time;
        }
    }

    #[test]
    fn test_scene_matches_elapsed_time() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Pendulum);
        let set = params();
        c.play(t0);
        let frame = c.tick(t0 + ms(250), &set, vp()).unwrap();
        assert!((frame.time - 0.25).abs() < 1e-9);
        assert_eq!(frame.scene, models::evaluate(VisualizationKind::Pendulum, &set, frame.time, vp()));
        assert!(PendulumParams::from_set(&set).angle_at(frame.time) < 30f64.to_radians());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Orbit);
        c.stop();
        assert_eq!(c.state(), PlayState::Stopped);
        c.play(t0);
        c.stop();
        c.stop();
        assert_eq!(c.state(), PlayState::Stopped);
        assert!(c.pending().is_none());
        assert!(c.tick(t0 + ms(16), &ParameterSet::new(), vp()).is_none());
    }

    #[test]
    fn test_speed_change_keeps_elapsed_time() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Spring);
        c.play(t0);
        c.tick(t0 + ms(1000), &ParameterSet::new(), vp());
        c.set_speed(3.0, t0 + ms(1000));
        let frame = c.tick(t0 + ms(1500), &ParameterSet::new(), vp()).unwrap();
        assert!((frame.time - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_skip_advances_time_without_scene() {
        let t0 = Instant::now();
        let mut c = AnimationController::new(VisualizationKind::Wave);
        assert!(!c.skip(t0));
        c.play(t0);
        assert!(c.skip(t0 + ms(500)));
        assert_eq!(c.frames_rendered(), 0);
        let frame = c.tick(t0 + ms(600), &ParameterSet::new(), vp()).unwrap();
        assert!((frame.time - 0.6).abs() < 1e-6);
    }
}
