//! Lifecycle of one opened concept: parameters, animation and the mounted
//! surface, torn down together when the learner leaves or completes it.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::controller::{AnimationController, PlayState};
use crate::error::Result;
use crate::models::{ModelInfo, VisualizationKind};
use crate::params::{ParamUpdate, ParameterStore};
use crate::render::{self, Surface};

/// Signal sent to the host when a learner finishes a concept. The score is
/// chosen by the host; the engine never grades anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub concept: VisualizationKind,
    pub score: u32,
}

pub type CompletionCallback = Box<dyn FnMut(Completion)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No frame was pending: paused or stopped.
    Idle,
    /// No usable surface mounted; simulated time still advanced.
    Skipped,
    Drawn { time: f64 },
}

pub struct ConceptSession<S: Surface> {
    kind: VisualizationKind,
    params: ParameterStore,
    controller: AnimationController,
    surface: Option<S>,
    on_complete: Option<CompletionCallback>,
}

impl<S: Surface> ConceptSession<S> {
    /// New session in the `Stopped` state; call [`play`](Self::play) to
    /// start the animation.
    pub fn start(kind: VisualizationKind, on_complete: impl FnMut(Completion) + 'static) -> Self {
        info!(concept = kind.id(), "concept session started");
        Self {
            kind,
            params: ParameterStore::new(kind),
            controller: AnimationController::new(kind),
            surface: None,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    /// Like [`start`](Self::start) but from a concept id; an unregistered id
    /// is a content error and fails here.
    pub fn start_by_id(id: &str, on_complete: impl FnMut(Completion) + 'static) -> Result<Self> {
        let kind = id.parse()?;
        Ok(Self::start(kind, on_complete))
    }

    /// Attaches the drawing surface. A usable surface stays for the whole
    /// session; later mounts are ignored.
    pub fn mount(&mut self, surface: S) {
        if self.surface.as_ref().is_some_and(|s| !s.is_empty()) {
            warn!(concept = self.kind.id(), "surface already mounted, ignoring");
            return;
        }
        let (w, h) = surface.size();
        debug!(concept = self.kind.id(), width = w, height = h, "surface mounted");
        self.surface = Some(surface);
    }

    pub fn kind(&self) -> VisualizationKind {
        self.kind
    }

    pub fn info(&self) -> &'static ModelInfo {
        self.kind.info()
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn state(&self) -> PlayState {
        self.controller.state()
    }

    pub fn elapsed(&self) -> f64 {
        self.controller.clock().elapsed()
    }

    pub fn speed(&self) -> f64 {
        self.controller.clock().speed()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.controller.frames_rendered()
    }

    pub fn play(&mut self, now: Instant) {
        self.controller.play(now);
    }

    pub fn pause(&mut self, now: Instant) {
        self.controller.pause(now);
    }

    pub fn toggle(&mut self, now: Instant) {
        self.controller.toggle(now);
    }

    pub fn set_speed(&mut self, multiplier: f64, now: Instant) -> f64 {
        self.controller.set_speed(multiplier, now)
    }

    /// Takes effect on the next frame.
    pub fn update_parameter(&mut self, name: &str, value: f64) -> ParamUpdate {
        self.params.set(name, value)
    }

    pub fn nudge_parameter(&mut self, name: &str, steps: i32) -> ParamUpdate {
        self.params.nudge(name, steps)
    }

    pub fn reset(&mut self) {
        self.params.reset();
    }

    /// Runs one animation tick and paints the result.
    pub fn frame(&mut self, now: Instant) -> FrameOutcome {
        let Some(surface) = self.surface.as_mut().filter(|s| !s.is_empty()) else {
            return if self.controller.skip(now) {
                FrameOutcome::Skipped
            } else {
                FrameOutcome::Idle
            };
        };
        let viewport = surface.viewport();
        let Some(frame) = self.controller.tick(now, self.params.values(), viewport) else {
            return FrameOutcome::Idle;
        };
        render::draw(surface, &frame.scene);
        FrameOutcome::Drawn { time: frame.time }
    }

    /// Reports completion to the host and ends the session.
    pub fn complete(mut self, score: u32) {
        info!(concept = self.kind.id(), score, "concept completed");
        if let Some(mut callback) = self.on_complete.take() {
            callback(Completion { concept: self.kind, score });
        }
        self.teardown();
    }

    /// Ends the session without reporting completion.
    pub fn close(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.controller.stop();
        self.on_complete = None;
    }
}

impl<S: Surface> Drop for ConceptSession<S> {
    fn drop(&mut self) {
        self.teardown();
        debug!(concept = self.kind.id(), "concept session dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::render::BrailleSurface;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn recorder() -> (Rc<RefCell<Vec<Completion>>>, impl FnMut(Completion) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |c| sink.borrow_mut().push(c))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_starts_stopped_with_defaults() {
        let (_, cb) = recorder();
        let session: ConceptSession<BrailleSurface> = ConceptSession::start(VisualizationKind::Pendulum, cb);
        assert_eq!(session.state(), PlayState::Stopped);
        assert_eq!(session.params().get("angle"), Some(30.0));
    }

    #[test]
    fn test_unknown_id_fails_at_construction() {
        let (_, cb) = recorder();
        let result = ConceptSession::<BrailleSurface>::start_by_id("pendulumm", cb);
        assert!(matches!(result, Err(Error::UnknownKind(_))));

        let (_, cb) = recorder();
        let session = ConceptSession::<BrailleSurface>::start_by_id("quantumParticle", cb).unwrap();
        assert_eq!(session.kind(), VisualizationKind::QuantumParticle);
    }

    #[test]
    fn test_frame_draws_after_play() {
        let t0 = Instant::now();
        let (_, cb) = recorder();
        let mut session = ConceptSession::start(VisualizationKind::Orbit, cb);
        session.mount(BrailleSurface::new(80, 24));
        assert_eq!(session.frame(t0), FrameOutcome::Idle);

        session.play(t0);
        assert!(matches!(session.frame(t0 + ms(16)), FrameOutcome::Drawn { .. }));
        assert!(session.surface().unwrap().lit_pixels() > 0);
    }

    #[test]
    fn test_missing_surface_skips_render() {
        let t0 = Instant::now();
        let (_, cb) = recorder();
        let mut session: ConceptSession<BrailleSurface> = ConceptSession::start(VisualizationKind::Wave, cb);
        session.play(t0);
        assert_eq!(session.frame(t0 + ms(100)), FrameOutcome::Skipped);

        session.mount(BrailleSurface::new(0, 0));
        assert_eq!(session.frame(t0 + ms(200)), FrameOutcome::Skipped);

        session.mount(BrailleSurface::new(40, 12));
        match session.frame(t0 + ms(300)) {
            FrameOutcome::Drawn { time } => assert!((time - 0.3).abs() < 1e-6),
            other => panic!("expected a drawn frame, got {other:?}"),
        }
    }

    #[test]
    fn test_second_mount_is_ignored() {
        let (_, cb) = recorder();
        let mut session = ConceptSession::start(VisualizationKind::Spring, cb);
        session.mount(BrailleSurface::new(40, 12));
        session.mount(BrailleSurface::new(10, 3));
        assert_eq!(session.surface().unwrap().cols(), 40);
    }

    #[test]
    fn test_parameter_update_applies_next_frame() {
        let t0 = Instant::now();
        let (_, cb) = recorder();
        let mut session = ConceptSession::start(VisualizationKind::Field, cb);
        session.mount(BrailleSurface::new(80, 24));
        session.play(t0);
        session.frame(t0 + ms(16));
        let before = session.surface().unwrap().to_lines();

        assert_eq!(session.update_parameter("separation", 8.0), ParamUpdate::Stored(8.0));
        assert_eq!(session.surface().unwrap().to_lines(), before);
        session.frame(t0 + ms(32));
        assert_ne!(session.surface().unwrap().to_lines(), before);
    }

    #[test]
    fn test_complete_fires_once() {
        let (log, cb) = recorder();
        let mut session: ConceptSession<BrailleSurface> = ConceptSession::start(VisualizationKind::Wave, cb);
        session.play(Instant::now());
        session.complete(85);
        assert_eq!(
            log.borrow().as_slice(),
            &[Completion { concept: VisualizationKind::Wave, score: 85 }]
        );
    }

    #[test]
    fn test_close_does_not_report() {
        let (log, cb) = recorder();
        let session: ConceptSession<BrailleSurface> = ConceptSession::start(VisualizationKind::Orbit, cb);
        session.close();
        drop(ConceptSession::<BrailleSurface>::start(VisualizationKind::Orbit, |_| {}));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (_, cb) = recorder();
        let mut session: ConceptSession<BrailleSurface> = ConceptSession::start(VisualizationKind::Pendulum, cb);
        session.update_parameter("angle", 60.0);
        session.reset();
        assert_eq!(session.params().get("angle"), Some(30.0));
    }
}
