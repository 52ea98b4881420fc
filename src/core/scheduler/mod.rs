//=========================================================================
// Frame Scheduler
//=========================================================================
//
// Outer loop: advance simulation tics, then present at most one frame.
//
// Architecture:
// ```text
//   iterate()
//     ├─ Simulation::start_frame()          ── Exit? stop
//     ├─ clear one-shot warp once reached
//     ├─ TicPolicy::Single   → run_tic() × 1
//     │  TicPolicy::Adaptive → run_tic() × due_tics().due
//     ├─ Audio::update_sounds(display player)
//     └─ Presenter::present_frame()  unless smooth motion already
//                                    rendered and no wipe is due
//
//   run_tic()
//     start_tic → posted events → build command → pending attract
//     advance → menu ticker → game ticker → page ticker → counters
// ```
//
// Single-tic stepping is deterministic: exactly one tic per iteration,
// and every iteration presents.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::attract::{AttractSequencer, Music};
use crate::core::error::EngineResult;
use crate::core::globals::{Collaborators, EngineSession};
use crate::core::platform_bridge::EventCollector;
use crate::core::presentation::{FrameOutcome, FrameTargets, PresentationState, Presenter};

//=== TicPolicy ===========================================================

/// How many tics one loop iteration advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicPolicy {
    /// Exactly one tic per iteration, unconditionally presented.
    Single,

    /// As many whole tics as wall time says are due (possibly none).
    #[default]
    Adaptive,
}

//=== TicBatch ============================================================

/// Answer of [`Simulation::due_tics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicBatch {
    /// Whole tics to run now.
    pub due: u32,

    /// An interpolated frame was already rendered while waiting.
    pub rendered: bool,
}

//=== LoopControl =========================================================

/// Loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

//=== EntityId ============================================================

/// Opaque handle to a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

//=== Collaborator Traits =================================================

/// Simulation, timing and input sampling.
pub trait Simulation {
    /// Frame-synchronous I/O. Returning [`LoopControl::Exit`] stops the loop.
    fn start_frame(&mut self, session: &mut EngineSession) -> LoopControl;

    /// Per-tic input sampling.
    fn start_tic(&mut self, session: &mut EngineSession);

    /// Builds the local player's command for the upcoming tic.
    fn build_tic_command(&mut self, session: &mut EngineSession);

    fn menu_ticker(&mut self, session: &mut EngineSession);

    /// Advances the world by one tic.
    fn game_ticker(&mut self, session: &mut EngineSession) -> EngineResult<()>;

    /// Tics due given elapsed wall time; never fractional.
    fn due_tics(&mut self, session: &mut EngineSession) -> TicBatch;

    /// Entity of the player being displayed, if it exists.
    fn display_player_entity(&self, session: &EngineSession) -> Option<EntityId>;
}

/// Sound and music output.
pub trait Audio {
    /// Repositions sounds relative to `listener`.
    fn update_sounds(&mut self, listener: EntityId);

    fn start_music(&mut self, music: Music);
}

/// Network reconciliation, invoked synchronously once per frame.
pub trait NetSync {
    fn net_update(&mut self, session: &mut EngineSession);
}

//=== FrameStats ==========================================================

/// Counters kept across loop iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub iterations: u64,
    pub tics: u64,
    pub presented: u64,
    pub wiped: u64,
    pub skipped: u64,
}

//=== FrameScheduler ======================================================

/// Drives tics and presentation for one engine session.
pub struct FrameScheduler {
    policy: TicPolicy,
    smooth_motion: bool,
    presenter: Presenter,
    attract: AttractSequencer,
    events: EventCollector,
    stats: FrameStats,
}

impl FrameScheduler {
    pub fn new(policy: TicPolicy, smooth_motion: bool, presenter: Presenter, events: EventCollector) -> Self {
        Self {
            policy,
            smooth_motion,
            presenter,
            attract: AttractSequencer::new(),
            events,
            stats: FrameStats::default(),
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn policy(&self) -> TicPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: TicPolicy) {
        self.policy = policy;
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut Presenter {
        &mut self.presenter
    }

    pub fn attract(&self) -> &AttractSequencer {
        &self.attract
    }

    pub fn attract_mut(&mut self) -> &mut AttractSequencer {
        &mut self.attract
    }

    //--- Main Loop --------------------------------------------------------

    /// Runs iterations until a collaborator signals exit or an error
    /// propagates.
    pub fn run(&mut self, session: &mut EngineSession, collab: &mut Collaborators) -> EngineResult<()> {
        info!("Entering main loop ({:?} tics)", self.policy);
        while self.iterate(session, collab)? == LoopControl::Continue {}
        info!(
            "Main loop finished after {} tics, {} frames",
            self.stats.tics,
            self.stats.presented + self.stats.wiped
        );
        Ok(())
    }

    /// One loop iteration: tics, audio, then at most one frame.
    pub fn iterate(&mut self, session: &mut EngineSession, collab: &mut Collaborators) -> EngineResult<LoopControl> {
        if collab.simulation.start_frame(session) == LoopControl::Exit {
            return Ok(LoopControl::Exit);
        }
        self.stats.iterations += 1;

        if session.pending_warp == Some(session.game_map) {
            debug!("Reached warp target map {}", session.game_map);
            session.pending_warp = None;
        }

        let rendered = match self.policy {
            TicPolicy::Single => {
                if self.run_tic(session, collab)? == LoopControl::Exit {
                    return Ok(LoopControl::Exit);
                }
                false
            }
            TicPolicy::Adaptive => {
                let batch = collab.simulation.due_tics(session);
                trace!("{} tics due", batch.due);
                for _ in 0..batch.due {
                    if self.run_tic(session, collab)? == LoopControl::Exit {
                        return Ok(LoopControl::Exit);
                    }
                }
                batch.rendered
            }
        };

        if let Some(listener) = collab.simulation.display_player_entity(session) {
            collab.audio.update_sounds(listener);
        }

        let already_shown = self.smooth_motion
            && rendered
            && !self.presenter.transition_pending(session.game_state);
        if !already_shown {
            self.present(session, collab);
        }

        Ok(LoopControl::Continue)
    }

    /// Advances the simulation by exactly one tic.
    pub fn run_tic(&mut self, session: &mut EngineSession, collab: &mut Collaborators) -> EngineResult<LoopControl> {
        collab.simulation.start_tic(session);
        if self.events.dispatch(session, collab.responders.as_mut()) == LoopControl::Exit {
            return Ok(LoopControl::Exit);
        }
        collab.simulation.build_tic_command(session);

        if session.advance_demo {
            self.attract
                .advance(session, collab.audio.as_mut(), collab.lifecycle.as_mut());
        }

        collab.simulation.menu_ticker(session);
        collab.simulation.game_ticker(session)?;

        if session.game_state == PresentationState::AttractScreen {
            self.attract.page_ticker(session);
        }

        session.gametic += 1;
        session.maketic += 1;
        self.stats.tics += 1;

        Ok(LoopControl::Continue)
    }

    //--- Internal Helpers -------------------------------------------------

    fn present(&mut self, session: &mut EngineSession, collab: &mut Collaborators) {
        let targets = FrameTargets {
            surface: collab.surface.as_mut(),
            drawers: collab.drawers.as_mut(),
            wipe: collab.wipe.as_mut(),
            clock: collab.clock.as_mut(),
            net: collab.net.as_mut(),
        };

        match self.presenter.present_frame(session, &self.attract, targets) {
            FrameOutcome::Presented => self.stats.presented += 1,
            FrameOutcome::Wiped(report) => {
                debug!(target: "present", "wipe took {} frames over {} tics", report.frames, report.tics);
                self.stats.wiped += 1;
            }
            FrameOutcome::Skipped => self.stats.skipped += 1,
            FrameOutcome::Suppressed => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EngineError;
    use crate::core::platform_bridge::PlatformEvent;
    use crate::core::testing::{collaborators, session, Recorder, ScriptedSim};
    use crossbeam_channel::{unbounded, Sender};

    fn scheduler(policy: TicPolicy, smooth_motion: bool) -> (FrameScheduler, Sender<PlatformEvent>) {
        let (tx, rx) = unbounded();
        let sched = FrameScheduler::new(policy, smooth_motion, Presenter::new(false), EventCollector::new(rx));
        (sched, tx)
    }

    #[test]
    fn single_tic_mode_never_skips_or_repeats() {
        let log = Recorder::default();
        let sim = ScriptedSim::new();
        let probe = sim.probe();
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();

        for _ in 0..10_000 {
            assert_eq!(sched.iterate(&mut s, &mut collab).unwrap(), LoopControl::Continue);
        }

        assert_eq!(s.gametic, 10_000);
        assert_eq!(s.maketic, 10_000);
        assert_eq!(probe.borrow().tics_run, 10_000);
        assert!(!probe.borrow().counter_mismatch);
        assert_eq!(sched.stats().presented + sched.stats().wiped, 10_000);
    }

    #[test]
    fn adaptive_runs_due_tics_and_presents_at_most_once() {
        let log = Recorder::default();
        let mut sim = ScriptedSim::new();
        sim.batches.extend([
            TicBatch { due: 3, rendered: false },
            TicBatch { due: 0, rendered: false },
            TicBatch { due: 5, rendered: false },
        ]);
        let probe = sim.probe();
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Adaptive, false);
        let mut s = session();

        for _ in 0..3 {
            log.clear();
            sched.iterate(&mut s, &mut collab).unwrap();
            assert_eq!(log.count("start_display"), 1);
        }

        assert_eq!(s.gametic, 8);
        assert_eq!(probe.borrow().tics_run, 8);
        assert!(!probe.borrow().counter_mismatch);
    }

    #[test]
    fn smooth_motion_skips_frame_already_rendered() {
        let log = Recorder::default();
        let mut sim = ScriptedSim::new();
        sim.fallback = TicBatch { due: 1, rendered: true };
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Adaptive, true);
        let mut s = session();

        // Shadow state matches the attract screen, so nothing is pending.
        sched.iterate(&mut s, &mut collab).unwrap();
        assert_eq!(log.count("start_display"), 0);

        // A state change still has to be presented to run its wipe.
        s.game_state = PresentationState::Intermission;
        sched.iterate(&mut s, &mut collab).unwrap();
        assert_eq!(log.count("start_display"), 1);
        assert_eq!(sched.stats().wiped, 1);
    }

    #[test]
    fn rendered_flag_ignored_without_smooth_motion() {
        let log = Recorder::default();
        let mut sim = ScriptedSim::new();
        sim.fallback = TicBatch { due: 1, rendered: true };
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Adaptive, false);
        let mut s = session();

        sched.iterate(&mut s, &mut collab).unwrap();
        assert_eq!(log.count("start_display"), 1);
    }

    #[test]
    fn tic_steps_run_in_order() {
        let log = Recorder::default();
        let sim = ScriptedSim::recording(&log);
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();

        sched.run_tic(&mut s, &mut collab).unwrap();

        assert_eq!(
            log.calls(),
            ["start_tic", "build_tic_command", "menu_ticker", "game_ticker"]
        );
    }

    #[test]
    fn pending_attract_advance_runs_before_tickers() {
        let log = Recorder::default();
        let sim = ScriptedSim::recording(&log);
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();
        sched.attract_mut().start_title(&mut s);

        sched.run_tic(&mut s, &mut collab).unwrap();

        assert_eq!(
            log.calls(),
            ["start_tic", "build_tic_command", "music:Intro", "menu_ticker", "game_ticker"]
        );
        assert_eq!(sched.attract().cursor(), Some(0));
        // Page ticker already ran once.
        assert_eq!(sched.attract().page_tics(), 169);
    }

    #[test]
    fn page_ticker_idle_outside_attract_screen() {
        let log = Recorder::default();
        let mut collab = collaborators(&log, ScriptedSim::new());
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();
        s.game_state = PresentationState::InLevel;

        sched.run_tic(&mut s, &mut collab).unwrap();
        assert_eq!(sched.attract().page_tics(), 0);
        assert!(!s.advance_demo);
    }

    #[test]
    fn warp_cleared_once_reached() {
        let log = Recorder::default();
        let mut collab = collaborators(&log, ScriptedSim::new());
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();
        s.pending_warp = Some(7);

        sched.iterate(&mut s, &mut collab).unwrap();
        assert_eq!(s.pending_warp, Some(7));

        s.game_map = 7;
        sched.iterate(&mut s, &mut collab).unwrap();
        assert_eq!(s.pending_warp, None);
    }

    #[test]
    fn sounds_follow_display_player() {
        let log = Recorder::default();
        let mut sim = ScriptedSim::new();
        sim.entity = Some(EntityId(42));
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();

        sched.iterate(&mut s, &mut collab).unwrap();
        assert_eq!(log.count("update_sounds(42)"), 1);
    }

    #[test]
    fn run_stops_on_frame_exit() {
        let log = Recorder::default();
        let mut sim = ScriptedSim::new();
        sim.frames_left = Some(4);
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();

        sched.run(&mut s, &mut collab).unwrap();
        assert_eq!(sched.stats().iterations, 4);
        assert_eq!(s.gametic, 4);
    }

    #[test]
    fn window_close_stops_loop() {
        let log = Recorder::default();
        let mut collab = collaborators(&log, ScriptedSim::new());
        let (mut sched, tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();

        tx.send(PlatformEvent::WindowClosed).unwrap();
        assert_eq!(sched.iterate(&mut s, &mut collab).unwrap(), LoopControl::Exit);
        assert_eq!(s.gametic, 0);
    }

    #[test]
    fn ticker_error_propagates() {
        let log = Recorder::default();
        let mut sim = ScriptedSim::new();
        sim.fail_at = Some(2);
        let mut collab = collaborators(&log, sim);
        let (mut sched, _tx) = scheduler(TicPolicy::Single, false);
        let mut s = session();

        let err = sched.run(&mut s, &mut collab).unwrap_err();
        assert!(matches!(err, EngineError::Fatal(_)));
        assert_eq!(s.gametic, 2);
    }
}
