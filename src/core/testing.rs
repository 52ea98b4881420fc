//=========================================================================
// Test Fakes
//=========================================================================
//
// Recording implementations of the collaborator traits.
//
// Every fake that touches a `Recorder` appends a short call name, so tests
// can assert on call order across several collaborators at once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::archive::{ArchiveList, LumpIndex};
use crate::core::attract::Music;
use crate::core::config::Skill;
use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::{Collaborators, EngineSession, GameAction, GameIdentity, GameLifecycle};
use crate::core::platform_bridge::{InputEvent, Responders};
use crate::core::presentation::{
    Clock, Drawers, ScreenBuffer, Surface, ViewGeometry, WipeEffect,
};
use crate::core::scheduler::{Audio, EntityId, LoopControl, NetSync, Simulation, TicBatch};

//=== Session =============================================================

/// Session with an undetermined identity and no archives.
pub(crate) fn session() -> EngineSession {
    EngineSession::new(
        GameIdentity::default(),
        ArchiveList::new(),
        LumpIndex::new(),
        PathBuf::from("."),
    )
}

//=== Recorder ============================================================

/// Shared call log.
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder {
    calls: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub(crate) fn push(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == call).count()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

//=== Surface =============================================================

pub(crate) struct RecordingSurface {
    log: Recorder,
    /// `false` makes `start_display` refuse.
    pub(crate) available: bool,
}

impl RecordingSurface {
    pub(crate) fn new(log: &Recorder) -> Self {
        Self {
            log: log.clone(),
            available: true,
        }
    }
}

impl Surface for RecordingSurface {
    fn start_display(&mut self) -> bool {
        self.log.push("start_display");
        self.available
    }

    fn end_display(&mut self) {
        self.log.push("end_display");
    }

    fn set_palette(&mut self, _index: usize) {
        self.log.push("set_palette");
    }

    fn capture_screen(&mut self) -> ScreenBuffer {
        self.log.push("capture_screen");
        ScreenBuffer::default()
    }

    fn update_no_blit(&mut self) {
        self.log.push("update_no_blit");
    }

    fn finish_update(&mut self) {
        self.log.push("finish_update");
    }
}

//=== Drawers =============================================================

pub(crate) struct RecordingDrawers {
    log: Recorder,
    /// Geometry returned by the next resize; `None` keeps the current one.
    pub(crate) next_view: Option<ViewGeometry>,
    pub(crate) pause_width: i32,
}

impl RecordingDrawers {
    pub(crate) fn new(log: &Recorder) -> Self {
        Self {
            log: log.clone(),
            next_view: None,
            pause_width: 0,
        }
    }
}

impl Drawers for RecordingDrawers {
    fn intermission(&mut self) {
        self.log.push("intermission");
    }

    fn finale(&mut self) {
        self.log.push("finale");
    }

    fn page(&mut self, name: &str) {
        self.log.push(format!("page:{}", name));
    }

    fn credits(&mut self) {
        self.log.push("credits");
    }

    fn hud_erase(&mut self) {
        self.log.push("hud_erase");
    }

    fn execute_set_view_size(&mut self, current: ViewGeometry) -> ViewGeometry {
        self.log.push("execute_set_view_size");
        self.next_view.take().unwrap_or(current)
    }

    fn fill_back_screen(&mut self) {
        self.log.push("fill_back_screen");
    }

    fn view_border(&mut self) {
        self.log.push("view_border");
    }

    fn player_view(&mut self, player: usize) {
        self.log.push(format!("player_view({})", player));
    }

    fn automap(&mut self) {
        self.log.push("automap");
    }

    fn status_bar(&mut self, full_status: bool, refresh: bool) {
        self.log.push(format!("status_bar({},{})", full_status, refresh));
    }

    fn hud(&mut self) {
        self.log.push("hud");
    }

    fn patch_width(&self, _name: &str) -> i32 {
        self.pause_width
    }

    fn draw_patch(&mut self, x: i32, y: i32, name: &str) {
        self.log.push(format!("draw_patch({},{},{})", x, y, name));
    }

    fn menu(&mut self) {
        self.log.push("menu");
    }
}

//=== Clock ===============================================================

/// Clock that advances one tic every `polls_per_tic` sleeps.
///
/// With `polls_per_tic == 0` time never moves.
pub(crate) struct StepClock {
    now: i64,
    polls_per_tic: u32,
    pending: u32,
    sleeps: u32,
    total_slept: u64,
}

impl StepClock {
    pub(crate) fn new(start: i64, polls_per_tic: u32) -> Self {
        Self {
            now: start,
            polls_per_tic,
            pending: 0,
            sleeps: 0,
            total_slept: 0,
        }
    }

    pub(crate) fn sleeps(&self) -> u32 {
        self.sleeps
    }

    pub(crate) fn total_slept(&self) -> u64 {
        self.total_slept
    }
}

impl Clock for StepClock {
    fn now_tics(&mut self) -> i64 {
        self.now
    }

    fn sleep_micros(&mut self, micros: u64) {
        self.sleeps += 1;
        self.total_slept += micros;
        if self.polls_per_tic == 0 {
            return;
        }
        self.pending += 1;
        if self.pending == self.polls_per_tic {
            self.pending = 0;
            self.now += 1;
        }
    }
}

//=== WipeEffect ==========================================================

/// Finishes after a fixed number of steps.
pub(crate) struct FinishAfter {
    remaining: u32,
}

impl FinishAfter {
    pub(crate) fn new(steps: u32) -> Self {
        Self { remaining: steps }
    }
}

impl WipeEffect for FinishAfter {
    fn advance(&mut self, _source: &ScreenBuffer, _target: &ScreenBuffer, _tics: u32) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

//=== NetSync =============================================================

pub(crate) struct NullNet;

impl NetSync for NullNet {
    fn net_update(&mut self, _session: &mut EngineSession) {}
}

//=== Audio ===============================================================

pub(crate) struct RecordingAudio {
    log: Recorder,
}

impl RecordingAudio {
    pub(crate) fn new(log: &Recorder) -> Self {
        Self { log: log.clone() }
    }
}

impl Audio for RecordingAudio {
    fn update_sounds(&mut self, listener: EntityId) {
        self.log.push(format!("update_sounds({})", listener.0));
    }

    fn start_music(&mut self, music: Music) {
        self.log.push(format!("music:{:?}", music));
    }
}

//=== Lifecycle ===========================================================

pub(crate) struct RecordingLifecycle {
    log: Recorder,
}

impl RecordingLifecycle {
    pub(crate) fn new(log: &Recorder) -> Self {
        Self { log: log.clone() }
    }
}

impl GameLifecycle for RecordingLifecycle {
    fn deferred_play_demo(&mut self, session: &mut EngineSession, name: &str) {
        self.log.push(format!("play_demo:{}", name));
        session.game_action = GameAction::PlayDemo;
    }

    fn deferred_init_new(&mut self, session: &mut EngineSession, skill: Skill, episode: i32, map: i32) {
        self.log.push(format!("init_new({:?},{},{})", skill, episode, map));
        session.game_action = GameAction::NewGame;
    }

    fn load_game(&mut self, session: &mut EngineSession, slot: u8) {
        self.log.push(format!("load_game({})", slot));
        session.game_action = GameAction::LoadGame;
    }

    fn record_demo(&mut self, _session: &mut EngineSession, name: &str) {
        self.log.push(format!("record_demo:{}", name));
    }

    fn begin_recording(&mut self, _session: &mut EngineSession) {
        self.log.push("begin_recording");
    }

    fn apply_patch(&mut self, path: &Path) -> EngineResult<()> {
        self.log.push(format!("apply_patch:{}", path.display()));
        Ok(())
    }

    fn apply_embedded_patch(&mut self) -> EngineResult<()> {
        self.log.push("apply_embedded_patch");
        Ok(())
    }
}

//=== Simulation ==========================================================

/// Counters shared between a [`ScriptedSim`] and its test.
#[derive(Debug, Default)]
pub(crate) struct SimProbe {
    pub(crate) tics_run: u64,
    /// A tic ran with an unexpected `gametic` or `maketic`.
    pub(crate) counter_mismatch: bool,
}

/// Scripted simulation that checks tic counters stay gapless.
pub(crate) struct ScriptedSim {
    log: Option<Recorder>,
    probe: Rc<RefCell<SimProbe>>,
    /// Batches handed out by `due_tics`, then `fallback`.
    pub(crate) batches: VecDeque<TicBatch>,
    pub(crate) fallback: TicBatch,
    /// Frames to run before `start_frame` reports exit.
    pub(crate) frames_left: Option<u32>,
    pub(crate) entity: Option<EntityId>,
    /// `game_ticker` fails once this many tics have run.
    pub(crate) fail_at: Option<u64>,
}

impl ScriptedSim {
    pub(crate) fn new() -> Self {
        Self {
            log: None,
            probe: Rc::default(),
            batches: VecDeque::new(),
            fallback: TicBatch { due: 1, rendered: false },
            frames_left: None,
            entity: None,
            fail_at: None,
        }
    }

    pub(crate) fn recording(log: &Recorder) -> Self {
        Self {
            log: Some(log.clone()),
            ..Self::new()
        }
    }

    pub(crate) fn probe(&self) -> Rc<RefCell<SimProbe>> {
        Rc::clone(&self.probe)
    }

    fn note(&self, call: &str) {
        if let Some(log) = &self.log {
            log.push(call);
        }
    }
}

impl Simulation for ScriptedSim {
    fn start_frame(&mut self, _session: &mut EngineSession) -> LoopControl {
        self.note("start_frame");
        match self.frames_left.as_mut() {
            Some(0) => LoopControl::Exit,
            Some(n) => {
                *n -= 1;
                LoopControl::Continue
            }
            None => LoopControl::Continue,
        }
    }

    fn start_tic(&mut self, _session: &mut EngineSession) {
        self.note("start_tic");
    }

    fn build_tic_command(&mut self, session: &mut EngineSession) {
        self.note("build_tic_command");
        let mut probe = self.probe.borrow_mut();
        if session.maketic != probe.tics_run {
            probe.counter_mismatch = true;
        }
    }

    fn menu_ticker(&mut self, _session: &mut EngineSession) {
        self.note("menu_ticker");
    }

    fn game_ticker(&mut self, session: &mut EngineSession) -> EngineResult<()> {
        self.note("game_ticker");
        let mut probe = self.probe.borrow_mut();
        if self.fail_at == Some(probe.tics_run) {
            return Err(EngineError::Fatal("scripted failure".into()));
        }
        if session.gametic != probe.tics_run {
            probe.counter_mismatch = true;
        }
        probe.tics_run += 1;
        Ok(())
    }

    fn due_tics(&mut self, _session: &mut EngineSession) -> TicBatch {
        self.note("due_tics");
        self.batches.pop_front().unwrap_or(self.fallback)
    }

    fn display_player_entity(&self, _session: &EngineSession) -> Option<EntityId> {
        self.entity
    }
}

//=== Collaborators =======================================================

/// Full collaborator set around `simulation`, logging into `log`.
pub(crate) fn collaborators(log: &Recorder, simulation: ScriptedSim) -> Collaborators {
    Collaborators {
        simulation: Box::new(simulation),
        net: Box::new(NullNet),
        audio: Box::new(RecordingAudio::new(log)),
        surface: Box::new(RecordingSurface::new(log)),
        drawers: Box::new(RecordingDrawers::new(log)),
        wipe: Box::new(FinishAfter::new(1)),
        clock: Box::new(StepClock::new(0, 0)),
        lifecycle: Box::new(RecordingLifecycle::new(log)),
        responders: Box::new(RecordingResponders::new(log)),
    }
}

//=== Responders ==========================================================

/// Responder chain whose eaters are chosen per test.
#[derive(Default)]
pub(crate) struct RecordingResponders {
    log: Recorder,
    pub(crate) eats: Vec<&'static str>,
}

impl RecordingResponders {
    pub(crate) fn new(log: &Recorder) -> Self {
        Self {
            log: log.clone(),
            eats: Vec::new(),
        }
    }

    fn answer(&self, name: &'static str) -> bool {
        self.log.push(name);
        self.eats.contains(&name)
    }
}

impl Responders for RecordingResponders {
    fn menu(&mut self, _event: &InputEvent) -> bool {
        self.answer("menu")
    }

    fn hud(&mut self, _event: &InputEvent) -> bool {
        self.answer("hud")
    }

    fn status_bar(&mut self, _event: &InputEvent) -> bool {
        self.answer("status_bar")
    }

    fn automap(&mut self, _event: &InputEvent) -> bool {
        self.answer("automap")
    }

    fn game(&mut self, _event: &InputEvent) -> bool {
        self.answer("game")
    }
}
