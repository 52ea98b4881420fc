//=========================================================================
// Start Plan
//=========================================================================
//
// Decides how the first session begins, then carries the decision out.
//
// Precedence:
// ```text
//   record_from ─► record demo + load its slot
//   load_game   ─► load slot (record may arm recording)
//   demo        ─► play it once, nothing else
//   autostart   ─► new game (skill/episode/warp/record/net game)
//   otherwise   ─► attract loop
// ```
//
// Planning is pure so it can be tested without any collaborators.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use super::first_map;
use crate::core::archive::LumpIndex;
use crate::core::attract::AttractSequencer;
use crate::core::config::{LaunchOptions, Skill};
use crate::core::globals::{EngineSession, GameLifecycle, GameMode};

//=== DemoMode ============================================================

/// How a requested demo is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoMode {
    Normal,
    /// As fast as possible.
    Fast,
    /// Single-tic stepping with timing statistics.
    Timed,
}

//=== DemoRequest =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoRequest {
    pub name: String,
    pub mode: DemoMode,
}

//=== StartAction =========================================================

/// What happens once archives and identity are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    LoadGame(u8),
    NewGame { skill: Skill, episode: i32, map: i32 },
    /// Only the requested demo runs.
    DemoOnly,
    Title,
}

//=== StartPlan ===========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPlan {
    /// Demo file armed for recording.
    pub record: Option<String>,
    pub demo: Option<DemoRequest>,
    pub action: StartAction,
    /// Write the demo header after the new game is set up.
    pub begin_recording: bool,
}

impl StartPlan {
    /// Timed demos force deterministic stepping.
    pub fn forces_single_tics(&self) -> bool {
        matches!(&self.demo, Some(DemoRequest { mode: DemoMode::Timed, .. }))
    }

    /// Invokes the lifecycle entry points for this plan.
    pub fn execute(
        &self,
        session: &mut EngineSession,
        lifecycle: &mut dyn GameLifecycle,
        attract: &mut AttractSequencer,
    ) {
        if let Some(name) = &self.record {
            lifecycle.record_demo(session, name);
        }

        if let Some(demo) = &self.demo {
            session.single_demo = true;
            session.timing_demo = demo.mode != DemoMode::Normal;
            lifecycle.deferred_play_demo(session, &demo.name);
        }

        match self.action {
            StartAction::LoadGame(slot) => lifecycle.load_game(session, slot),
            StartAction::NewGame { skill, episode, map } => {
                lifecycle.deferred_init_new(session, skill, episode, map);
                if self.begin_recording {
                    lifecycle.begin_recording(session);
                }
            }
            StartAction::DemoOnly => {}
            StartAction::Title => attract.start_title(session),
        }
    }
}

//=== plan_start() ========================================================

/// Builds the start plan from the launch options.
pub fn plan_start(options: &LaunchOptions, mode: GameMode, lumps: &LumpIndex) -> StartPlan {
    let mut autostart = false;
    let mut episode = 1;
    let mut map = 1;

    let skill = match options.skill {
        Some(n) => {
            autostart = true;
            Skill::from_number(n).unwrap_or_default()
        }
        None => Skill::default(),
    };

    if let Some(ep) = options.episode {
        episode = ep;
        map = 1;
        autostart = true;
    }

    if let Some(warp) = &options.warp {
        (episode, map) = warp.resolve(mode, episode);
        autostart = true;
    }

    let (slot, record) = match &options.record_from {
        Some(from) => (Some(from.slot), Some(from.demo.clone())),
        None => {
            if options.record.is_some() {
                autostart = true;
            }
            (options.load_game, options.record.clone())
        }
    };

    let demo = if let Some(name) = &options.fast_demo {
        Some(DemoRequest { name: name.clone(), mode: DemoMode::Fast })
    } else if let Some(name) = &options.time_demo {
        Some(DemoRequest { name: name.clone(), mode: DemoMode::Timed })
    } else {
        options
            .play_demo
            .as_ref()
            .map(|name| DemoRequest { name: name.clone(), mode: DemoMode::Normal })
    };

    let action = if let Some(slot) = slot {
        StartAction::LoadGame(slot)
    } else if demo.is_some() {
        StartAction::DemoOnly
    } else if autostart || options.net_game {
        if map == 0 {
            let first = first_map(mode, lumps);
            episode = first.episode;
            map = first.map;
        }
        StartAction::NewGame { skill, episode, map }
    } else {
        StartAction::Title
    };

    if let Some(demo) = &demo {
        info!("Playing demo {}", demo.name);
    }

    StartPlan {
        begin_recording: record.is_some() && matches!(action, StartAction::NewGame { .. }),
        record,
        demo,
        action,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
