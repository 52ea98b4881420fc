//=========================================================================
// Engine Session
//=========================================================================
//
// Shared state for one run of the engine.
//
// Replaces the process-wide globals of a classic driver with a single
// explicit context object. All access happens on the one loop thread:
//
//   identity, archives   written once by startup, read-only afterwards
//   live state           written by collaborators and the sequencer
//   presentation caches  private to `Presenter` (not stored here)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

//=== Internal Dependencies ===============================================

use super::identity::{GameIdentity, GameMode};
use crate::core::archive::{ArchiveList, LumpIndex};
use crate::core::presentation::{AutomapMode, PresentationState, ViewGeometry};

//=== GameAction ==========================================================

/// Deferred game action consumed by the simulation ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameAction {
    #[default]
    Nothing,
    LoadLevel,
    NewGame,
    LoadGame,
    SaveGame,
    PlayDemo,
    Completed,
    Victory,
    WorldDone,
}

//=== GameFlags ===========================================================

/// Play-mode switches taken from the launch options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameFlags {
    pub no_monsters: bool,
    pub respawn: bool,
    pub fast: bool,
    /// 0 = cooperative, 1 = deathmatch, 2 = alt-deathmatch.
    pub deathmatch: u8,
    pub no_music: bool,
    pub no_sfx: bool,
    /// Movement scale in percent (100 = stock).
    pub turbo_scale: u32,
}

//=== EngineSession =======================================================

/// Explicit engine context passed to every component that needs it.
#[derive(Debug)]
pub struct EngineSession {
    //--- Frozen at startup ------------------------------------------------
    identity: GameIdentity,
    archives: ArchiveList,
    lumps: LumpIndex,
    save_dir: PathBuf,

    //--- Live state -------------------------------------------------------
    /// High-level mode the presenter should draw.
    pub game_state: PresentationState,
    pub game_action: GameAction,
    pub flags: GameFlags,

    /// Simulation is paused.
    pub paused: bool,

    /// A game the user started (as opposed to a demo) is in progress.
    pub user_game: bool,

    /// The attract sequencer should advance at the next tic boundary.
    pub advance_demo: bool,

    pub net_game: bool,
    pub demo_playback: bool,
    /// Quit after the first demo finishes.
    pub single_demo: bool,
    /// Report timing statistics when the demo ends.
    pub timing_demo: bool,
    pub modified_game: bool,

    //--- Overlays -----------------------------------------------------------
    pub menu_active: bool,
    pub in_help_screens: bool,
    pub automap: AutomapMode,

    //--- View ---------------------------------------------------------------
    pub view: ViewGeometry,
    /// A view resize was requested and has not been executed yet.
    pub set_size_needed: bool,
    pub display_player: usize,

    //--- Tic counters -------------------------------------------------------
    /// Tics the simulation has run.
    pub gametic: u64,
    /// Tic at which the current level started.
    pub basetic: u64,
    /// Tic commands built.
    pub maketic: u64,

    //--- Level ----------------------------------------------------------------
    pub game_episode: i32,
    pub game_map: i32,
    /// One-shot fast-forward target; cleared once that map is active.
    pub pending_warp: Option<i32>,
}

impl EngineSession {
    /// Creates a session around the frozen startup results.
    pub fn new(identity: GameIdentity, archives: ArchiveList, lumps: LumpIndex, save_dir: PathBuf) -> Self {
        Self {
            identity,
            archives,
            lumps,
            save_dir,
            game_state: PresentationState::AttractScreen,
            game_action: GameAction::Nothing,
            flags: GameFlags {
                turbo_scale: 100,
                ..GameFlags::default()
            },
            paused: false,
            user_game: false,
            advance_demo: false,
            net_game: false,
            demo_playback: false,
            single_demo: false,
            timing_demo: false,
            modified_game: false,
            menu_active: false,
            in_help_screens: false,
            automap: AutomapMode::default(),
            view: ViewGeometry::default(),
            set_size_needed: false,
            display_player: 0,
            gametic: 0,
            basetic: 0,
            maketic: 0,
            game_episode: 1,
            game_map: 1,
            pending_warp: None,
        }
    }

    //--- Frozen State -----------------------------------------------------

    pub fn identity(&self) -> &GameIdentity {
        &self.identity
    }

    pub fn game_mode(&self) -> GameMode {
        self.identity.mode
    }

    pub fn archives(&self) -> &ArchiveList {
        &self.archives
    }

    pub fn lumps(&self) -> &LumpIndex {
        &self.lumps
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
