//=========================================================================
// Game Lifecycle
//=========================================================================
//
// Entry points into the game-session layer (new game, load, demo I/O).
//
// Called from startup and from the attract sequencer. All requests are
// deferred: the simulation ticker picks them up through the session's
// `game_action` on its next tic.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

//=== Internal Dependencies ===============================================

use super::EngineSession;
use crate::core::config::Skill;
use crate::core::error::EngineResult;

//=== GameLifecycle =======================================================

/// Game-session lifecycle collaborator.
///
/// Implementations own savegame and demo formats; this crate only decides
/// *when* each entry point is invoked.
pub trait GameLifecycle {
    /// Queues playback of a recorded demo lump.
    fn deferred_play_demo(&mut self, session: &mut EngineSession, name: &str);

    /// Queues a fresh game at the given skill and map.
    fn deferred_init_new(&mut self, session: &mut EngineSession, skill: Skill, episode: i32, map: i32);

    /// Loads a savegame slot from the session's save directory.
    fn load_game(&mut self, session: &mut EngineSession, slot: u8);

    /// Arms demo recording into `name`.
    fn record_demo(&mut self, session: &mut EngineSession, name: &str);

    /// Writes the demo header once the recorded game has been set up.
    fn begin_recording(&mut self, session: &mut EngineSession);

    /// Applies an external behaviour patch file.
    fn apply_patch(&mut self, path: &Path) -> EngineResult<()>;

    /// Applies the patch lump embedded in the loaded archives.
    fn apply_embedded_patch(&mut self) -> EngineResult<()>;

    /// Marks the console player alive before an attract step.
    fn mark_console_player_live(&mut self, _session: &mut EngineSession) {}
}
