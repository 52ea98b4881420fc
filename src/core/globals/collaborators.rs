//=========================================================================
// Collaborators
//=========================================================================
//
// Container for the external subsystems the driver sequences.
//
// The driver owns control flow only. Simulation, rendering, audio,
// networking and game-session handling live behind these trait objects
// and are supplied by the host when the engine is built.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::GameLifecycle;
use crate::core::platform_bridge::Responders;
use crate::core::presentation::{Clock, Drawers, Surface, WipeEffect};
use crate::core::scheduler::{Audio, NetSync, Simulation};

//=== Collaborators =======================================================

/// External subsystems driven by the engine loop.
///
/// # Available Collaborators
///
/// - `simulation`: tic sampling, command building and game/menu tickers
/// - `net`: per-frame network reconciliation hook
/// - `audio`: positional sound update and music
/// - `surface`, `drawers`, `wipe`: video output and drawing
/// - `clock`: wall clock measured in tics
/// - `lifecycle`: new game, load game and demo entry points
/// - `responders`: input handlers walked by the responder chain
pub struct Collaborators {
    pub simulation: Box<dyn Simulation>,
    pub net: Box<dyn NetSync>,
    pub audio: Box<dyn Audio>,

    /// Output surface; acquired once per presented frame.
    pub surface: Box<dyn Surface>,
    pub drawers: Box<dyn Drawers>,

    /// Pixel effect played between presentation states.
    pub wipe: Box<dyn WipeEffect>,
    pub clock: Box<dyn Clock>,
    pub lifecycle: Box<dyn GameLifecycle>,
    pub responders: Box<dyn Responders>,
}
