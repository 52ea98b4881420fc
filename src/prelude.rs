//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tic_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Configuration and errors
pub use crate::core::archive::SearchPaths;
pub use crate::core::config::{LaunchOptions, Skill};
pub use crate::core::error::{EngineError, EngineResult};

// Session and collaborators
pub use crate::core::globals::{Collaborators, EngineSession, GameLifecycle, GameMode};

// Collaborator traits
pub use crate::core::attract::Music;
pub use crate::core::platform_bridge::{InputEvent, PlatformEvent, Responders};
pub use crate::core::presentation::{Clock, Drawers, ScreenBuffer, Surface, SystemClock, WipeEffect};
pub use crate::core::scheduler::{Audio, EntityId, LoopControl, NetSync, Simulation, TicBatch};
