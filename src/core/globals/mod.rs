//=========================================================================
// Global Engine State
//=========================================================================
//
// Separates frozen identity, live session data and external systems.
//
// Architecture:
//   GameIdentity:  mode/variant/language, fixed once at startup
//   EngineSession: explicit context passed to every component
//   Collaborators: boxed external subsystems owned by the engine
//   GameLifecycle: deferred game-session entry points
//
//=========================================================================

//=== Module Declarations =================================================

mod collaborators;
mod identity;
mod lifecycle;
mod session;

//=== Public API ==========================================================

pub use collaborators::Collaborators;
pub use identity::{GameIdentity, GameMode, GameVariant, Language};
pub use lifecycle::GameLifecycle;
pub use session::{EngineSession, GameAction, GameFlags};
