//=========================================================================
// Core
//=========================================================================
//
// Engine subsystems, leaves first.
//
// Architecture:
// ```text
//   archive        ─► startup ─► EngineSession ─► scheduler
//                                                   ├─ attract
//                                                   ├─ presentation (+ wipe)
//                                                   └─ platform_bridge
// ```
//
// Everything here runs on the one loop thread.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod archive;
pub mod attract;
pub mod config;
pub mod error;
pub mod globals;
pub mod platform_bridge;
pub mod presentation;
pub mod scheduler;
pub mod startup;

#[cfg(test)]
pub(crate) mod testing;

//=== Constants ==========================================================

/// Simulation tics per second.
pub const TICRATE: u32 = 35;
