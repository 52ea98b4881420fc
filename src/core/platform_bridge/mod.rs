//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host's input layer with the engine loop.
//
// This module defines the contract between input implementations and
// core logic, allowing input backends to be swapped without changing
// core code.
//
// Components:
// - `interface`: Event types and the responder trait (the contract)
// - `event_collector`: Channel drain and responder chain
//
//=========================================================================

//=== Module Declarations =================================================

mod event_collector;
mod interface;

//=== Public API ==========================================================

pub use event_collector::{post_event, EventCollector, FIRST_INPUT_TIC, MAX_EVENTS_PER_TIC};
pub use interface::{InputEvent, PlatformEvent, Responders};
