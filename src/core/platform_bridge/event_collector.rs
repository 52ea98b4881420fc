//=========================================================================
// Event Collector
//=========================================================================
//
// Posted-event drain with bounded polling and the responder chain.
//
// Architecture:
//   Receiver<PlatformEvent> → dispatch() → post_event() → Responders
//
// Bounded draining keeps a flood of input from stalling a tic.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{InputEvent, PlatformEvent, Responders};
use crate::core::globals::EngineSession;
use crate::core::presentation::PresentationState;
use crate::core::scheduler::LoopControl;

//=== Constants ==========================================================

/// Events delivered before this tic are discarded.
pub const FIRST_INPUT_TIC: u64 = 3;

/// Upper bound on posted messages drained per tic.
pub const MAX_EVENTS_PER_TIC: usize = 100;

//=== post_event() ========================================================

/// Offers `event` to each responder in turn until one consumes it.
///
/// The HUD, status bar and automap only see events while in a level.
/// Returns whether any responder consumed the event.
pub fn post_event(session: &EngineSession, responders: &mut dyn Responders, event: &InputEvent) -> bool {
    if session.gametic < FIRST_INPUT_TIC {
        return false;
    }

    let in_level = session.game_state == PresentationState::InLevel;

    responders.menu(event)
        || (in_level
            && (responders.hud(event) || responders.status_bar(event) || responders.automap(event)))
        || responders.game(event)
}

//=== EventCollector ======================================================

/// Drains posted platform events once per tic.
pub struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    disconnected: bool,
}

impl EventCollector {
    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }

    /// Delivers pending events (bounded to prevent starvation).
    ///
    /// A closed channel only stops delivery; the loop keeps running.
    pub fn dispatch(&mut self, session: &EngineSession, responders: &mut dyn Responders) -> LoopControl {
        if self.disconnected {
            return LoopControl::Continue;
        }

        let mut drained = 0;
        while drained < MAX_EVENTS_PER_TIC {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs(batch)) => {
                    for event in &batch {
                        post_event(session, responders, event);
                    }
                    drained += 1;
                }
                Ok(PlatformEvent::WindowClosed) => return LoopControl::Exit,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Event channel closed");
                    self.disconnected = true;
                    break;
                }
            }
        }

        if drained >= MAX_EVENTS_PER_TIC {
            warn!("Event queue backlog: drained {} posts this tic", drained);
        }

        LoopControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
