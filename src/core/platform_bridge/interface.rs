//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Input-to-core interface types (events and responders).
//
// Defines the contract between the host's input layer and the engine loop.
//
//=========================================================================

//=== InputEvent ==========================================================

/// A single input event as seen by the responder chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(i32),
    KeyUp(i32),

    /// Button mask plus relative motion since the last event.
    Mouse { buttons: i32, dx: i32, dy: i32 },

    /// Button mask plus axis position.
    Joystick { buttons: i32, x: i32, y: i32 },
}

//=== PlatformEvent =======================================================

/// Messages posted to the engine through its event channel.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// Input events gathered by the host since the last post.
    Inputs(Vec<InputEvent>),

    /// Window close or quit requested.
    WindowClosed,
}

//=== Responders ==========================================================

/// Input handlers consulted by [`post_event`](super::post_event).
///
/// Each returns `true` when it consumed the event.
pub trait Responders {
    fn menu(&mut self, event: &InputEvent) -> bool;
    fn hud(&mut self, event: &InputEvent) -> bool;
    fn status_bar(&mut self, event: &InputEvent) -> bool;
    fn automap(&mut self, event: &InputEvent) -> bool;
    fn game(&mut self, event: &InputEvent) -> bool;
}
