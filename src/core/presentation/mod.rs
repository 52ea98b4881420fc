//=========================================================================
// Presentation State Machine
//=========================================================================
//
// Decides what to draw each frame and how to move between screens.
//
// Architecture:
// ```text
//   present_frame()
//     ├─ nodraw?            → Suppressed
//     ├─ Surface guard      → Skipped if the surface is busy
//     ├─ state ≠ shadow?    → capture "before" image
//     ├─ non-level state    → one fixed drawer (+ palette reset on entry)
//     ├─ level state        → border cache → view → automap → status
//     │                       → border → HUD
//     ├─ pause indicator, menu, net update
//     └─ finish_update()  or  run_transition()
// ```
//
// The border cache avoids repainting the area around a reduced view
// unless the border just appeared or a menu may have drawn over it.
//
//=========================================================================

//=== Module Declarations =================================================

mod wipe;

//=== External Dependencies ===============================================

use std::ops::{Deref, DerefMut};

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::attract::AttractSequencer;
use crate::core::globals::EngineSession;
use crate::core::scheduler::NetSync;

//=== Public API ==========================================================

pub use wipe::{
    run_transition, Clock, ScreenBuffer, SystemClock, TransitionReport, WipeEffect, WipeSession,
    WIPE_POLL_MICROS,
};

//=== Constants ==========================================================

/// Virtual width the pause indicator is centered against.
pub const BASE_WIDTH: i32 = 320;

/// Patch drawn while the simulation is paused.
pub const PAUSE_PATCH: &str = "M_PAUSE";

/// Vertical offset of the pause indicator.
pub const PAUSE_Y: i32 = 4;

/// Nap after a paused frame so the loop doesn't spin.
pub const PAUSE_SLEEP_MICROS: u64 = 1_000;

//=== PresentationState ===================================================

/// High-level screen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationState {
    /// Title pages, credits and demo playback between games.
    AttractScreen,

    /// Interactive play.
    InLevel,

    /// Between-level statistics.
    Intermission,

    /// End-of-episode text or cast.
    Finale,
}

//=== AutomapMode =========================================================

/// Overlay map state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutomapMode {
    pub active: bool,

    /// Drawn over the 3D view instead of replacing it.
    pub overlay: bool,
}

//=== ViewGeometry ========================================================

/// Size of the 3D view relative to the whole screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewGeometry {
    pub view_width: i32,
    pub view_height: i32,
    pub screen_width: i32,
    pub screen_height: i32,
}

impl ViewGeometry {
    /// A view that covers the whole screen.
    pub fn full_screen(width: i32, height: i32) -> Self {
        Self {
            view_width: width,
            view_height: height,
            screen_width: width,
            screen_height: height,
        }
    }

    pub fn is_full_height(&self) -> bool {
        self.view_height == self.screen_height
    }

    pub fn is_full_width(&self) -> bool {
        self.view_width == self.screen_width
    }
}

impl Default for ViewGeometry {
    fn default() -> Self {
        Self::full_screen(BASE_WIDTH, 200)
    }
}

//=== BorderCache =========================================================

/// Border redraw bookkeeping carried between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderCache {
    /// A border was visible on the last drawn frame.
    pub was_border_visible: bool,

    /// A menu was drawn over a bordered, narrowed view; the border
    /// must be refreshed next frame.
    pub may_need_redraw_next_frame: bool,
}

//=== Surface =============================================================

/// Output surface owned by the video backend.
pub trait Surface {
    /// Acquires exclusive access for one frame. `false` skips the frame.
    fn start_display(&mut self) -> bool;

    /// Releases the access taken by [`Surface::start_display`].
    fn end_display(&mut self);

    fn set_palette(&mut self, index: usize);

    /// Copies the current screen contents.
    fn capture_screen(&mut self) -> ScreenBuffer;

    /// Pushes pending changes without a page flip.
    fn update_no_blit(&mut self);

    /// Page flip or blit.
    fn finish_update(&mut self);
}

//=== Drawers =============================================================

/// Drawing collaborators invoked by the presenter.
pub trait Drawers {
    fn intermission(&mut self);
    fn finale(&mut self);

    /// Stretch-draws a named full-screen page.
    fn page(&mut self, name: &str);
    fn credits(&mut self);

    fn hud_erase(&mut self);

    /// Recomputes the view for a pending resize request.
    fn execute_set_view_size(&mut self, current: ViewGeometry) -> ViewGeometry;

    /// Fills the back screen with the border pattern.
    fn fill_back_screen(&mut self);
    fn view_border(&mut self);
    fn player_view(&mut self, player: usize);
    fn automap(&mut self);

    /// `full_status` is set when the status bar is not covered by the view.
    fn status_bar(&mut self, full_status: bool, refresh: bool);
    fn hud(&mut self);

    fn patch_width(&self, name: &str) -> i32;
    fn draw_patch(&mut self, x: i32, y: i32, name: &str);

    /// Interactive menu, drawn on top of everything.
    fn menu(&mut self);
}

//=== FrameTargets ========================================================

/// Collaborators borrowed for one presentation pass.
pub struct FrameTargets<'a> {
    pub surface: &'a mut dyn Surface,
    pub drawers: &'a mut dyn Drawers,
    pub wipe: &'a mut dyn WipeEffect,
    pub clock: &'a mut dyn Clock,
    pub net: &'a mut dyn NetSync,
}

//=== FrameOutcome ========================================================

/// What a presentation pass ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Drawing is globally disabled.
    Suppressed,

    /// The surface was unavailable; nothing was touched.
    Skipped,

    /// Drawn and flipped.
    Presented,

    /// Drawn, then shown through a transition.
    Wiped(TransitionReport),
}

//=== DisplayGuard ========================================================

/// Holds surface access for the duration of a frame.
struct DisplayGuard<'a> {
    surface: &'a mut dyn Surface,
}

impl<'a> DisplayGuard<'a> {
    fn acquire(surface: &'a mut dyn Surface) -> Option<Self> {
        if surface.start_display() {
            Some(Self { surface })
        } else {
            None
        }
    }
}

impl<'a> Deref for DisplayGuard<'a> {
    type Target = dyn Surface + 'a;

    fn deref(&self) -> &Self::Target {
        self.surface
    }
}

impl<'a> DerefMut for DisplayGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.surface
    }
}

impl Drop for DisplayGuard<'_> {
    fn drop(&mut self) {
        self.surface.end_display();
    }
}

//=== Presenter ===========================================================

/// Per-frame presentation state machine.
///
/// Owns the shadow of the last drawn state and the border cache; nothing
/// else writes either.
#[derive(Debug, Clone)]
pub struct Presenter {
    no_draw: bool,
    border: BorderCache,

    /// State the last frame was drawn in; `None` forces a full refresh.
    last_drawn: Option<PresentationState>,

    /// State the screen currently shows; a mismatch triggers a wipe.
    wipe_state: Option<PresentationState>,
}

impl Presenter {
    /// Creates a presenter whose shadow state is the attract screen.
    pub fn new(no_draw: bool) -> Self {
        Self {
            no_draw,
            border: BorderCache::default(),
            last_drawn: None,
            wipe_state: Some(PresentationState::AttractScreen),
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn border_cache(&self) -> BorderCache {
        self.border
    }

    pub fn last_drawn(&self) -> Option<PresentationState> {
        self.last_drawn
    }

    /// Whether drawing `state` now would start a transition.
    pub fn transition_pending(&self, state: PresentationState) -> bool {
        self.wipe_state != Some(state)
    }

    pub fn no_draw(&self) -> bool {
        self.no_draw
    }

    /// Forces a transition on the next frame.
    pub fn force_wipe(&mut self) {
        self.wipe_state = None;
    }

    //--- present_frame() --------------------------------------------------

    /// Draws one frame for the current session state.
    pub fn present_frame(
        &mut self,
        session: &mut EngineSession,
        attract: &AttractSequencer,
        targets: FrameTargets<'_>,
    ) -> FrameOutcome {
        if self.no_draw {
            return FrameOutcome::Suppressed;
        }

        let FrameTargets {
            surface,
            drawers,
            wipe,
            clock,
            net,
        } = targets;

        let Some(mut display) = DisplayGuard::acquire(surface) else {
            trace!(target: "present", "surface busy, frame skipped");
            return FrameOutcome::Skipped;
        };

        let state = session.game_state;
        let wiping = self.transition_pending(state);
        let before = wiping.then(|| display.capture_screen());

        let mut is_border = false;

        if state != PresentationState::InLevel {
            if matches!(self.last_drawn, None | Some(PresentationState::InLevel)) {
                display.set_palette(0);
            }

            match state {
                PresentationState::Intermission => drawers.intermission(),
                PresentationState::Finale => drawers.finale(),
                PresentationState::AttractScreen => attract.draw_page(drawers),
                PresentationState::InLevel => {}
            }
        } else if session.gametic != session.basetic {
            is_border = self.draw_level(session, drawers);
        }

        self.border.was_border_visible = is_border;
        self.last_drawn = Some(state);
        self.wipe_state = Some(state);

        if session.paused {
            let x = (BASE_WIDTH - drawers.patch_width(PAUSE_PATCH)) / 2;
            drawers.draw_patch(x, PAUSE_Y, PAUSE_PATCH);
        }

        drawers.menu();
        net.net_update(session);

        let outcome = match before {
            None => {
                display.finish_update();
                FrameOutcome::Presented
            }
            Some(source) => {
                let target = display.capture_screen();
                debug!(target: "present", "wiping into {:?}", state);
                let session_wipe = WipeSession::begin(source, target, clock);
                FrameOutcome::Wiped(run_transition(session_wipe, wipe, &mut *display, drawers, clock))
            }
        };

        drop(display);

        if session.paused {
            clock.sleep_micros(PAUSE_SLEEP_MICROS);
        }

        outcome
    }

    //--- Internal Helpers -------------------------------------------------

    /// Draws the in-level layers and returns whether a border is showing.
    fn draw_level(&mut self, session: &mut EngineSession, drawers: &mut dyn Drawers) -> bool {
        drawers.hud_erase();

        if session.set_size_needed {
            session.view = drawers.execute_set_view_size(session.view);
            session.set_size_needed = false;
            self.last_drawn = None;
        }

        let automap = session.automap;
        let view = session.view;
        let help = session.in_help_screens;

        let view_active = (!automap.active || automap.overlay) && !help;
        let is_border = if view_active {
            !view.is_full_height()
        } else {
            !help && automap.active
        };

        let redraw_border = if self.last_drawn != Some(PresentationState::InLevel) {
            drawers.fill_back_screen();
            is_border
        } else {
            let redraw = is_border
                && (!self.border.was_border_visible || self.border.may_need_redraw_next_frame);
            self.border.may_need_redraw_next_frame =
                session.menu_active && is_border && view_active && !view.is_full_width();
            redraw
        };

        if redraw_border {
            drawers.view_border();
        }

        if view_active {
            drawers.player_view(session.display_player);
        }
        if automap.active {
            drawers.automap();
        }

        let full_status = !view.is_full_height() || (automap.active && !automap.overlay);
        drawers.status_bar(full_status, redraw_border);
        drawers.view_border();
        drawers.hud();

        is_border
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(false)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
