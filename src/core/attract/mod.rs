//=========================================================================
// Attract-Mode Sequencer
//=========================================================================
//
// Cycles title pages, credits and demo playback while no game runs.
//
// Architecture:
// ```text
//   SEQUENCE_TABLE[step][mode column]   (fixed data)
//         │
//   advance() ── cursor + 1 ── End? ── wrap to 0
//         │
//         └─ match SequenceAction { title, alt title, demo, background }
//
//   page_ticker() ── hold expired ──► session.advance_demo = true
//   draw_page()   ── background name ? page(name) : credits()
// ```
//
// The advance requested by the page ticker is carried out by the
// scheduler at the start of the next tic.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::globals::{EngineSession, GameAction, GameLifecycle, GameMode};
use crate::core::presentation::{Drawers, PresentationState};
use crate::core::scheduler::Audio;
use crate::core::TICRATE;

//=== Constants ==========================================================

/// Default hold time for a page.
pub const PAGE_TICS: i32 = TICRATE as i32 * 11;

/// Hold time of the primary title screen.
pub const TITLE_TICS: i32 = TICRATE as i32 * 170 / 35;

const TITLE_PAGE: &str = "TITLEPIC";
const CREDIT_PAGE: &str = "CREDIT";

//=== Music ===============================================================

/// Background tracks started by the title screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Music {
    Intro,
    Doom2Title,
}

//=== SequenceAction ======================================================

/// One cell of the attract table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceAction {
    /// Title page with the intro track and the long hold.
    ShowTitle(&'static str),

    /// Title page with the alternate track; hold time unchanged.
    ShowAltTitle(&'static str),

    PlayDemo(&'static str),

    /// Sets or clears the background page.
    SetBackground(Option<&'static str>),

    /// No action for this mode; the cursor wraps.
    End,
}

use SequenceAction::{End, PlayDemo, SetBackground, ShowAltTitle, ShowTitle};

//=== SEQUENCE_TABLE ======================================================

/// Columns: shareware, registered, commercial, retail.
pub const SEQUENCE_TABLE: [[SequenceAction; 4]; 9] = [
    [
        ShowTitle(TITLE_PAGE),
        ShowTitle(TITLE_PAGE),
        ShowAltTitle(TITLE_PAGE),
        ShowTitle(TITLE_PAGE),
    ],
    [PlayDemo("demo1"); 4],
    [SetBackground(None); 4],
    [PlayDemo("demo2"); 4],
    [
        SetBackground(None),
        SetBackground(None),
        SetBackground(Some(CREDIT_PAGE)),
        ShowTitle(TITLE_PAGE),
    ],
    [PlayDemo("demo3"); 4],
    [End, End, End, SetBackground(Some(CREDIT_PAGE))],
    [End, End, End, PlayDemo("demo4")],
    [End; 4],
];

/// Table column for `mode`.
///
/// Undetermined installs use the generic first column.
pub fn mode_column(mode: GameMode) -> usize {
    match mode {
        GameMode::Shareware | GameMode::Undetermined => 0,
        GameMode::Registered => 1,
        GameMode::Commercial => 2,
        GameMode::Retail => 3,
    }
}

/// Action at `step` for `mode`; out-of-range steps read as [`End`].
pub fn action_at(step: usize, mode: GameMode) -> SequenceAction {
    SEQUENCE_TABLE
        .get(step)
        .map(|row| row[mode_column(mode)])
        .unwrap_or(End)
}

//=== AttractSequencer ====================================================

/// Cursor and page state of the attract loop.
#[derive(Debug, Clone)]
pub struct AttractSequencer {
    /// `None` means "before the first row".
    cursor: Option<usize>,
    page_tics: i32,
    background: Option<&'static str>,
}

impl AttractSequencer {
    pub fn new() -> Self {
        Self {
            cursor: None,
            page_tics: 0,
            background: None,
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn page_tics(&self) -> i32 {
        self.page_tics
    }

    pub fn background(&self) -> Option<&'static str> {
        self.background
    }

    //--- Sequencing -------------------------------------------------------

    /// Moves to the next row and performs its action.
    pub fn advance(
        &mut self,
        session: &mut EngineSession,
        audio: &mut dyn Audio,
        lifecycle: &mut dyn GameLifecycle,
    ) {
        lifecycle.mark_console_player_live(session);
        session.advance_demo = false;
        session.user_game = false;
        session.paused = false;
        session.game_action = GameAction::Nothing;

        self.page_tics = PAGE_TICS;
        session.game_state = PresentationState::AttractScreen;

        let mode = session.game_mode();
        let step = if session.net_game && !session.demo_playback {
            0
        } else {
            let next = self.cursor.map_or(0, |c| c + 1);
            if action_at(next, mode) == End {
                0
            } else {
                next
            }
        };
        self.cursor = Some(step);

        let action = action_at(step, mode);
        debug!(target: "attract", "step {} → {:?}", step, action);

        match action {
            ShowTitle(name) => {
                audio.start_music(Music::Intro);
                self.page_tics = TITLE_TICS;
                self.background = Some(name);
            }
            ShowAltTitle(name) => {
                audio.start_music(Music::Doom2Title);
                self.background = Some(name);
            }
            PlayDemo(name) => lifecycle.deferred_play_demo(session, name),
            SetBackground(name) => self.background = name,
            End => {}
        }
    }

    /// Restarts the loop from the first row on the next tic.
    pub fn start_title(&mut self, session: &mut EngineSession) {
        session.game_action = GameAction::Nothing;
        self.cursor = None;
        self.request_advance(session);
    }

    /// Asks the scheduler to advance at the next tic boundary.
    pub fn request_advance(&self, session: &mut EngineSession) {
        session.advance_demo = true;
    }

    /// Counts down the page hold; requests an advance once it runs out.
    pub fn page_ticker(&mut self, session: &mut EngineSession) {
        self.page_tics -= 1;
        if self.page_tics < 0 {
            self.request_advance(session);
        }
    }

    /// Draws the background page, or the credits if none is set.
    pub fn draw_page(&self, drawers: &mut dyn Drawers) {
        match self.background {
            Some(name) => drawers.page(name),
            None => drawers.credits(),
        }
    }
}

impl Default for AttractSequencer {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
