//=========================================================================
// Screen Wipe
//=========================================================================
//
// Timed transition between two captured screens.
//
// Architecture:
// ```text
//   Presenter ── before image ──┐
//                               ├─► WipeSession ──► run_transition()
//   Presenter ── after image ───┘                    │
//                                                    ├─ poll Clock (5 ms naps)
//                                                    ├─ WipeEffect::advance(tics)
//                                                    ├─ Surface::update_no_blit()
//                                                    ├─ Drawers::menu()
//                                                    └─ Surface::finish_update()
// ```
//
// The loop is cooperative: it owns the thread until the effect reports
// completion, sleeping between polls so the CPU isn't thrashed. The menu
// is redrawn on every step so it stays live during the transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::trace;

//=== Internal Dependencies ===============================================

use super::{Drawers, Surface};
use crate::core::TICRATE;

//=== Constants ==========================================================

/// Nap between clock polls while waiting for the next tic.
pub const WIPE_POLL_MICROS: u64 = 5_000;

//=== Clock ===============================================================

/// Wall-clock source measured in tics.
pub trait Clock {
    /// Current time in tics since an arbitrary origin.
    fn now_tics(&mut self) -> i64;

    /// Yields the CPU for roughly `micros` microseconds.
    fn sleep_micros(&mut self, micros: u64);
}

/// [`Clock`] backed by [`Instant`] and [`thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_tics(&mut self) -> i64 {
        let micros = self.origin.elapsed().as_micros();
        (micros * u128::from(TICRATE) / 1_000_000) as i64
    }

    fn sleep_micros(&mut self, micros: u64) {
        thread::sleep(Duration::from_micros(micros));
    }
}

//=== ScreenBuffer ========================================================

/// A captured copy of the output surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

//=== WipeEffect ==========================================================

/// Pixel-level transition animation.
pub trait WipeEffect {
    /// Advances the animation by `tics` and composes the in-progress
    /// frame. Returns `true` once the transition has finished.
    fn advance(&mut self, source: &ScreenBuffer, target: &ScreenBuffer, tics: u32) -> bool;
}

//=== WipeSession =========================================================

/// Pre- and post-transition images plus the start timestamp.
#[derive(Debug, Clone)]
pub struct WipeSession {
    started_at: i64,
    source: ScreenBuffer,
    target: ScreenBuffer,
}

impl WipeSession {
    /// Starts a session one tic in the past so the first poll advances
    /// immediately.
    pub fn begin(source: ScreenBuffer, target: ScreenBuffer, clock: &mut dyn Clock) -> Self {
        Self {
            started_at: clock.now_tics() - 1,
            source,
            target,
        }
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn source(&self) -> &ScreenBuffer {
        &self.source
    }

    pub fn target(&self) -> &ScreenBuffer {
        &self.target
    }
}

//=== TransitionReport ====================================================

/// Summary of a completed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionReport {
    /// Display updates shown (one per effect step).
    pub frames: u32,

    /// Tics the effect was advanced by in total.
    pub tics: u32,
}

//=== run_transition() ====================================================

/// Runs a wipe to completion, consuming the session.
pub fn run_transition(
    wipe: WipeSession,
    effect: &mut dyn WipeEffect,
    surface: &mut dyn Surface,
    drawers: &mut dyn Drawers,
    clock: &mut dyn Clock,
) -> TransitionReport {
    let mut report = TransitionReport::default();
    let mut last = wipe.started_at;

    loop {
        let (now, tics) = loop {
            clock.sleep_micros(WIPE_POLL_MICROS);
            let now = clock.now_tics();
            let tics = now - last;
            if tics > 0 {
                break (now, tics as u32);
            }
        };
        last = now;

        let done = effect.advance(&wipe.source, &wipe.target, tics);
        surface.update_no_blit();
        drawers.menu();
        surface.finish_update();

        report.frames += 1;
        report.tics += tics;
        trace!(target: "present", "wipe step: {} tics, done = {}", tics, done);

        if done {
            return report;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
