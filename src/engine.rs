//=========================================================================
// Tic Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Main Loop]
//         │              │            │
//         ├─ with_options()  startup    └─ FrameScheduler::iterate()
//         ├─ with_search_paths()          until exit or fatal error
//         ├─ with_archive_capacity()
//         ├─ with_support_archive()
//         └─ with_channel_capacity()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Sender};
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::archive::{SearchPaths, MAX_ARCHIVES};
use crate::core::config::LaunchOptions;
use crate::core::error::EngineResult;
use crate::core::globals::{Collaborators, EngineSession};
use crate::core::platform_bridge::{EventCollector, PlatformEvent};
use crate::core::presentation::Presenter;
use crate::core::scheduler::{FrameScheduler, LoopControl, TicPolicy};
use crate::core::startup::{self, StartPlan, Startup, StartupSettings, SUPPORT_ARCHIVE};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// Provides a fluent API for setting launch parameters before startup.
/// Startup itself (archive discovery, classification and the start plan)
/// runs inside [`EngineBuilder::build`].
///
/// # Default Values
///
/// - **Options**: [`LaunchOptions::default`]
/// - **Search paths**: [`SearchPaths::from_environment`]
/// - **Archive capacity**: [`MAX_ARCHIVES`]
/// - **Support archive**: `prboom.wad`
/// - **Channel capacity**: 128 posted events
///
/// # Examples
///
/// ```no_run
/// # fn host() -> tic_engine::core::globals::Collaborators { unimplemented!() }
/// use tic_engine::prelude::*;
///
/// let options = LaunchOptions::from_toml_file("launch.toml")?;
/// let engine = EngineBuilder::new()
///     .with_options(options)
///     .build(host())?;
/// engine.run()?;
/// # Ok::<(), tic_engine::core::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    options: LaunchOptions,
    search: Option<SearchPaths>,
    archive_capacity: usize,
    support_archive: Option<String>,
    channel_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            options: LaunchOptions::default(),
            search: None,
            archive_capacity: MAX_ARCHIVES,
            support_archive: Some(SUPPORT_ARCHIVE.to_string()),
            channel_capacity: 128,
        }
    }

    /// Sets the launch options.
    pub fn with_options(mut self, options: LaunchOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the environment-derived archive search locations.
    pub fn with_search_paths(mut self, search: SearchPaths) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the maximum number of registered archives.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`; the master archive needs a slot.
    pub fn with_archive_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Archive capacity must be positive");
        self.archive_capacity = capacity;
        self
    }

    /// Names the engine's support archive, or `None` to skip it.
    pub fn with_support_archive(mut self, name: Option<&str>) -> Self {
        self.support_archive = name.map(str::to_string);
        self
    }

    /// Sets the channel capacity for posted input events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Runs startup and builds the engine around `collaborators`.
    ///
    /// Any fatal startup condition is returned as an error; the host is
    /// expected to report it and exit.
    pub fn build(self, mut collaborators: Collaborators) -> EngineResult<Engine> {
        info!(
            "Building engine (archives: {}, channel: {})",
            self.archive_capacity, self.channel_capacity
        );

        let search = self.search.unwrap_or_else(SearchPaths::from_environment);
        let Startup { mut session, plan } = startup::prepare(
            StartupSettings {
                options: &self.options,
                search: &search,
                archive_capacity: self.archive_capacity,
                support_archive: self.support_archive.as_deref(),
            },
            collaborators.lifecycle.as_mut(),
        )?;

        let policy = if self.options.single_tics || plan.forces_single_tics() {
            TicPolicy::Single
        } else {
            TicPolicy::Adaptive
        };

        let (sender, receiver) = bounded(self.channel_capacity);
        let mut scheduler = FrameScheduler::new(
            policy,
            self.options.smooth_motion,
            Presenter::new(self.options.no_draw),
            EventCollector::new(receiver),
        );

        plan.execute(&mut session, collaborators.lifecycle.as_mut(), scheduler.attract_mut());
        info!("Start plan: {:?}", plan.action);

        Ok(Engine {
            session,
            scheduler,
            collaborators,
            plan,
            sender,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Tic engine runtime.
///
/// Owns the session, the scheduler and the host collaborators. Create via
/// [`EngineBuilder`].
///
/// # Architecture
///
/// ```text
/// Engine (single thread)
///   ├─► FrameScheduler
///   │     ├─► Simulation tics (Single | Adaptive)
///   │     ├─► AttractSequencer
///   │     └─► Presenter ─► Wipe
///   │
///   └─► Posted events (crossbeam channel) ─► responder chain
/// ```
pub struct Engine {
    session: EngineSession,
    scheduler: FrameScheduler,
    collaborators: Collaborators,
    plan: StartPlan,
    sender: Sender<PlatformEvent>,
}

impl Engine {
    //--- Query API --------------------------------------------------------

    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EngineSession {
        &mut self.session
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// The plan startup chose for the first session.
    pub fn plan(&self) -> &StartPlan {
        &self.plan
    }

    /// Sender for posting input events from the host.
    pub fn event_sender(&self) -> Sender<PlatformEvent> {
        self.sender.clone()
    }

    //--- Control ----------------------------------------------------------

    /// Returns to the attract loop from its first row.
    pub fn start_title(&mut self) {
        self.scheduler.attract_mut().start_title(&mut self.session);
    }

    /// Makes the next presented frame a wipe.
    pub fn force_wipe(&mut self) {
        self.scheduler.presenter_mut().force_wipe();
    }

    //--- Execution --------------------------------------------------------

    /// Runs a single loop iteration.
    pub fn step(&mut self) -> EngineResult<LoopControl> {
        self.scheduler.iterate(&mut self.session, &mut self.collaborators)
    }

    /// Runs the main loop until exit is signalled or a fatal error occurs.
    pub fn run(mut self) -> EngineResult<()> {
        info!("Starting engine runtime");
        self.scheduler.run(&mut self.session, &mut self.collaborators)?;
        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
