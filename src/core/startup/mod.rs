//=========================================================================
// Startup
//=========================================================================
//
// One-time discovery and registration that precedes the first frame.
//
// Architecture:
// ```text
//   resolve_save_dir()
//   locate_master_archive() ─► identify_version() ─► register (master)
//   support archive          ─► register (autoload)
//   resolve_patch() × deh    ─► GameLifecycle::apply_patch
//   files                    ─► register (user), modified game
//   demo lump                ─► register (demo-lump)
//   LumpIndex::build()       ─► embedded patch lump
//   plan_start()
// ```
//
// Every failure here is fatal and propagates to the host.
//
//=========================================================================

//=== Module Declarations =================================================

mod first_map;
mod plan;

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::archive::{
    executable_dir, locate_master_archive, validate_and_classify, with_default_extension,
    ArchiveList, ArchiveOrigin, LumpIndex, SearchPaths, ARCHIVE_EXTENSION,
};
use crate::core::config::LaunchOptions;
use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::{EngineSession, GameFlags, GameIdentity, GameLifecycle, GameMode};

//=== Public API ==========================================================

pub use first_map::{first_map, FirstMap};
pub use plan::{plan_start, DemoMode, DemoRequest, StartAction, StartPlan};

//=== Constants ==========================================================

/// Support archive the engine ships with.
pub const SUPPORT_ARCHIVE: &str = "prboom.wad";

/// Lump holding a patch embedded in the loaded archives.
pub const EMBEDDED_PATCH_LUMP: &str = "DEHACKED";

const PATCH_EXTENSIONS: [&str; 2] = ["bex", "deh"];
const DEMO_EXTENSION: &str = "lmp";

//=== StartupSettings =====================================================

/// Inputs to [`prepare`].
#[derive(Debug, Clone, Copy)]
pub struct StartupSettings<'a> {
    pub options: &'a LaunchOptions,
    pub search: &'a SearchPaths,
    pub archive_capacity: usize,
    /// `None` skips the support archive.
    pub support_archive: Option<&'a str>,
}

//=== Startup =============================================================

/// A ready session plus the plan for its first moments.
#[derive(Debug)]
pub struct Startup {
    pub session: EngineSession,
    pub plan: StartPlan,
}

//=== prepare() ===========================================================

/// Runs discovery, registration and planning in startup order.
pub fn prepare(settings: StartupSettings<'_>, lifecycle: &mut dyn GameLifecycle) -> EngineResult<Startup> {
    let options = settings.options;
    let search = settings.search;

    let save_dir = resolve_save_dir(options.save_dir.as_deref());

    //--- Master archive ---------------------------------------------------
    let master = locate_master_archive(options.iwad.as_deref(), search)?;
    let identity = identify_version(&master)?;

    let mut archives = ArchiveList::with_capacity(settings.archive_capacity);
    archives.register(&master, ArchiveOrigin::Master)?;

    //--- Support archive --------------------------------------------------
    if let Some(name) = settings.support_archive {
        let path = search
            .find_file(name, "")
            .ok_or_else(|| EngineError::SupportArchiveNotFound { name: name.to_string() })?;
        archives.register(path, ArchiveOrigin::Autoload)?;
    }

    //--- Patches ----------------------------------------------------------
    for name in &options.deh {
        let path = resolve_patch(name)?;
        info!("Applying patch {}", path.display());
        lifecycle.apply_patch(&path)?;
    }

    //--- User archives ----------------------------------------------------
    let modified_game = !options.files.is_empty();
    for name in &options.files {
        let path = resolve_supplemental(name, ARCHIVE_EXTENSION, search)?;
        archives.register(path, ArchiveOrigin::User)?;
    }

    //--- Demo lump --------------------------------------------------------
    if let Some(name) = options.demo_name() {
        let path = resolve_supplemental(name, DEMO_EXTENSION, search)?;
        archives.register(path, ArchiveOrigin::DemoLump)?;
    }

    //--- Lump index -------------------------------------------------------
    let lumps = LumpIndex::build(&archives)?;
    if !options.no_deh && lumps.contains(EMBEDDED_PATCH_LUMP) {
        info!("Applying embedded {} lump", EMBEDDED_PATCH_LUMP);
        lifecycle.apply_embedded_patch()?;
    }

    let plan = plan_start(options, identity.mode, &lumps);

    //--- Session ----------------------------------------------------------
    let flags = game_flags(options);
    if options.turbo.is_some() {
        info!("turbo scale: {}%", flags.turbo_scale);
    }

    let mut session = EngineSession::new(identity, archives, lumps, save_dir);
    session.flags = flags;
    session.net_game = options.net_game;
    session.modified_game = modified_game;
    if let Some(map) = options.ffmap.filter(|_| plan.demo.is_some()) {
        session.pending_warp = Some(map);
    }

    Ok(Startup { session, plan })
}

//=== Startup Steps =======================================================

/// Classifies the master archive and derives the full game identity.
pub fn identify_version(master: &Path) -> EngineResult<GameIdentity> {
    let class = validate_and_classify(master)?;
    let mut identity = GameIdentity::refine(class.mode, class.has_secret_levels, master);
    identity.master_kind = Some(class.kind);

    if identity.mode == GameMode::Undetermined {
        warn!(target: "archive", "Unknown Game Version, may not work");
    }
    info!("{}", identity.title());

    Ok(identity)
}

/// Uses `requested` if it is a directory, else the executable directory.
pub fn resolve_save_dir(requested: Option<&Path>) -> PathBuf {
    let fallback = executable_dir().unwrap_or_else(|| PathBuf::from("."));

    let dir = match requested {
        Some(dir) if dir.is_dir() => dir.to_path_buf(),
        Some(dir) => {
            warn!("Save path {} does not exist", dir.display());
            fallback
        }
        None => fallback,
    };

    info!("Save path set to: {}", dir.display());
    dir
}

/// Finds a patch file, preferring `.bex` over `.deh`.
pub fn resolve_patch(name: &str) -> EngineResult<PathBuf> {
    PATCH_EXTENSIONS
        .iter()
        .map(|ext| with_default_extension(Path::new(name), ext))
        .find(|path| path.is_file())
        .ok_or_else(|| EngineError::PatchNotFound { name: name.to_string() })
}

fn resolve_supplemental(name: &str, ext: &str, search: &SearchPaths) -> EngineResult<PathBuf> {
    let literal = with_default_extension(Path::new(name), ext);
    if literal.is_file() {
        return Ok(literal);
    }
    search
        .find_file(name, ext)
        .ok_or_else(|| EngineError::SupplementalNotFound { name: name.to_string() })
}

fn game_flags(options: &LaunchOptions) -> GameFlags {
    GameFlags {
        no_monsters: options.no_monsters,
        respawn: options.respawn,
        fast: options.fast,
        deathmatch: options.deathmatch.min(2),
        no_music: options.music_disabled(),
        no_sfx: options.sfx_disabled(),
        turbo_scale: options.turbo_scale(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
