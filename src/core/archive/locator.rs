//=========================================================================
// Archive Locator
//=========================================================================
//
// Finds archives on disk.
//
// Search order for a bare name:
//   1. current directory
//   2. executable directory
//   3. $DOOMWADDIR
//   4. $HOME
//
// An explicit master name may be:
//   - a path to an existing file (extension optional)
//   - a directory, which must contain one of the standard names
//   - a bare name, searched for in the locations above
//
//=========================================================================

//=== External Dependencies ===============================================

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::registry::with_default_extension;
use crate::core::error::{EngineError, EngineResult};

//=== Constants ==========================================================

/// Well-known master archive names, tried in this order.
pub const STANDARD_MASTER_NAMES: [&str; 8] = [
    "doom2f.wad",
    "doom2.wad",
    "plutonia.wad",
    "tnt.wad",
    "doom.wad",
    "doom1.wad",
    "doomu.wad",
    "freedoom.wad",
];

/// Extension implied for archive names.
pub const ARCHIVE_EXTENSION: &str = "wad";

/// Environment variable naming an extra archive directory.
pub const ARCHIVE_DIR_ENV: &str = "DOOMWADDIR";

//=== SearchPaths =========================================================

/// Ordered list of directories searched for bare archive names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Uses exactly the given directories, in order.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Current dir, executable dir, `$DOOMWADDIR`, `$HOME`.
    ///
    /// Locations that cannot be determined are skipped.
    pub fn from_environment() -> Self {
        let mut dirs = Vec::with_capacity(4);

        if let Ok(cwd) = env::current_dir() {
            dirs.push(cwd);
        }
        if let Some(exe_dir) = executable_dir() {
            dirs.push(exe_dir);
        }
        if let Some(dir) = env::var_os(ARCHIVE_DIR_ENV) {
            dirs.push(PathBuf::from(dir));
        }
        if let Some(home) = env::var_os("HOME") {
            dirs.push(PathBuf::from(home));
        }

        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Finds `name` (or `name.ext`) in the first location that has it.
    ///
    /// Absolute names are checked as-is before the search locations.
    pub fn find_file(&self, name: &str, ext: &str) -> Option<PathBuf> {
        let bare = Path::new(name);
        if bare.is_absolute() {
            return existing_file(bare, ext);
        }

        self.dirs.iter().find_map(|dir| existing_file(&dir.join(bare), ext))
    }
}

//=== Master Archive Lookup ===============================================

/// Resolves the master archive path.
///
/// An explicit name is honored first; without one, each standard name is
/// tried across all search locations. Failure is fatal for startup.
pub fn locate_master_archive(explicit: Option<&str>, search: &SearchPaths) -> EngineResult<PathBuf> {
    let found = match explicit {
        Some(name) => locate_explicit(name, search),
        None => STANDARD_MASTER_NAMES
            .iter()
            .find_map(|name| search.find_file(name, ARCHIVE_EXTENSION)),
    };

    match found {
        Some(path) => {
            info!(target: "archive", "Master archive found: {}", path.display());
            Ok(path)
        }
        None => Err(EngineError::MasterArchiveNotFound {
            searched: match explicit {
                Some(name) => name.to_string(),
                None => STANDARD_MASTER_NAMES.join(", "),
            },
        }),
    }
}

fn locate_explicit(name: &str, search: &SearchPaths) -> Option<PathBuf> {
    let literal = Path::new(name);

    if literal.is_dir() {
        debug!(target: "archive", "Searching directory {} for a master archive", name);
        return STANDARD_MASTER_NAMES
            .iter()
            .find_map(|standard| existing_file(&literal.join(standard), ""));
    }

    existing_file(literal, ARCHIVE_EXTENSION).or_else(|| search.find_file(name, ARCHIVE_EXTENSION))
}

//--- Internal Helpers ----------------------------------------------------

fn existing_file(path: &Path, ext: &str) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    if ext.is_empty() {
        return None;
    }
    let extended = with_default_extension(path, ext);
    (extended != path && extended.is_file()).then_some(extended)
}

pub(crate) fn executable_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

//=========================================================================
// Unit Tests
//=========================================================================
