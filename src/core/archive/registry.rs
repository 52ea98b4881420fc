//=========================================================================
// Archive Registry
//=========================================================================
//
// Ordered list of archives to load.
//
// Order is resolution precedence: later entries override same-named
// resources from earlier ones. Entries are only appended, never moved
// or removed, and the list is frozen once startup hands it to the
// session.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, EngineResult};

//=== Constants ==========================================================

/// Maximum number of archives a session can register.
pub const MAX_ARCHIVES: usize = 32;

//=== ArchiveOrigin =======================================================

/// Where a registered archive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveOrigin {
    /// The master archive located at startup.
    Master,

    /// An archive the engine loads on its own.
    Autoload,

    /// An archive named by the user.
    User,

    /// A recorded session file added as a single resource.
    DemoLump,
}

impl ArchiveOrigin {
    /// Extension implied when a registered name has none.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::DemoLump => "lmp",
            _ => "wad",
        }
    }
}

//=== ArchiveEntry ========================================================

/// One registered archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    path: PathBuf,
    origin: ArchiveOrigin,
}

impl ArchiveEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> ArchiveOrigin {
        self.origin
    }
}

//=== ArchiveList =========================================================

/// Append-only, bounded sequence of archives.
#[derive(Debug, Clone)]
pub struct ArchiveList {
    entries: Vec<ArchiveEntry>,
    capacity: usize,
}

impl ArchiveList {
    /// Creates an empty list bounded by [`MAX_ARCHIVES`].
    pub fn new() -> Self {
        Self::with_capacity(MAX_ARCHIVES)
    }

    /// Creates an empty list with a custom bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an archive, adding the origin's default extension if the
    /// path has none.
    ///
    /// Fails without modifying the list when it is already full.
    pub fn register(&mut self, path: impl AsRef<Path>, origin: ArchiveOrigin) -> EngineResult<&ArchiveEntry> {
        if self.entries.len() >= self.capacity {
            return Err(EngineError::ArchiveCapacity {
                capacity: self.capacity,
            });
        }

        let path = with_default_extension(path.as_ref(), origin.default_extension());
        debug!(target: "archive", "Registering {:?} archive {}", origin, path.display());

        self.entries.push(ArchiveEntry { path, origin });
        Ok(&self.entries[self.entries.len() - 1])
    }

    //--- Query API --------------------------------------------------------

    pub fn iter(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&ArchiveEntry> {
        self.entries.get(index)
    }

    /// The first registered master archive, if any.
    pub fn master(&self) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.origin == ArchiveOrigin::Master)
    }
}

impl Default for ArchiveList {
    fn default() -> Self {
        Self::new()
    }
}

//--- Internal Helpers ----------------------------------------------------

/// Appends `.ext` when the file name carries no extension.
pub(crate) fn with_default_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().is_some() || ext.is_empty() {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".");
        raw.push(ext);
        PathBuf::from(raw)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
