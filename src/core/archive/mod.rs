//=========================================================================
// Resource Archives
//=========================================================================
//
// Discovery, validation and registration of resource archives.
//
// Architecture:
//   locator   → find the master archive on disk
//   header    → binary header + directory decoding
//   classify  → level-name tally → GameMode
//   registry  → ordered, bounded ArchiveList
//   index     → name → origin lookup across registered archives
//
// Runs once at startup. Nothing here is touched per frame.
//
//=========================================================================

//=== Module Declarations =================================================

mod classify;
mod header;
mod index;
mod locator;
mod registry;

//=== Public API ==========================================================

pub use classify::{classify_reader, validate_and_classify, Classification, LevelTally};
pub use header::{
    read_directory, ArchiveHeader, ArchiveKind, DirectoryEntry, ENTRY_SIZE, HEADER_SIZE, NAME_LEN,
};
pub use index::LumpIndex;
pub use locator::{
    locate_master_archive, SearchPaths, ARCHIVE_DIR_ENV, ARCHIVE_EXTENSION, STANDARD_MASTER_NAMES,
};
pub use registry::{ArchiveEntry, ArchiveList, ArchiveOrigin, MAX_ARCHIVES};

pub(crate) use locator::executable_dir;
pub(crate) use registry::with_default_extension;
