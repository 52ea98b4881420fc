//=========================================================================
// Engine Errors
//=========================================================================
//
// Fatal conditions raised while bringing the engine up.
//
// None of these are retried. The startup path propagates them with `?`
// and the host binary turns them into a diagnostic plus a non-zero exit.
// Per-frame presentation problems never surface here; they are absorbed
// into a `FrameOutcome` at the frame boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::path::PathBuf;

use thiserror::Error;

//=== EngineError =========================================================

/// Unrecoverable startup and loop errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No master archive could be resolved from the explicit name or the
    /// standard names in any search location.
    #[error("master archive not found (searched: {searched})")]
    MasterArchiveNotFound {
        /// Human-readable list of the names that were tried.
        searched: String,
    },

    /// The master archive could not be opened or read.
    #[error("can't open archive {path}: {source}")]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The 4-byte identification tag is neither "IWAD" nor "PWAD".
    #[error("archive tag not present in {path} (found {found:?})")]
    BadArchiveMagic { path: PathBuf, found: [u8; 4] },

    /// Header or directory is shorter than it claims to be.
    #[error("archive {path} is truncated: {detail}")]
    TruncatedArchive { path: PathBuf, detail: String },

    /// The archive list is already full.
    #[error("can't load more than {capacity} archives")]
    ArchiveCapacity { capacity: usize },

    /// The engine's own support archive is missing.
    #[error("couldn't find support archive {name}")]
    SupportArchiveNotFound { name: String },

    /// An archive named explicitly by the user does not exist.
    #[error("supplemental archive {name} not found")]
    SupplementalNotFound { name: String },

    /// Neither the `.bex` nor the `.deh` form of a patch name exists.
    #[error("cannot find .deh or .bex file named {name}")]
    PatchNotFound { name: String },

    /// The launch file could not be read or parsed.
    #[error("invalid launch configuration: {0}")]
    Config(String),

    /// A collaborator reported an unrecoverable error from inside the loop.
    #[error("{0}")]
    Fatal(String),
}

/// Result alias used throughout the crate.
pub type EngineResult<T> = Result<T, EngineError>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_the_limit() {
        let err = EngineError::ArchiveCapacity { capacity: 32 };
        assert_eq!(err.to_string(), "can't load more than 32 archives");
    }

    #[test]
    fn open_error_keeps_io_source() {
        use std::error::Error as _;

        let err = EngineError::ArchiveOpen {
            path: PathBuf::from("doom2.wad"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("doom2.wad"));
    }
}
