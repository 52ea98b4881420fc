//=========================================================================
// Archive Classifier
//=========================================================================
//
// Infers the game mode from the level names in a master archive.
//
// Two naming schemes are tallied:
//   episodic  E{e}M{m}  (exactly four characters)
//   linear    MAP{nn}   (exactly five characters; MAP31/MAP32 are secret)
//
// Thresholds are checked in a fixed priority order:
//   commercial (≥30 linear) > retail (≥9 E4) > registered (≥18 E2+E3)
//   > shareware (≥9 E1) > undetermined
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::header::{read_directory, ArchiveHeader, ArchiveKind, DirectoryEntry, NAME_LEN};
use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::GameMode;

//=== Thresholds ==========================================================

const COMMERCIAL_LEVELS: u32 = 30;
const SECRET_LEVELS: u32 = 2;
const RETAIL_LEVELS: u32 = 9;
const REGISTERED_LEVELS: u32 = 18;
const SHAREWARE_LEVELS: u32 = 9;

//=== LevelTally ==========================================================

/// Per-scheme counts of level-name entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelTally {
    /// Episodic entries indexed by episode - 1.
    pub episodes: [u32; 4],

    /// Linear `MAPnn` entries.
    pub linear: u32,

    /// Linear entries named MAP31 or MAP32.
    pub secret: u32,
}

impl LevelTally {
    /// Tallies every entry of a directory.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a DirectoryEntry>,
    {
        let mut tally = Self::default();
        for entry in entries {
            tally.record(entry.raw_name());
        }
        tally
    }

    /// Counts one normalized name.
    pub fn record(&mut self, name: &[u8; NAME_LEN]) {
        if name[0] == b'E' && name[2] == b'M' && name[4] == 0 {
            match name[1] {
                b'1' => self.episodes[0] += 1,
                b'2' => self.episodes[1] += 1,
                b'3' => self.episodes[2] += 1,
                b'4' => self.episodes[3] += 1,
                _ => {}
            }
        } else if &name[..3] == b"MAP" && name[5] == 0 {
            self.linear += 1;
            if name[3] == b'3' && (name[4] == b'1' || name[4] == b'2') {
                self.secret += 1;
            }
        }
    }

    /// Applies the thresholds in priority order.
    ///
    /// Returns the mode and whether the secret-level pair is present. The
    /// secret flag is only ever set for commercial archives.
    pub fn game_mode(&self) -> (GameMode, bool) {
        if self.linear >= COMMERCIAL_LEVELS {
            (GameMode::Commercial, self.secret >= SECRET_LEVELS)
        } else if self.episodes[3] >= RETAIL_LEVELS {
            (GameMode::Retail, false)
        } else if self.episodes[1] + self.episodes[2] >= REGISTERED_LEVELS {
            (GameMode::Registered, false)
        } else if self.episodes[0] >= SHAREWARE_LEVELS {
            (GameMode::Shareware, false)
        } else {
            (GameMode::Undetermined, false)
        }
    }
}

//=== Classification ======================================================

/// Result of validating and classifying a master archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub mode: GameMode,
    pub has_secret_levels: bool,
    pub kind: ArchiveKind,
    pub tally: LevelTally,
}

/// Opens `path`, validates its header and classifies its directory.
pub fn validate_and_classify(path: &Path) -> EngineResult<Classification> {
    let file = File::open(path).map_err(|source| EngineError::ArchiveOpen {
        path: path.to_path_buf(),
        source,
    })?;
    classify_reader(&mut BufReader::new(file), path)
}

/// Validates and classifies an already-open archive.
pub fn classify_reader<R: Read + Seek>(reader: &mut R, path: &Path) -> EngineResult<Classification> {
    let header = ArchiveHeader::read_from(reader, path)?;
    if header.kind == ArchiveKind::Pwad {
        warn!(target: "archive", "{} is a patch archive used as master", path.display());
    }

    let entries = read_directory(reader, &header, path)?;
    let tally = LevelTally::from_entries(&entries);
    let (mode, has_secret_levels) = tally.game_mode();

    debug!(
        target: "archive",
        "{}: {} entries, tally {:?} -> {:?}",
        path.display(),
        entries.len(),
        tally,
        mode
    );

    Ok(Classification {
        mode,
        has_secret_levels,
        kind: header.kind,
        tally,
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
