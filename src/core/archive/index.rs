//=========================================================================
// Lump Index
//=========================================================================
//
// Name → origin lookup over every registered archive.
//
// Built once after registration. Archives are scanned in list order so a
// later archive's entry replaces an earlier one of the same name, which
// is exactly the precedence the loader applies.
//
// Files without the archive extension contribute a single entry named
// after their file stem (e.g. a recorded demo).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

//=== Internal Dependencies ===============================================

use super::header::{read_directory, ArchiveHeader, DirectoryEntry, NAME_LEN};
use super::registry::{ArchiveList, ArchiveOrigin};
use super::ARCHIVE_EXTENSION;
use crate::core::error::{EngineError, EngineResult};

//=== LumpIndex ===========================================================

/// Resolves resource names to the archive origin that provides them.
#[derive(Debug, Clone, Default)]
pub struct LumpIndex {
    origins: HashMap<String, ArchiveOrigin>,
}

impl LumpIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans every archive in `archives`, in order.
    pub fn build(archives: &ArchiveList) -> EngineResult<Self> {
        let mut index = Self::new();
        for entry in archives.iter() {
            index.add_file(entry.path(), entry.origin())?;
        }
        debug!(target: "archive", "Lump index holds {} names", index.origins.len());
        Ok(index)
    }

    /// Adds the entries of one file.
    pub fn add_file(&mut self, path: &Path, origin: ArchiveOrigin) -> EngineResult<()> {
        let is_archive = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
            .unwrap_or(false);

        if !is_archive {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stem: String = stem.chars().take(NAME_LEN).collect();
            self.insert(&DirectoryEntry::named(&stem, 0, 0), origin);
            return Ok(());
        }

        let file = File::open(path).map_err(|source| EngineError::ArchiveOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let header = ArchiveHeader::read_from(&mut reader, path)?;
        for entry in read_directory(&mut reader, &header, path)? {
            self.insert(&entry, origin);
        }
        Ok(())
    }

    /// Records a single entry, replacing any earlier provider.
    pub fn insert(&mut self, entry: &DirectoryEntry, origin: ArchiveOrigin) {
        self.origins.insert(entry.name(), origin);
    }

    /// Origin of the archive that provides `name` (case-insensitive).
    pub fn origin_of(&self, name: &str) -> Option<ArchiveOrigin> {
        self.origins.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.origin_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_archive(path: &Path, names: &[&str]) {
        let mut data = Vec::new();
        data.extend_from_slice(b"PWAD");
        data.extend_from_slice(&(names.len() as u32).to_le_bytes());
        data.extend_from_slice(&12u32.to_le_bytes());
        for name in names {
            let mut raw = [0u8; 8];
            raw[..name.len()].copy_from_slice(name.as_bytes());
            data.extend_from_slice(&[0u8; 8]);
            data.extend_from_slice(&raw);
        }
        fs::write(path, data).unwrap();
    }

    #[test]
    fn later_archive_overrides_earlier() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.wad");
        let user = dir.path().join("user.wad");
        write_archive(&base, &["MAP01", "MAP02"]);
        write_archive(&user, &["MAP02"]);

        let mut list = ArchiveList::new();
        list.register(&base, ArchiveOrigin::Master).unwrap();
        list.register(&user, ArchiveOrigin::User).unwrap();

        let index = LumpIndex::build(&list).unwrap();
        assert_eq!(index.origin_of("map01"), Some(ArchiveOrigin::Master));
        assert_eq!(index.origin_of("MAP02"), Some(ArchiveOrigin::User));
        assert!(!index.contains("MAP03"));
    }

    #[test]
    fn non_archive_file_is_single_entry() {
        let dir = TempDir::new().unwrap();
        let demo = dir.path().join("demo1.lmp");
        fs::write(&demo, b"\x6d").unwrap();

        let mut list = ArchiveList::new();
        list.register(&demo, ArchiveOrigin::DemoLump).unwrap();

        let index = LumpIndex::build(&list).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.origin_of("DEMO1"), Some(ArchiveOrigin::DemoLump));
    }

    #[test]
    fn missing_archive_is_open_error() {
        let mut list = ArchiveList::new();
        list.register("/no/such/file.wad", ArchiveOrigin::User).unwrap();
        assert!(matches!(
            LumpIndex::build(&list).unwrap_err(),
            EngineError::ArchiveOpen { .. }
        ));
    }
}
