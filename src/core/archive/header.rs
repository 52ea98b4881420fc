//=========================================================================
// Archive Header & Directory
//=========================================================================
//
// Binary layout of a resource archive.
//
// Layout (all integers little-endian):
// ```text
//   offset 0   [u8; 4]  identification ("IWAD" | "PWAD")
//   offset 4   u32      entry count
//   offset 8   u32      directory offset
//
//   directory: entry count × 16-byte rows
//     u32 data offset | u32 data length | [u8; 8] name
// ```
//
// Names are space- or NUL-padded and compared case-insensitively, so
// they are normalized to upper-case with padding folded to NUL on read.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, EngineResult};

//=== Constants ==========================================================

/// Size of the fixed archive header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Size of one directory row in bytes.
pub const ENTRY_SIZE: usize = 16;

/// Width of the fixed name field.
pub const NAME_LEN: usize = 8;

//=== ArchiveKind =========================================================

/// Which identification tag the archive carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// Internal (master) archive.
    Iwad,

    /// Patch archive.
    Pwad,
}

impl ArchiveKind {
    fn from_tag(tag: &[u8; 4]) -> Option<Self> {
        match tag {
            b"IWAD" => Some(Self::Iwad),
            b"PWAD" => Some(Self::Pwad),
            _ => None,
        }
    }
}

//=== ArchiveHeader =======================================================

/// Decoded archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub kind: ArchiveKind,
    pub entry_count: u32,
    pub directory_offset: u32,
}

impl ArchiveHeader {
    /// Decodes a header, rejecting unknown identification tags.
    pub fn parse(bytes: &[u8; HEADER_SIZE], path: &Path) -> EngineResult<Self> {
        let tag = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let kind = ArchiveKind::from_tag(&tag).ok_or_else(|| EngineError::BadArchiveMagic {
            path: path.to_path_buf(),
            found: tag,
        })?;

        Ok(Self {
            kind,
            entry_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            directory_offset: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    /// Reads and decodes the header from the start of `reader`.
    pub fn read_from<R: Read + Seek>(reader: &mut R, path: &Path) -> EngineResult<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|source| open_error(path, source))?;
        read_exact_or_truncated(reader, &mut bytes, path, "header")?;
        Self::parse(&bytes, path)
    }
}

//=== DirectoryEntry ======================================================

/// One row of the archive directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub offset: u32,
    pub size: u32,
    name: [u8; NAME_LEN],
}

impl DirectoryEntry {
    /// Decodes a directory row and normalizes its name.
    pub fn parse(bytes: &[u8; ENTRY_SIZE]) -> Self {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&bytes[8..16]);

        Self {
            offset: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            name: normalize_name(name),
        }
    }

    /// Builds an entry from a textual name (used for synthetic lumps).
    pub fn named(name: &str, offset: u32, size: u32) -> Self {
        let mut raw = [0u8; NAME_LEN];
        for (slot, byte) in raw.iter_mut().zip(name.bytes()) {
            *slot = byte;
        }
        Self {
            offset,
            size,
            name: normalize_name(raw),
        }
    }

    /// Normalized name bytes: upper-case, NUL-padded.
    pub fn raw_name(&self) -> &[u8; NAME_LEN] {
        &self.name
    }

    /// Normalized name as a string, padding removed.
    pub fn name(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }
}

//=== Directory Reading ===================================================

/// Reads the full directory described by `header`.
pub fn read_directory<R: Read + Seek>(
    reader: &mut R,
    header: &ArchiveHeader,
    path: &Path,
) -> EngineResult<Vec<DirectoryEntry>> {
    reader
        .seek(SeekFrom::Start(u64::from(header.directory_offset)))
        .map_err(|source| open_error(path, source))?;

    let count = header.entry_count as usize;
    let mut entries = Vec::with_capacity(count.min(4096));
    let mut row = [0u8; ENTRY_SIZE];

    for index in 0..count {
        read_exact_or_truncated(reader, &mut row, path, "directory").map_err(|err| match err {
            EngineError::TruncatedArchive { path, .. } => EngineError::TruncatedArchive {
                path,
                detail: format!("directory ends after {} of {} entries", index, count),
            },
            other => other,
        })?;
        entries.push(DirectoryEntry::parse(&row));
    }

    Ok(entries)
}

//--- Internal Helpers ----------------------------------------------------

fn normalize_name(mut name: [u8; NAME_LEN]) -> [u8; NAME_LEN] {
    let mut terminated = false;
    for byte in name.iter_mut() {
        if terminated || *byte == 0 || *byte == b' ' {
            terminated = true;
            *byte = 0;
        } else {
            *byte = byte.to_ascii_uppercase();
        }
    }
    name
}

fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    path: &Path,
    what: &str,
) -> EngineResult<()> {
    reader.read_exact(buf).map_err(|source| {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            EngineError::TruncatedArchive {
                path: path.to_path_buf(),
                detail: format!("{} shorter than expected", what),
            }
        } else {
            open_error(path, source)
        }
    })
}

fn open_error(path: &Path, source: std::io::Error) -> EngineError {
    EngineError::ArchiveOpen {
        path: path.to_path_buf(),
        source,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_bytes(tag: &[u8; 4], count: u32, offset: u32) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(tag);
        bytes[4..8].copy_from_slice(&count.to_le_bytes());
        bytes[8..].copy_from_slice(&offset.to_le_bytes());
        bytes
    }

    #[test]
    fn parse_accepts_both_tags() {
        let path = Path::new("test.wad");
        let iwad = ArchiveHeader::parse(&header_bytes(b"IWAD", 3, 44), path).unwrap();
        let pwad = ArchiveHeader::parse(&header_bytes(b"PWAD", 0, 12), path).unwrap();

        assert_eq!(iwad.kind, ArchiveKind::Iwad);
        assert_eq!(iwad.entry_count, 3);
        assert_eq!(iwad.directory_offset, 44);
        assert_eq!(pwad.kind, ArchiveKind::Pwad);
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        let err = ArchiveHeader::parse(&header_bytes(b"ZWAD", 0, 12), Path::new("x.wad"))
            .unwrap_err();
        assert!(matches!(err, EngineError::BadArchiveMagic { found, .. } if &found == b"ZWAD"));
    }

    #[test]
    fn entry_names_are_normalized() {
        let mut row = [0u8; ENTRY_SIZE];
        row[8..16].copy_from_slice(b"e1m1    ");
        let entry = DirectoryEntry::parse(&row);

        assert_eq!(entry.name(), "E1M1");
        assert_eq!(entry.raw_name(), b"E1M1\0\0\0\0");
    }

    #[test]
    fn padding_terminates_name() {
        let mut row = [0u8; ENTRY_SIZE];
        row[8..16].copy_from_slice(b"MAP01\0XY");
        assert_eq!(DirectoryEntry::parse(&row).name(), "MAP01");
    }

    #[test]
    fn read_directory_decodes_rows() {
        let mut data = header_bytes(b"IWAD", 2, 12).to_vec();
        for (name, offset) in [(b"TITLEPIC", 100u32), (b"MAP01\0\0\0", 200u32)] {
            data.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&7u32.to_le_bytes());
            data.extend_from_slice(name);
        }

        let path = Path::new("mem.wad");
        let mut cursor = Cursor::new(data);
        let header = ArchiveHeader::read_from(&mut cursor, path).unwrap();
        let entries = read_directory(&mut cursor, &header, path).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), "TITLEPIC");
        assert_eq!(entries[1].offset, 200);
        assert_eq!(entries[1].size, 7);
    }

    #[test]
    fn short_directory_is_truncated_error() {
        let data = header_bytes(b"IWAD", 5, 12).to_vec();
        let path = Path::new("short.wad");
        let mut cursor = Cursor::new(data);
        let header = ArchiveHeader::read_from(&mut cursor, path).unwrap();

        let err = read_directory(&mut cursor, &header, path).unwrap_err();
        assert!(matches!(err, EngineError::TruncatedArchive { .. }));
    }

    #[test]
    fn short_header_is_truncated_error() {
        let mut cursor = Cursor::new(b"IWAD".to_vec());
        let err = ArchiveHeader::read_from(&mut cursor, Path::new("tiny.wad")).unwrap_err();
        assert!(matches!(err, EngineError::TruncatedArchive { .. }));
    }
}
