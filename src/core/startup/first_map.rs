//=========================================================================
// First Map Search
//=========================================================================
//
// Resolves "warp to the first map" against the loaded archives.
//
// Map names are checked in play order. The first one supplied by a user
// archive wins; when none is, the game starts on its stock first map.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::archive::{ArchiveOrigin, LumpIndex};
use crate::core::globals::GameMode;

//=== FirstMap ============================================================

/// Outcome of the first-map search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstMap {
    pub episode: i32,
    pub map: i32,
    /// Name shown in the log line.
    pub name: String,
    /// The map comes from a user archive.
    pub is_new: bool,
}

//=== first_map() =========================================================

/// Finds the first map, preferring maps from user archives.
pub fn first_map(mode: GameMode, lumps: &LumpIndex) -> FirstMap {
    let candidates: Vec<(i32, i32, String)> = if mode == GameMode::Commercial {
        (1..=32).map(|m| (1, m, format!("MAP{:02}", m))).collect()
    } else {
        (1..=4)
            .flat_map(|e| (1..=9).map(move |m| (e, m, format!("E{}M{}", e, m))))
            .collect()
    };

    let mut found = FirstMap {
        episode: 1,
        map: 1,
        name: if mode == GameMode::Commercial {
            String::new()
        } else {
            "E1M1".to_string()
        },
        is_new: false,
    };

    for (episode, map, name) in candidates {
        match lumps.origin_of(&name) {
            Some(ArchiveOrigin::User) => {
                found = FirstMap {
                    episode,
                    map,
                    name,
                    is_new: true,
                };
                break;
            }
            Some(_) if found.name.is_empty() => found.name = name,
            _ => {}
        }
    }

    info!(
        "Auto-warping to first {}level: {}",
        if found.is_new { "new " } else { "" },
        found.name
    );
    found
}

//=========================================================================
// Unit Tests
//=========================================================================
