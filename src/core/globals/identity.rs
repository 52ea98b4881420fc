//=========================================================================
// Game Identity
//=========================================================================
//
// Edition and variant of the loaded master archive.
//
// Determined once during startup from the master archive's directory
// and file name, then frozen inside `EngineSession`. Nothing after
// startup can change it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

//=== Internal Dependencies ===============================================

use crate::core::archive::ArchiveKind;

//=== GameMode ============================================================

/// Content tier inferred from the level names in the master archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// Matched no threshold; the engine runs in a degraded mode.
    #[default]
    Undetermined,

    /// Episode 1 only.
    Shareware,

    /// Episodes 1-3.
    Registered,

    /// Episodes 1-4.
    Retail,

    /// Linear `MAPnn` levels.
    Commercial,
}

//=== GameVariant =========================================================

/// Mission refinement of a [`GameMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameVariant {
    #[default]
    None,

    /// The stock campaign for the mode.
    Base,

    /// TNT: Evilution.
    MissionPackA,

    /// The Plutonia Experiment.
    MissionPackB,
}

//=== Language ============================================================

/// Text language selected by the narrow file-name compatibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    French,
}

//=== GameIdentity ========================================================

/// Everything startup learned about the master archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameIdentity {
    pub mode: GameMode,
    pub variant: GameVariant,
    pub language: Language,
    pub has_secret_levels: bool,
    pub master_kind: Option<ArchiveKind>,
}

impl GameIdentity {
    /// Refines a classified mode into a full identity using the master
    /// archive's file name.
    pub fn refine(mode: GameMode, has_secret_levels: bool, master: &Path) -> Self {
        let file_name = master
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        let mut language = Language::English;
        let variant = match mode {
            GameMode::Retail | GameMode::Registered | GameMode::Shareware => GameVariant::Base,
            GameMode::Commercial => {
                if file_name.ends_with("doom2f.wad") {
                    language = Language::French;
                    GameVariant::Base
                } else if file_name.ends_with("tnt.wad") {
                    GameVariant::MissionPackA
                } else if file_name.ends_with("plutonia.wad") {
                    GameVariant::MissionPackB
                } else {
                    GameVariant::Base
                }
            }
            GameMode::Undetermined => GameVariant::None,
        };

        Self {
            mode,
            variant,
            language,
            has_secret_levels,
            master_kind: None,
        }
    }

    /// Display title for the start-up banner.
    pub fn title(&self) -> &'static str {
        match self.mode {
            GameMode::Retail => "The Ultimate DOOM",
            GameMode::Shareware => "DOOM Shareware",
            GameMode::Registered => "DOOM Registered",
            GameMode::Commercial => match self.variant {
                GameVariant::MissionPackB => "DOOM 2: Plutonia Experiment",
                GameVariant::MissionPackA => "DOOM 2: TNT - Evilution",
                _ => "DOOM 2: Hell on Earth",
            },
            GameMode::Undetermined => "Public DOOM",
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
