//=========================================================================
// Launch Options
//=========================================================================
//
// Effects of the command-line surface, as one deserializable struct.
//
// Flag parsing itself belongs to the host; it either fills this struct in
// code or points the engine at a TOML launch file:
//
// ```toml
// iwad = "doom2"
// files = ["mymap.wad"]
// warp = 7
// skill = 4
// turbo = 150
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::GameMode;

//=== Constants ==========================================================

/// Turbo scale used when turbo is enabled without a value.
pub const DEFAULT_TURBO: u32 = 200;

pub const MIN_TURBO: u32 = 10;
pub const MAX_TURBO: u32 = 400;

//=== Skill ===============================================================

/// Difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Skill {
    Baby,
    Easy,
    #[default]
    Medium,
    Hard,
    Nightmare,
}

impl Skill {
    /// Maps the user-facing 1..=5 numbering; anything else is `None`.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Baby),
            2 => Some(Self::Easy),
            3 => Some(Self::Medium),
            4 => Some(Self::Hard),
            5 => Some(Self::Nightmare),
            _ => None,
        }
    }
}

//=== WarpTarget ==========================================================

/// Map requested with `warp`.
///
/// `warp = 7`, `warp = [2, 5]` and `warp = "*"` (first map) are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WarpTarget {
    Map(i32),
    EpisodeMap(i32, i32),
    Auto(String),
}

impl WarpTarget {
    /// Episode and map for `mode`; map 0 asks for the first map.
    ///
    /// Commercial installs read only the first number. Episodic installs
    /// need both numbers and fall back to the first map otherwise.
    pub fn resolve(&self, mode: GameMode, episode: i32) -> (i32, i32) {
        match (self, mode) {
            (Self::Map(map), GameMode::Commercial) => (episode, *map),
            (Self::EpisodeMap(map, _), GameMode::Commercial) => (episode, *map),
            (Self::EpisodeMap(ep, map), _) => (*ep, *map),
            _ => (episode, 0),
        }
    }
}

//=== TurboOption =========================================================

/// `turbo = true` or `turbo = 150`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TurboOption {
    Enabled(bool),
    Scale(u32),
}

//=== RecordFrom ==========================================================

/// Continue recording from a savegame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordFrom {
    pub slot: u8,
    pub demo: String,
}

//=== LaunchOptions =======================================================

/// Launch-time switches consumed by startup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchOptions {
    //--- Archives ---------------------------------------------------------
    /// Master archive path, name or directory.
    pub iwad: Option<String>,
    /// Supplemental archives, loaded after the master.
    pub files: Vec<String>,
    /// Behaviour patches (`.bex` preferred over `.deh`).
    pub deh: Vec<String>,
    /// Skip the patch lump embedded in the archives.
    pub no_deh: bool,

    //--- Demos ------------------------------------------------------------
    pub play_demo: Option<String>,
    /// Demo played with single-tic stepping and timing statistics.
    pub time_demo: Option<String>,
    /// Demo played as fast as possible.
    pub fast_demo: Option<String>,
    /// Fast-forward demo playback up to this map.
    pub ffmap: Option<i32>,
    pub record: Option<String>,
    pub record_from: Option<RecordFrom>,

    //--- Start ------------------------------------------------------------
    /// 1..=5.
    pub skill: Option<u8>,
    pub episode: Option<i32>,
    pub warp: Option<WarpTarget>,
    pub load_game: Option<u8>,

    //--- Loop -------------------------------------------------------------
    pub no_draw: bool,
    /// One tic per loop iteration, no adaptive pacing.
    pub single_tics: bool,
    pub smooth_motion: bool,
    pub net_game: bool,

    //--- Play -------------------------------------------------------------
    pub turbo: Option<TurboOption>,
    /// 0 = cooperative, 1 = deathmatch, 2 = alt-deathmatch.
    pub deathmatch: u8,
    pub no_monsters: bool,
    pub respawn: bool,
    pub fast: bool,
    pub no_sound: bool,
    pub no_music: bool,
    pub no_sfx: bool,

    pub save_dir: Option<PathBuf>,
}

impl LaunchOptions {
    /// Parses a TOML launch file body.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reads and parses a TOML launch file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Movement scale in percent; 100 when turbo is off.
    pub fn turbo_scale(&self) -> u32 {
        match self.turbo {
            None | Some(TurboOption::Enabled(false)) => 100,
            Some(TurboOption::Enabled(true)) => DEFAULT_TURBO,
            Some(TurboOption::Scale(scale)) => scale.clamp(MIN_TURBO, MAX_TURBO),
        }
    }

    /// Music is off when sound or music is disabled.
    pub fn music_disabled(&self) -> bool {
        self.no_sound || self.no_music
    }

    /// Effects are off when sound or effects are disabled.
    pub fn sfx_disabled(&self) -> bool {
        self.no_sound || self.no_sfx
    }

    /// Any demo playback switch.
    pub fn demo_name(&self) -> Option<&str> {
        self.play_demo
            .as_deref()
            .or(self.fast_demo.as_deref())
            .or(self.time_demo.as_deref())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let opts = LaunchOptions::from_toml_str("").unwrap();
        assert_eq!(opts, LaunchOptions::default());
        assert_eq!(opts.turbo_scale(), 100);
    }

    #[test]
    fn parses_full_launch_file() {
        let opts = LaunchOptions::from_toml_str(
            r#"
            iwad = "tnt"
            files = ["a.wad", "b"]
            deh = ["fix"]
            warp = [2, 5]
            skill = 4
            turbo = 150
            no_sound = true
            record_from = { slot = 3, demo = "run" }
            "#,
        )
        .unwrap();

        assert_eq!(opts.iwad.as_deref(), Some("tnt"));
        assert_eq!(opts.files, vec!["a.wad", "b"]);
        assert_eq!(opts.warp, Some(WarpTarget::EpisodeMap(2, 5)));
        assert_eq!(opts.turbo_scale(), 150);
        assert!(opts.music_disabled() && opts.sfx_disabled());
        assert_eq!(opts.record_from, Some(RecordFrom { slot: 3, demo: "run".into() }));
    }

    #[test]
    fn unknown_key_is_config_error() {
        let err = LaunchOptions::from_toml_str("wad = \"doom\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn turbo_is_clamped() {
        let mut opts = LaunchOptions::from_toml_str("turbo = true").unwrap();
        assert_eq!(opts.turbo_scale(), DEFAULT_TURBO);

        opts.turbo = Some(TurboOption::Scale(1));
        assert_eq!(opts.turbo_scale(), MIN_TURBO);

        opts.turbo = Some(TurboOption::Scale(1000));
        assert_eq!(opts.turbo_scale(), MAX_TURBO);
    }

    #[test]
    fn warp_forms_resolve_per_mode() {
        let single = WarpTarget::Map(7);
        let pair = WarpTarget::EpisodeMap(2, 5);
        let auto = WarpTarget::Auto("*".into());

        assert_eq!(single.resolve(GameMode::Commercial, 1), (1, 7));
        assert_eq!(single.resolve(GameMode::Retail, 1), (1, 0));
        assert_eq!(pair.resolve(GameMode::Registered, 1), (2, 5));
        assert_eq!(pair.resolve(GameMode::Commercial, 1), (1, 2));
        assert_eq!(auto.resolve(GameMode::Shareware, 1), (1, 0));
    }

    #[test]
    fn warp_star_parses_as_auto() {
        let opts = LaunchOptions::from_toml_str("warp = \"*\"").unwrap();
        assert_eq!(opts.warp, Some(WarpTarget::Auto("*".into())));
    }

    #[test]
    fn skill_numbers_map_to_levels() {
        assert_eq!(Skill::from_number(1), Some(Skill::Baby));
        assert_eq!(Skill::from_number(5), Some(Skill::Nightmare));
        assert_eq!(Skill::from_number(0), None);
    }
}
