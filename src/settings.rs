//! Battle settings and player preferences
//!
//! `Settings` is supplied once per battle and read-only afterwards.
//! `Preferences` are persisted separately in LocalStorage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence;
use crate::sim::ArenaPreset;

/// Battle mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BattleMode {
    /// Everyone fights at once, last one standing wins
    #[default]
    FreeForAll,
    /// Single-elimination bracket of head-to-head matches
    Tournament,
    /// Head-to-head between the contestants given
    Duel,
}

impl BattleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattleMode::FreeForAll => "freeforall",
            BattleMode::Tournament => "tournament",
            BattleMode::Duel => "duel",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown battle mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for BattleMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "freeforall" | "ffa" | "free-for-all" => Ok(BattleMode::FreeForAll),
            "tournament" => Ok(BattleMode::Tournament),
            "duel" | "single" => Ok(BattleMode::Duel),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Battle speed presets (hotkeys 1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleSpeed {
    UltraFast,
    Fast,
    Normal,
    Slow,
    VerySlow,
}

impl BattleSpeed {
    pub const ALL: [BattleSpeed; 5] = [
        BattleSpeed::UltraFast,
        BattleSpeed::Fast,
        BattleSpeed::Normal,
        BattleSpeed::Slow,
        BattleSpeed::VerySlow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BattleSpeed::UltraFast => "Ultra Fast",
            BattleSpeed::Fast => "Fast",
            BattleSpeed::Normal => "Normal",
            BattleSpeed::Slow => "Slow",
            BattleSpeed::VerySlow => "Very Slow",
        }
    }

    /// Milliseconds between attack resolutions
    pub fn millis(&self) -> u64 {
        match self {
            BattleSpeed::UltraFast => 300,
            BattleSpeed::Fast => 600,
            BattleSpeed::Normal => 1000,
            BattleSpeed::Slow => 1500,
            BattleSpeed::VerySlow => 2000,
        }
    }

    /// Preset with exactly this cadence, if any
    pub fn from_millis(ms: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.millis() == ms)
    }

    /// Map a number-row key to a speed preset
    pub fn from_hotkey(key: &str) -> Option<Self> {
        match key {
            "1" => Some(BattleSpeed::UltraFast),
            "2" => Some(BattleSpeed::Fast),
            "3" => Some(BattleSpeed::Normal),
            "4" => Some(BattleSpeed::Slow),
            "5" => Some(BattleSpeed::VerySlow),
            _ => None,
        }
    }
}

/// Lowest accepted attack cadence
pub const MIN_BATTLE_SPEED_MS: u64 = 50;

/// Settings for one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Milliseconds between attack resolutions
    pub battle_speed_ms: u64,
    /// HP every fighter starts a match with (before class bonus)
    pub starting_hp: u32,
    pub mode: BattleMode,
    #[serde(default)]
    pub arena_preset: ArenaPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            battle_speed_ms: BattleSpeed::Normal.millis(),
            starting_hp: 100,
            mode: BattleMode::FreeForAll,
            arena_preset: ArenaPreset::Random,
        }
    }
}

impl Settings {
    /// Create settings for a mode with default speed and HP
    pub fn for_mode(mode: BattleMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Check the numeric knobs, returning a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        if self.battle_speed_ms < MIN_BATTLE_SPEED_MS {
            return Err(format!(
                "battle speed {}ms is below the {}ms minimum",
                self.battle_speed_ms, MIN_BATTLE_SPEED_MS
            ));
        }
        if self.starting_hp == 0 {
            return Err("starting HP must be at least 1".to_string());
        }
        Ok(())
    }
}

/// UI theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Persisted player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
}

fn default_sound_enabled() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sound_enabled: true,
        }
    }
}

impl Preferences {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "arena_picker_preferences";

    /// Load preferences, falling back to defaults when absent or corrupt
    pub fn load() -> Self {
        match persistence::load(Self::STORAGE_KEY) {
            Some(prefs) => {
                log::info!("Loaded preferences from LocalStorage");
                prefs
            }
            None => {
                log::info!("Using default preferences");
                Self::default()
            }
        }
    }

    /// Save preferences (best effort)
    pub fn save(&self) {
        match persistence::save(Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Preferences saved"),
            Err(e) => log::warn!("Preferences not saved: {}", e),
        }
    }
}
