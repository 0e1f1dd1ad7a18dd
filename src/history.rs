//! Battle history and contestant stats
//!
//! Persisted to LocalStorage, keeps the last 100 battles newest first plus
//! running win/loss stats per contestant name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, StorageError};
use crate::settings::{BattleMode, Settings};
use crate::sim::{ArenaPreset, BattleSummary, Fighter, HistorySink};

/// Maximum number of battles to keep
pub const MAX_HISTORY: usize = 100;
/// Battles a contestant needs before appearing in the leaderboard
pub const MIN_RANKED_BATTLES: u32 = 3;

/// A contestant as recorded in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFighter {
    pub id: u32,
    pub name: String,
    /// Class name, if one was assigned
    #[serde(default)]
    pub class: Option<String>,
}

impl From<&Fighter> for RecordedFighter {
    fn from(f: &Fighter) -> Self {
        Self {
            id: f.id(),
            name: f.name().to_string(),
            class: f.class.map(|c| c.class().name.to_string()),
        }
    }
}

/// Settings a battle was fought with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSettings {
    pub mode: BattleMode,
    pub battle_speed_ms: u64,
    pub starting_hp: u32,
    #[serde(default)]
    pub arena_preset: ArenaPreset,
}

impl From<&Settings> for RecordedSettings {
    fn from(s: &Settings) -> Self {
        Self {
            mode: s.mode,
            battle_speed_ms: s.battle_speed_ms,
            starting_hp: s.starting_hp,
            arena_preset: s.arena_preset,
        }
    }
}

/// One finished battle (or tournament match)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub id: u64,
    /// Unix timestamp (ms)
    pub timestamp: f64,
    pub winner: RecordedFighter,
    pub contestants: Vec<RecordedFighter>,
    pub settings: RecordedSettings,
    pub duration_secs: u64,
}

/// Running stats for one contestant name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestantStats {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub battles: u32,
    /// Percentage of battles won
    pub win_rate: f32,
    /// Times played per class name
    #[serde(default)]
    pub class_counts: BTreeMap<String, u32>,
}

impl ContestantStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wins: 0,
            losses: 0,
            battles: 0,
            win_rate: 0.0,
            class_counts: BTreeMap::new(),
        }
    }

    /// Most played class (alphabetically first on ties)
    pub fn favorite_class(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        for (name, &count) in &self.class_counts {
            match best {
                Some((_, c)) if c >= count => {}
                _ => best = Some((name, count)),
            }
        }
        best.map(|(name, _)| name)
    }
}

/// Wins of two contestants in battles they both fought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadToHead {
    pub wins_a: u32,
    pub wins_b: u32,
}

/// Battle history and per-contestant stats
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleHistory {
    /// Newest first
    pub records: Vec<BattleRecord>,
    pub stats: BTreeMap<String, ContestantStats>,
}

impl BattleHistory {
    /// LocalStorage keys
    const HISTORY_KEY: &'static str = "arena_battle_history";
    const STATS_KEY: &'static str = "arena_contestant_stats";

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished battle and update every participant's stats
    pub fn record(&mut self, summary: &BattleSummary, timestamp: f64) -> &BattleRecord {
        let mut id = timestamp.max(0.0) as u64;
        if let Some(last) = self.records.first() {
            id = id.max(last.id + 1);
        }

        let record = BattleRecord {
            id,
            timestamp,
            winner: RecordedFighter::from(&summary.winner),
            contestants: summary.contestants.iter().map(RecordedFighter::from).collect(),
            settings: RecordedSettings::from(&summary.settings),
            duration_secs: summary.duration_secs,
        };

        for fighter in &record.contestants {
            let stats = self
                .stats
                .entry(fighter.name.clone())
                .or_insert_with(|| ContestantStats::new(&fighter.name));
            stats.battles += 1;
            if fighter.name == record.winner.name {
                stats.wins += 1;
            } else {
                stats.losses += 1;
            }
            stats.win_rate = stats.wins as f32 / stats.battles as f32 * 100.0;
            if let Some(class) = &fighter.class {
                *stats.class_counts.entry(class.clone()).or_insert(0) += 1;
            }
        }

        self.records.insert(0, record);
        self.records.truncate(MAX_HISTORY);
        &self.records[0]
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ranked contestants: at least 3 battles, by win rate then wins
    pub fn top_contestants(&self, limit: usize) -> Vec<&ContestantStats> {
        let mut ranked: Vec<&ContestantStats> = self
            .stats
            .values()
            .filter(|s| s.battles >= MIN_RANKED_BATTLES)
            .collect();
        ranked.sort_by(|a, b| {
            b.win_rate
                .partial_cmp(&a.win_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.wins.cmp(&a.wins))
        });
        ranked.truncate(limit);
        ranked
    }

    pub fn record_for(&self, name: &str) -> Option<&ContestantStats> {
        self.stats.get(name)
    }

    pub fn head_to_head(&self, a: &str, b: &str) -> HeadToHead {
        let mut h2h = HeadToHead { wins_a: 0, wins_b: 0 };
        for record in &self.records {
            let fought = |name: &str| record.contestants.iter().any(|c| c.name == name);
            if !(fought(a) && fought(b)) {
                continue;
            }
            if record.winner.name == a {
                h2h.wins_a += 1;
            } else if record.winner.name == b {
                h2h.wins_b += 1;
            }
        }
        h2h
    }

    /// Forget everything, including persisted data
    pub fn clear(&mut self) {
        self.records.clear();
        self.stats.clear();
        persistence::remove(Self::HISTORY_KEY);
        persistence::remove(Self::STATS_KEY);
        log::info!("Battle history cleared");
    }

    /// Load from LocalStorage; missing or corrupt data starts fresh
    pub fn load() -> Self {
        let records: Vec<BattleRecord> = persistence::load(Self::HISTORY_KEY).unwrap_or_default();
        let stats = persistence::load(Self::STATS_KEY).unwrap_or_default();
        log::info!("Loaded {} battle records", records.len());
        Self { records, stats }
    }

    pub fn save(&self) -> Result<(), StorageError> {
        persistence::save(Self::HISTORY_KEY, &self.records)?;
        persistence::save(Self::STATS_KEY, &self.stats)?;
        log::debug!("Battle history saved ({} records)", self.records.len());
        Ok(())
    }
}

impl HistorySink for BattleHistory {
    fn record_battle(&mut self, summary: &BattleSummary) -> Result<(), StorageError> {
        self.record(summary, now_ms());
        match self.save() {
            // Without storage the history lives in memory only
            Err(StorageError::Unavailable) => Ok(()),
            other => other,
        }
    }
}

/// Current Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Format a timestamp relative to `now` ("Just now", "3 mins ago", "2 days ago")
pub fn format_age(timestamp: f64, now: f64) -> String {
    let mins = (now - timestamp) / 60_000.0;
    let hours = mins / 60.0;
    let days = hours / 24.0;

    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    };

    if days >= 1.0 {
        match days.floor() as i64 {
            1 => "Yesterday".to_string(),
            n => format!("{} days ago", n),
        }
    } else if hours >= 1.0 {
        plural(hours.floor() as i64, "hour")
    } else if mins >= 1.0 {
        plural(mins.floor() as i64, "min")
    } else {
        "Just now".to_string()
    }
}
