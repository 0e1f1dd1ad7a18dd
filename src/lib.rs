//! Arena Picker - a platformer battle arena that picks a winner
//!
//! Core modules:
//! - `sim`: Battle simulation (classes, arena layout, movement, combat, bracket)
//! - `settings`: Battle settings and persisted preferences
//! - `history`: Battle history and contestant stats
//! - `persistence`: LocalStorage JSON helpers
//! - `audio`: Procedural sound cues (Web Audio)
//! - `logo`: Contestant logo lookup
//! - `presets`: Premade contestant lists

pub mod audio;
pub mod history;
pub mod logo;
pub mod persistence;
pub mod presets;
pub mod settings;
pub mod sim;

pub use history::BattleHistory;
pub use settings::{BattleMode, BattleSpeed, Preferences, Settings, Theme, UnknownMode};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed movement timestep (60 Hz)
    pub const MOVEMENT_DT: f32 = 1.0 / 60.0;
    /// Maximum movement substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1000.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Contestant limits for a single battle
    pub const MIN_CONTESTANTS: usize = 2;
    pub const MAX_CONTESTANTS: usize = 16;

    /// Fighters hover this far above the platform surface they stand on
    pub const FIGHTER_STAND_HEIGHT: f32 = 100.0;
    /// Horizontal inset from platform edges while walking (half the sprite width)
    pub const FIGHTER_HALF_WIDTH: f32 = 50.0;

    /// Delay before the next tournament match starts
    pub const MATCH_DISPLAY_DELAY_MS: u64 = 2000;
    /// Delay before a tournament champion is reported
    pub const CHAMPION_DISPLAY_DELAY_MS: u64 = 3000;
    /// Delay before a free-for-all / duel winner is reported
    pub const WINNER_DISPLAY_DELAY_MS: u64 = 2000;

    /// Projectile flight time before the hit lands visually
    pub const PROJECTILE_FLIGHT_MS: u64 = 600;
    /// Lifetime of damage numbers and hit particles
    pub const HIT_EFFECT_MS: u64 = 1000;
    /// Attacker lunge animation
    pub const LUNGE_MS: u64 = 400;
    /// Defender knockback animation
    pub const KNOCKBACK_MS: u64 = 500;
    /// Screen shake duration
    pub const SCREEN_SHAKE_MS: u64 = 300;
    /// Damage at or above this shakes the screen
    pub const SCREEN_SHAKE_DAMAGE: u32 = 25;
}

/// Direction sign (+1 right, -1 left) from `from` toward `to` along x
#[inline]
pub fn direction_toward(from: Vec2, to: Vec2) -> f32 {
    if to.x > from.x { 1.0 } else { -1.0 }
}
