//! Battle simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (every random choice takes an `Rng`)
//! - Virtual clock driven by fixed ticks, no wall-clock reads
//! - No rendering or platform dependencies

pub mod arena;
pub mod battle;
pub mod bracket;
pub mod class;
pub mod combat;
pub mod event;
pub mod fighter;
pub mod movement;
pub mod scheduler;

pub use arena::{ArenaLayout, ArenaPreset, Obstacle, ObstacleKind, Platform, PlatformKind, generate_layout};
pub use battle::{Battle, BattlePhase, BattleSnapshot, SetupError, start_battle, validate_setup};
pub use bracket::{Bracket, Match, Progress, create_bracket};
pub use class::{AiStrategy, Attack, AttackKind, CLASSES, ClassId, FighterClass, assign_class, pick_attack};
pub use combat::{AttackOutcome, DamageRoll, resolve_attack, roll_damage};
pub use event::{
    AudioSink, BattleEvent, BattleSummary, Collaborators, Effect, EffectKind, EffectPhase,
    HistorySink, LogLine, SoundCue,
};
pub use fighter::{Contestant, Fighter};
pub use movement::{Facing, Motion, MotionState};
pub use scheduler::Scheduler;
