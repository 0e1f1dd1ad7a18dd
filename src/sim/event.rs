//! Events and effects the battle emits for its collaborators
//!
//! The simulation never waits on any of these. Presentation pulls events and
//! effects; audio and history are pushed through fire-and-forget sinks.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;

use super::class::AttackKind;
use super::fighter::Fighter;
use crate::consts::{HIT_EFFECT_MS, KNOCKBACK_MS, LUNGE_MS, PROJECTILE_FLIGHT_MS, SCREEN_SHAKE_MS};
use crate::persistence::StorageError;
use crate::settings::Settings;

/// Sound cues understood by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundCue {
    Hit,
    CriticalHit,
    MagicAttack,
    HeavyAttack,
    RangedAttack,
    Jump,
    Victory,
    Defeat,
}

/// Discrete things that happened, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleEvent {
    MatchStarted {
        fighters: Vec<u32>,
        /// (round index, match index) in tournament mode
        bracket_slot: Option<(usize, usize)>,
    },
    Attack {
        attacker: u32,
        defender: u32,
        ability: &'static str,
        icon: &'static str,
        kind: AttackKind,
        from: Vec2,
        to: Vec2,
    },
    Damage {
        defender: u32,
        damage: u32,
        critical: bool,
        hp_after: u32,
    },
    Eliminated {
        fighter: u32,
    },
    Jumped {
        fighter: u32,
    },
    MatchEnded {
        winner: u32,
    },
    BattleEnded {
        winner: u32,
    },
}

/// Lifecycle of a transient visual effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectPhase {
    /// Scheduled, not visible yet
    Pending,
    Shown,
    Expired,
}

/// Transient visual effects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectKind {
    /// Attack icon flying from attacker to defender
    Projectile {
        from: Vec2,
        to: Vec2,
        icon: &'static str,
        kind: AttackKind,
    },
    /// Floating damage number over the defender
    DamageNumber {
        pos: Vec2,
        damage: u32,
        critical: bool,
        icon: &'static str,
    },
    /// Particle burst on impact
    Particles { pos: Vec2, critical: bool, kind: AttackKind },
    /// Attacker lunging forward
    Lunge { fighter: u32 },
    /// Defender knocked back
    Knockback { fighter: u32 },
    ScreenShake,
}

impl EffectKind {
    /// How long the effect stays visible
    pub fn lifetime_ms(&self) -> u64 {
        match self {
            EffectKind::Projectile { .. } => PROJECTILE_FLIGHT_MS,
            EffectKind::DamageNumber { .. } | EffectKind::Particles { .. } => HIT_EFFECT_MS,
            EffectKind::Lunge { .. } => LUNGE_MS,
            EffectKind::Knockback { .. } => KNOCKBACK_MS,
            EffectKind::ScreenShake => SCREEN_SHAKE_MS,
        }
    }
}

/// A visual effect with its lifecycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    pub id: u64,
    pub kind: EffectKind,
    pub phase: EffectPhase,
}

/// A line in the human-readable battle log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub id: u64,
    pub text: String,
}

/// Summary handed to the history collaborator when a match ends
#[derive(Debug, Clone)]
pub struct BattleSummary {
    pub winner: Fighter,
    pub contestants: Vec<Fighter>,
    pub settings: Settings,
    pub duration_secs: u64,
}

/// Fire-and-forget audio sink
pub trait AudioSink {
    fn notify(&mut self, cue: SoundCue);
}

/// Append-only store of completed battles
pub trait HistorySink {
    fn record_battle(&mut self, summary: &BattleSummary) -> Result<(), StorageError>;
}

/// Shared sinks, so the host can keep using a collaborator it handed over
impl<T: AudioSink + ?Sized> AudioSink for Rc<RefCell<T>> {
    fn notify(&mut self, cue: SoundCue) {
        self.borrow_mut().notify(cue);
    }
}

impl<T: HistorySink + ?Sized> HistorySink for Rc<RefCell<T>> {
    fn record_battle(&mut self, summary: &BattleSummary) -> Result<(), StorageError> {
        self.borrow_mut().record_battle(summary)
    }
}

/// Audio sink that drops every cue
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn notify(&mut self, _cue: SoundCue) {}
}

/// History sink that keeps nothing
#[derive(Debug, Default)]
pub struct NoHistory;

impl HistorySink for NoHistory {
    fn record_battle(&mut self, _summary: &BattleSummary) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Everything the battle talks to outside the simulation
pub struct Collaborators {
    pub audio: Box<dyn AudioSink>,
    pub history: Box<dyn HistorySink>,
    /// Called once with the final winner
    pub on_battle_end: Option<Box<dyn FnMut(&Fighter)>>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            audio: Box::new(Silent),
            history: Box::new(NoHistory),
            on_battle_end: None,
        }
    }
}

impl Collaborators {
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_history(mut self, history: impl HistorySink + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    pub fn on_battle_end(mut self, f: impl FnMut(&Fighter) + 'static) -> Self {
        self.on_battle_end = Some(Box::new(f));
        self
    }
}
