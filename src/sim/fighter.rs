//! Contestants and their in-match fighter state

use serde::{Deserialize, Serialize};

use super::class::{AiStrategy, ClassId};

/// Palette used when a contestant has no logo
pub const CONTESTANT_COLORS: [&str; 8] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22", "#34495e",
];

/// A user-entered contestant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: u32,
    pub name: String,
    /// Logo URL, if one was resolved
    #[serde(default)]
    pub image: Option<String>,
    /// Avatar background color (hex)
    pub color: String,
}

impl Contestant {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        let color = CONTESTANT_COLORS[id as usize % CONTESTANT_COLORS.len()];
        Self {
            id,
            name: name.into(),
            image: None,
            color: color.to_string(),
        }
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Letter shown on the fallback avatar
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

/// A contestant with live combat state for the current match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub contestant: Contestant,
    pub hp: u32,
    pub max_hp: u32,
    pub is_alive: bool,
    /// Assigned class (none until `assign_class`)
    pub class: Option<ClassId>,
    pub attack_range: f32,
    pub attack_bonus: i32,
    pub ai_strategy: AiStrategy,
    pub speed_multiplier: f32,
}

/// Reach used before a class is assigned
pub const DEFAULT_ATTACK_RANGE: f32 = 100.0;

impl Fighter {
    /// Wrap a contestant with a fresh HP pool
    pub fn new(contestant: Contestant, starting_hp: u32) -> Self {
        let hp = starting_hp.max(1);
        Self {
            contestant,
            hp,
            max_hp: hp,
            is_alive: true,
            class: None,
            attack_range: DEFAULT_ATTACK_RANGE,
            attack_bonus: 0,
            ai_strategy: AiStrategy::Balanced,
            speed_multiplier: 1.0,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.contestant.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.contestant.name
    }

    /// Class name, or "Fighter" when unassigned
    pub fn class_name(&self) -> &'static str {
        self.class.map(|c| c.class().name).unwrap_or("Fighter")
    }

    /// Subtract damage, clamping at zero. Returns true if this eliminated the fighter.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        let was_alive = self.is_alive;
        self.hp = self.hp.saturating_sub(damage);
        self.is_alive = self.hp > 0;
        was_alive && !self.is_alive
    }

    /// HP as a 0-100 percentage for health bars
    pub fn hp_percent(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32 * 100.0
    }
}
