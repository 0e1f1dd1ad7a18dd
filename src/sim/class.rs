//! Fighter class catalog
//!
//! Every fighter is randomly assigned one of these archetypes when a match
//! starts. A class adjusts HP and damage, sets attack reach, and picks the
//! movement AI the fighter uses.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fighter::Fighter;

/// Movement / positioning policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiStrategy {
    /// Chase enemies, seek close combat
    Aggressive,
    /// Seek high ground, keep distance
    Sniper,
    /// Hold a medium distance band
    Caster,
    /// Circle around enemies
    Flanker,
    /// Hit and run
    Kiting,
    /// Hold position
    Defensive,
    #[default]
    Balanced,
}

/// Cosmetic attack family, used for effects and sound only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    Melee,
    Magic,
    Ranged,
    Heavy,
}

/// A fighter archetype
#[derive(Debug, Clone, PartialEq)]
pub struct FighterClass {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub hp_bonus: i32,
    pub attack_bonus: i32,
    pub speed: f32,
    pub abilities: &'static [&'static str],
    pub attack_range: f32,
    pub ai_strategy: AiStrategy,
    pub attack_kind: AttackKind,
}

/// Index into [`CLASSES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassId(pub u8);

impl ClassId {
    /// Look up the catalog entry. Out-of-range ids wrap around.
    pub fn class(self) -> &'static FighterClass {
        &CLASSES[self.0 as usize % CLASSES.len()]
    }
}

/// A single attack: ability label plus cosmetic family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attack {
    pub name: &'static str,
    pub icon: &'static str,
    pub kind: AttackKind,
}

#[allow(clippy::too_many_arguments)]
const fn class(
    name: &'static str,
    icon: &'static str,
    color: &'static str,
    (hp_bonus, attack_bonus, speed): (i32, i32, f32),
    abilities: &'static [&'static str],
    attack_range: f32,
    ai_strategy: AiStrategy,
    attack_kind: AttackKind,
) -> FighterClass {
    FighterClass {
        name,
        icon,
        color,
        hp_bonus,
        attack_bonus,
        speed,
        abilities,
        attack_range,
        ai_strategy,
        attack_kind,
    }
}

use AiStrategy::*;
use AttackKind::*;

/// The full class catalog
pub static CLASSES: [FighterClass; 24] = [
    // Melee warriors
    class("Swordsman", "⚔️", "#e74c3c", (10, 5, 1.0), &["Power Slash", "Quick Strike"], 150.0, Aggressive, Melee),
    class("Berserker", "🪓", "#c0392b", (20, 10, 0.8), &["Heavy Smash", "Rage Strike"], 140.0, Aggressive, Heavy),
    class("Paladin", "🛡️", "#f39c12", (25, 3, 0.9), &["Holy Strike", "Divine Shield"], 150.0, Defensive, Melee),
    class("Dual Wielder", "⚔️⚔️", "#e67e22", (5, 8, 1.2), &["Twin Strike", "Blade Dance"], 145.0, Aggressive, Melee),
    class("Brawler", "👊", "#d35400", (15, 6, 1.1), &["Combo Punch", "Uppercut"], 120.0, Aggressive, Heavy),
    class("Lancer", "🔱", "#c44569", (10, 7, 1.0), &["Piercing Thrust", "Sweep"], 180.0, Aggressive, Melee),
    // Agile / ranged
    class("Assassin", "🗡️", "#34495e", (-5, 12, 1.5), &["Backstab", "Shadow Strike"], 140.0, Flanker, Melee),
    class("Ranger", "🏹", "#27ae60", (0, 8, 1.3), &["Arrow Shot", "Multi-Shot"], 400.0, Sniper, Ranged),
    class("Rogue", "🃏", "#16a085", (0, 7, 1.4), &["Sneak Attack", "Poison Dart"], 220.0, Kiting, Melee),
    class("Nightblade", "🌙", "#2c3e50", (5, 10, 1.3), &["Shadow Strike", "Dark Blade"], 160.0, Flanker, Melee),
    class("Gunner", "🔫", "#95a5a6", (0, 9, 1.1), &["Rapid Fire", "Headshot"], 450.0, Sniper, Ranged),
    class("Dancer", "💃", "#e91e63", (-5, 5, 1.6), &["Blade Dance", "Whirl"], 150.0, Flanker, Melee),
    // Casters
    class("Mage", "🧙", "#9b59b6", (-10, 15, 0.9), &["Fireball", "Magic Missile"], 350.0, Caster, Magic),
    class("Elementalist", "🌊", "#3498db", (-5, 12, 1.0), &["Lightning", "Ice Spike"], 320.0, Caster, Magic),
    class("Necromancer", "💀", "#8e44ad", (0, 10, 0.8), &["Death Bolt", "Curse"], 300.0, Caster, Magic),
    class("Arcanist", "✨", "#a29bfe", (-5, 13, 1.0), &["Arcane Blast", "Magic Nova"], 330.0, Caster, Magic),
    class("Witch Doctor", "🦴", "#6c5ce7", (5, 8, 0.9), &["Voodoo", "Poison Cloud"], 260.0, Caster, Magic),
    class("Demolitionist", "💣", "#fd79a8", (10, 14, 0.7), &["Explosion", "Grenade"], 380.0, Sniper, Ranged),
    // Support / hybrid
    class("Priest", "✝️", "#ecf0f1", (15, 3, 0.9), &["Holy Light", "Smite"], 220.0, Defensive, Melee),
    class("Acolyte", "📿", "#bdc3c7", (10, 5, 1.0), &["Prayer", "Divine Bolt"], 230.0, Defensive, Melee),
    class("Monk", "🙏", "#f39c12", (10, 7, 1.2), &["Palm Strike", "Meditation"], 160.0, Balanced, Melee),
    class("Taoist", "☯️", "#1abc9c", (5, 8, 1.1), &["Yin Yang", "Chi Blast"], 210.0, Balanced, Melee),
    // Tech / special
    class("Mechanic", "🔧", "#7f8c8d", (15, 6, 0.8), &["Turret", "Wrench Throw"], 280.0, Defensive, Melee),
    class("Oathkeeper", "⚖️", "#16a085", (20, 5, 0.9), &["Oath Strike", "Justice"], 170.0, Defensive, Melee),
];

/// Pick a class uniformly at random
pub fn random_class<R: Rng + ?Sized>(rng: &mut R) -> ClassId {
    ClassId(rng.random_range(0..CLASSES.len()) as u8)
}

/// Apply a class to a fighter
///
/// The HP bonus is applied once here. Negative bonuses never push HP or max
/// HP below 1.
pub fn apply_class(fighter: &Fighter, id: ClassId) -> Fighter {
    let class = id.class();
    let max_hp = (fighter.max_hp as i64 + class.hp_bonus as i64).max(1) as u32;
    let hp = (fighter.hp as i64 + class.hp_bonus as i64).clamp(1, max_hp as i64) as u32;

    Fighter {
        hp,
        max_hp,
        is_alive: true,
        class: Some(id),
        attack_range: class.attack_range,
        attack_bonus: class.attack_bonus,
        ai_strategy: class.ai_strategy,
        speed_multiplier: class.speed,
        ..fighter.clone()
    }
}

/// Assign a uniformly random class to a fighter
pub fn assign_class<R: Rng + ?Sized>(fighter: &Fighter, rng: &mut R) -> Fighter {
    apply_class(fighter, random_class(rng))
}

/// Pick one of the class's abilities for an attack
pub fn pick_attack<R: Rng + ?Sized>(class: &FighterClass, rng: &mut R) -> Attack {
    let name = class.abilities[rng.random_range(0..class.abilities.len())];
    Attack {
        name,
        icon: class.icon,
        kind: class.attack_kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fighter::Contestant;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn class_id(name: &str) -> ClassId {
        let idx = CLASSES.iter().position(|c| c.name == name).unwrap();
        ClassId(idx as u8)
    }

    #[test]
    fn test_catalog_shape() {
        assert!(CLASSES.len() >= 20);
        for class in CLASSES.iter() {
            assert!(!class.abilities.is_empty(), "{} has no abilities", class.name);
            assert!(class.attack_range > 0.0);
        }
    }

    #[test]
    fn test_attack_kind_mapping() {
        assert_eq!(class_id("Mage").class().attack_kind, AttackKind::Magic);
        assert_eq!(class_id("Witch Doctor").class().attack_kind, AttackKind::Magic);
        assert_eq!(class_id("Gunner").class().attack_kind, AttackKind::Ranged);
        assert_eq!(class_id("Demolitionist").class().attack_kind, AttackKind::Ranged);
        assert_eq!(class_id("Brawler").class().attack_kind, AttackKind::Heavy);
        assert_eq!(class_id("Monk").class().attack_kind, AttackKind::Melee);
    }

    #[test]
    fn test_apply_class_bonus() {
        let base = Fighter::new(Contestant::new(1, "Wendy's"), 100);
        let paladin = apply_class(&base, class_id("Paladin"));
        assert_eq!(paladin.max_hp, 125);
        assert_eq!(paladin.hp, 125);
        assert_eq!(paladin.attack_bonus, 3);
        assert_eq!(paladin.ai_strategy, AiStrategy::Defensive);
        assert_eq!(paladin.attack_range, 150.0);
        assert_eq!(paladin.id(), 1);

        let mage = apply_class(&base, class_id("Mage"));
        assert_eq!(mage.max_hp, 90);
        assert_eq!(mage.speed_multiplier, 0.9);
    }

    #[test]
    fn test_apply_class_floors_hp_at_one() {
        let base = Fighter::new(Contestant::new(1, "Tiny"), 5);
        let mage = apply_class(&base, class_id("Mage"));
        assert_eq!(mage.max_hp, 1);
        assert_eq!(mage.hp, 1);
        assert!(mage.is_alive);
    }

    #[test]
    fn test_assign_class_is_seeded() {
        let base = Fighter::new(Contestant::new(7, "Kirby"), 100);
        let a = assign_class(&base, &mut Pcg32::seed_from_u64(42));
        let b = assign_class(&base, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.class, b.class);
        assert!(a.class.is_some());
    }

    #[test]
    fn test_pick_attack_uses_class_abilities() {
        let mut rng = Pcg32::seed_from_u64(3);
        let ranger = class_id("Ranger").class();
        for _ in 0..20 {
            let attack = pick_attack(ranger, &mut rng);
            assert!(ranger.abilities.contains(&attack.name));
            assert_eq!(attack.icon, "🏹");
            assert_eq!(attack.kind, AttackKind::Ranged);
        }
    }
}
