//! Attack resolution
//!
//! One attack per battle tick: a random alive attacker hits the closest
//! opponent within its reach, or a random opponent when nobody is in reach.

use glam::Vec2;
use rand::Rng;

use super::class::{Attack, AttackKind, pick_attack};
use super::event::SoundCue;
use super::fighter::Fighter;
use super::movement::MotionMap;

pub const BASE_DAMAGE_MIN: u32 = 10;
pub const BASE_DAMAGE_MAX: u32 = 20;
pub const CRIT_CHANCE: f64 = 0.15;
pub const CRIT_MULTIPLIER: f32 = 1.5;

/// Random part of an attack's damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    /// Uniform in [`BASE_DAMAGE_MIN`, `BASE_DAMAGE_MAX`]
    pub base: u32,
    pub critical: bool,
}

/// Result of one attack against a defender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: u32,
    pub critical: bool,
    /// Defender HP after the hit
    pub hp_after: u32,
    pub eliminated: bool,
}

/// One performed attack, with everything needed to report it
#[derive(Debug, Clone, PartialEq)]
pub struct AttackReport {
    /// Index of the attacker in the fighter list
    pub attacker: usize,
    pub defender: usize,
    pub attack: Attack,
    pub outcome: AttackOutcome,
    pub from: Vec2,
    pub to: Vec2,
}

pub fn roll_damage<R: Rng + ?Sized>(rng: &mut R) -> DamageRoll {
    DamageRoll {
        base: rng.random_range(BASE_DAMAGE_MIN..=BASE_DAMAGE_MAX),
        critical: rng.random_bool(CRIT_CHANCE),
    }
}

/// Final damage: base plus class bonus, then x1.5 (floored) on a crit
pub fn compute_damage(base: u32, attack_bonus: i32, critical: bool) -> u32 {
    let damage = (base as i64 + attack_bonus as i64).max(0) as u32;
    if critical {
        (damage as f32 * CRIT_MULTIPLIER).floor() as u32
    } else {
        damage
    }
}

/// Work out what `roll` does to `defender` without touching either fighter
pub fn resolve_attack(attacker: &Fighter, defender: &Fighter, roll: DamageRoll) -> AttackOutcome {
    let damage = compute_damage(roll.base, attacker.attack_bonus, roll.critical);
    let hp_after = defender.hp.saturating_sub(damage);
    AttackOutcome {
        damage,
        critical: roll.critical,
        hp_after,
        eliminated: defender.is_alive && hp_after == 0,
    }
}

/// Pick a random alive fighter. Returns an index into `fighters`.
pub fn select_attacker<R: Rng + ?Sized>(fighters: &[Fighter], rng: &mut R) -> Option<usize> {
    let alive: Vec<usize> = (0..fighters.len()).filter(|&i| fighters[i].is_alive).collect();
    if alive.is_empty() {
        return None;
    }
    Some(alive[rng.random_range(0..alive.len())])
}

/// Closest alive opponent within the attacker's reach (first wins ties),
/// else a uniformly random alive opponent
pub fn select_target<R: Rng + ?Sized>(
    attacker: usize,
    fighters: &[Fighter],
    motions: &MotionMap,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = (0..fighters.len())
        .filter(|&i| i != attacker && fighters[i].is_alive)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let reach = fighters[attacker].attack_range;
    let in_range = motions.get(&fighters[attacker].id()).and_then(|from| {
        let mut best: Option<(usize, f32)> = None;
        for &i in &candidates {
            let Some(to) = motions.get(&fighters[i].id()) else {
                continue;
            };
            let dist = from.pos.distance(to.pos);
            if dist > reach {
                continue;
            }
            match best {
                Some((_, d)) if d <= dist => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i)
    });

    in_range.or_else(|| Some(candidates[rng.random_range(0..candidates.len())]))
}

/// Run one full attack: select, roll, apply the damage
///
/// A `forced` roll replaces the random one. Returns `None` when fewer than
/// two fighters are alive.
pub fn perform_attack<R: Rng + ?Sized>(
    fighters: &mut [Fighter],
    motions: &MotionMap,
    forced: Option<DamageRoll>,
    rng: &mut R,
) -> Option<AttackReport> {
    if fighters.iter().filter(|f| f.is_alive).count() < 2 {
        return None;
    }
    let attacker = select_attacker(fighters, rng)?;
    let defender = select_target(attacker, fighters, motions, rng)?;

    let attack = match fighters[attacker].class {
        Some(id) => pick_attack(id.class(), rng),
        None => Attack {
            name: "Strike",
            icon: "⚔️",
            kind: AttackKind::Melee,
        },
    };
    let roll = forced.unwrap_or_else(|| roll_damage(rng));
    let outcome = resolve_attack(&fighters[attacker], &fighters[defender], roll);
    fighters[defender].take_damage(outcome.damage);

    let pos = |i: usize| {
        motions
            .get(&fighters[i].id())
            .map(|m| m.pos)
            .unwrap_or(Vec2::ZERO)
    };

    Some(AttackReport {
        attacker,
        defender,
        attack,
        outcome,
        from: pos(attacker),
        to: pos(defender),
    })
}

/// Sound for an attack: crits first, then the attack family
pub fn attack_cue(attack: &Attack, critical: bool) -> SoundCue {
    if critical {
        return SoundCue::CriticalHit;
    }
    match attack.kind {
        AttackKind::Magic => SoundCue::MagicAttack,
        AttackKind::Heavy => SoundCue::HeavyAttack,
        AttackKind::Ranged => SoundCue::RangedAttack,
        AttackKind::Melee => SoundCue::Hit,
    }
}

/// Battle log line for an attack
pub fn attack_log_line(report: &AttackReport, fighters: &[Fighter]) -> String {
    let crit = if report.outcome.critical { " CRITICAL HIT!" } else { "" };
    format!(
        "{} {} uses {}! Deals {} damage to {}{}",
        report.attack.icon,
        fighters[report.attacker].name(),
        report.attack.name,
        report.outcome.damage,
        fighters[report.defender].name(),
        crit
    )
}
