//! Per-fighter movement AI and kinematics
//!
//! Every alive fighter re-decides where to go every 0.6-1.2 s based on its
//! class strategy and the nearest opponent, then walks along its platform or
//! jumps to another one. Walking is clamped to the platform; jumps are free
//! flight that land exactly on the chosen point.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::arena::ArenaLayout;
use super::class::AiStrategy;
use super::fighter::Fighter;
use crate::direction_toward;

/// Seconds between movement decisions
pub const DECISION_INTERVAL: (f32, f32) = (0.6, 1.2);
/// Seconds a walk lasts before the fighter stops
pub const WALK_DURATION: (f32, f32) = (0.5, 1.0);
/// Seconds a no-opponent wander lasts
pub const WANDER_DURATION: f32 = 1.0;
/// Seconds a platform jump takes
pub const JUMP_DURATION: f32 = 0.6;

/// Which way a fighter sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn from_dir(dir: f32) -> Self {
        if dir > 0.0 { Facing::Right } else { Facing::Left }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MotionState {
    #[default]
    Idle,
    Walking,
    Jumping,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Jump {
    target: Vec2,
    platform: usize,
    remaining: f32,
}

/// Kinematic state of one fighter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motion {
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub facing: Facing,
    pub state: MotionState,
    /// Platform being stood on; walking is clamped to it (none mid-jump)
    #[serde(skip)]
    pub platform: Option<usize>,
    #[serde(skip)]
    decision_timer: f32,
    #[serde(skip)]
    walk_timer: f32,
    #[serde(skip)]
    jump: Option<Jump>,
}

impl Motion {
    /// Standing still at `pos`, ready to decide on the first step
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: Facing::default(),
            state: MotionState::Idle,
            platform: None,
            decision_timer: 0.0,
            walk_timer: 0.0,
            jump: None,
        }
    }

    /// Same, standing on `platform`
    pub fn on(platform: Option<usize>, pos: Vec2) -> Self {
        Self {
            platform,
            ..Self::at(pos)
        }
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// Tick walk and jump timers
    fn advance_timers(&mut self, dt: f32) {
        self.decision_timer -= dt;

        if let Some(jump) = self.jump.as_mut() {
            jump.remaining -= dt;
            if jump.remaining <= 0.0 {
                self.pos = jump.target;
                self.platform = Some(jump.platform);
                self.jump = None;
                self.stop();
            }
        } else if self.state == MotionState::Walking {
            self.walk_timer -= dt;
            if self.walk_timer <= 0.0 {
                self.stop();
            }
        }
    }

    fn stop(&mut self) {
        self.vel = Vec2::ZERO;
        self.state = MotionState::Idle;
    }

    /// Start executing a decision. Returns true when it starts a jump.
    fn apply(&mut self, decision: Decision) -> bool {
        match decision {
            Decision::Walk {
                speed,
                facing,
                duration,
            } => {
                self.vel = Vec2::new(speed, 0.0);
                self.facing = facing;
                self.state = MotionState::Walking;
                self.walk_timer = duration;
                false
            }
            Decision::Jump { target, platform } => {
                let delta = target - self.pos;
                self.vel = delta / JUMP_DURATION;
                self.facing = Facing::from_dir(delta.x);
                self.state = MotionState::Jumping;
                self.platform = None;
                self.jump = Some(Jump {
                    target,
                    platform,
                    remaining: JUMP_DURATION,
                });
                true
            }
        }
    }

    /// Platform being stood on, looked up from the position when unknown
    fn standing_on(&mut self, arena: &ArenaLayout) -> Option<usize> {
        if self.is_jumping() {
            return None;
        }
        if self.platform.is_none_or(|idx| idx >= arena.platforms.len()) {
            self.platform = arena.platform_under(self.pos);
        }
        self.platform
    }

    /// Move by the current velocity
    fn integrate(&mut self, arena: &ArenaLayout, dt: f32) {
        if self.is_jumping() {
            self.pos += self.vel * dt;
        } else if self.vel.x != 0.0 {
            if let Some(idx) = self.standing_on(arena) {
                let (min, max) = arena.platforms[idx].walk_bounds();
                self.pos.x = (self.pos.x + self.vel.x * dt).clamp(min, max);
            }
        }
    }
}

/// Fighter id -> motion, iterated in id order
pub type MotionMap = BTreeMap<u32, Motion>;

/// What a fighter decided to do next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Walk with signed horizontal `speed` for `duration` seconds
    Walk {
        speed: f32,
        facing: Facing,
        duration: f32,
    },
    /// Jump to a standing point on platform `platform`
    Jump { target: Vec2, platform: usize },
}

/// Where the nearest opponent is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opponent {
    pub pos: Vec2,
    /// Platform the opponent stands on (none while mid-jump)
    pub platform: Option<usize>,
}

/// Nearest other fighter in `snapshot`; ties go to the earlier entry
pub fn nearest_opponent(id: u32, pos: Vec2, snapshot: &[(u32, Vec2)]) -> Option<(u32, Vec2)> {
    let mut best: Option<(u32, Vec2, f32)> = None;
    for &(other, other_pos) in snapshot {
        if other == id {
            continue;
        }
        let dist = pos.distance(other_pos);
        match best {
            Some((_, _, d)) if d <= dist => {}
            _ => best = Some((other, other_pos, dist)),
        }
    }
    best.map(|(other, other_pos, _)| (other, other_pos))
}

fn random_dir<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { -1.0 } else { 1.0 }
}

fn walk<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32), dir: f32, facing: Facing) -> Decision {
    Decision::Walk {
        speed: rng.random_range(lo..hi) * dir,
        facing,
        duration: rng.random_range(WALK_DURATION.0..WALK_DURATION.1),
    }
}

/// Decide the next move for a fighter standing on `platform`
pub fn decide<R: Rng + ?Sized>(
    strategy: AiStrategy,
    range: f32,
    pos: Vec2,
    platform: usize,
    opponent: Option<Opponent>,
    arena: &ArenaLayout,
    rng: &mut R,
) -> Decision {
    let Some(enemy) = opponent else {
        let dir = random_dir(rng);
        return Decision::Walk {
            speed: rng.random_range(30.0..60.0) * dir,
            facing: Facing::from_dir(dir),
            duration: WANDER_DURATION,
        };
    };

    let dist = pos.distance(enemy.pos);
    let toward = direction_toward(pos, enemy.pos);
    let away = -toward;
    let face_enemy = Facing::from_dir(toward);
    let jump_near = |idx: usize, x: f32| Decision::Jump {
        target: arena.platforms[idx].closest_stand_point(Vec2::new(x, pos.y)),
        platform: idx,
    };

    match strategy {
        AiStrategy::Aggressive => {
            if dist > range * 0.8 {
                match enemy.platform {
                    Some(p) if p != platform => jump_near(p, enemy.pos.x + rng.random_range(-50.0..50.0)),
                    _ => walk(rng, (80.0, 120.0), toward, face_enemy),
                }
            } else {
                walk(rng, (30.0, 50.0), toward, face_enemy)
            }
        }
        AiStrategy::Sniper => {
            let highest = arena.highest_platform();
            match highest {
                Some(h) if h != platform && dist < range * 1.2 => Decision::Jump {
                    target: arena.platforms[h].random_stand_point(rng),
                    platform: h,
                },
                _ if dist < range * 0.7 => walk(rng, (60.0, 100.0), away, Facing::from_dir(away)),
                _ => {
                    let dir = random_dir(rng);
                    walk(rng, (20.0, 40.0), dir, face_enemy)
                }
            }
        }
        AiStrategy::Caster => {
            let optimal = range * 0.6;
            if dist < optimal * 0.7 {
                walk(rng, (50.0, 80.0), away, Facing::from_dir(away))
            } else if dist > optimal * 1.5 && enemy.platform.is_some() {
                match enemy.platform {
                    Some(p) if p != platform => jump_near(p, enemy.pos.x + rng.random_range(-100.0..100.0)),
                    _ => walk(rng, (40.0, 70.0), toward, face_enemy),
                }
            } else {
                let dir = random_dir(rng);
                walk(rng, (30.0, 50.0), dir, face_enemy)
            }
        }
        AiStrategy::Flanker => {
            let angle = (enemy.pos.y - pos.y).atan2(enemy.pos.x - pos.x) + std::f32::consts::FRAC_PI_2;
            let circle = enemy.pos + Vec2::new(angle.cos(), angle.sin()) * range * 0.8;
            match arena.nearest_platform(circle) {
                Some(p) if p != platform => Decision::Jump {
                    target: arena.platforms[p].closest_stand_point(circle),
                    platform: p,
                },
                _ => {
                    let dir = random_dir(rng);
                    walk(rng, (70.0, 110.0), dir, Facing::from_dir(dir))
                }
            }
        }
        AiStrategy::Kiting => {
            if dist < range * 0.8 {
                walk(rng, (70.0, 110.0), away, Facing::from_dir(away))
            } else {
                let dir = random_dir(rng);
                walk(rng, (50.0, 80.0), dir, face_enemy)
            }
        }
        AiStrategy::Defensive => {
            let dir = random_dir(rng);
            walk(rng, (20.0, 40.0), dir, face_enemy)
        }
        AiStrategy::Balanced => {
            if dist > range * 0.9 {
                walk(rng, (60.0, 90.0), toward, face_enemy)
            } else if dist < range * 0.4 {
                walk(rng, (40.0, 70.0), away, Facing::from_dir(away))
            } else {
                walk(rng, (40.0, 60.0), toward, face_enemy)
            }
        }
    }
}

/// Advance every alive fighter by `dt` seconds
///
/// Decisions read positions from a snapshot taken before anyone moves this
/// step. Returns the ids of fighters that started a jump.
pub fn step<R: Rng + ?Sized>(
    fighters: &[Fighter],
    motions: &mut MotionMap,
    arena: &ArenaLayout,
    dt: f32,
    rng: &mut R,
) -> Vec<u32> {
    let snapshot: Vec<(u32, Vec2)> = fighters
        .iter()
        .filter(|f| f.is_alive)
        .filter_map(|f| motions.get(&f.id()).map(|m| (f.id(), m.pos)))
        .collect();
    let standing: BTreeMap<u32, Option<usize>> = motions
        .iter_mut()
        .map(|(&id, m)| (id, m.standing_on(arena)))
        .collect();

    let mut jumped = Vec::new();
    for fighter in fighters.iter().filter(|f| f.is_alive) {
        let Some(motion) = motions.get_mut(&fighter.id()) else {
            continue;
        };

        motion.advance_timers(dt);

        if motion.decision_timer <= 0.0 && !motion.is_jumping() {
            motion.decision_timer = rng.random_range(DECISION_INTERVAL.0..DECISION_INTERVAL.1);

            if let Some(platform) = motion.standing_on(arena) {
                let opponent = nearest_opponent(fighter.id(), motion.pos, &snapshot).map(|(other, pos)| Opponent {
                    pos,
                    platform: standing.get(&other).copied().flatten(),
                });
                let decision = decide(
                    fighter.ai_strategy,
                    fighter.attack_range,
                    motion.pos,
                    platform,
                    opponent,
                    arena,
                    rng,
                );
                if motion.apply(decision) {
                    log::trace!("{} jumps", fighter.name());
                    jumped.push(fighter.id());
                }
            }
        }

        motion.integrate(arena, dt);
    }
    jumped
}
