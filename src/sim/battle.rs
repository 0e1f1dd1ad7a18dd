//! Battle orchestrator
//!
//! Ties classes, arena, movement, combat and the bracket together for one
//! battle in any mode. Everything time-based runs off a virtual clock driven
//! by [`Battle::tick`]: movement every tick, attacks and display delays as
//! one-shot timers on a [`Scheduler`]. Tearing a battle down cancels every
//! pending timer, so nothing fires against a dead battle.

use std::collections::HashSet;

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::arena::{ArenaLayout, generate_layout};
use super::bracket::{Bracket, Progress, create_bracket};
use super::class::assign_class;
use super::combat::{self, AttackReport, DamageRoll};
use super::event::{
    BattleEvent, BattleSummary, Collaborators, Effect, EffectKind, EffectPhase, LogLine, SoundCue,
};
use super::fighter::{Contestant, Fighter};
use super::movement::{self, Facing, Motion, MotionMap, MotionState};
use super::scheduler::Scheduler;
use crate::consts::*;
use crate::settings::{BattleMode, BattleSpeed, MIN_BATTLE_SPEED_MS, Settings};

/// Why a battle could not start
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("need at least {min} contestants, got {count}", min = MIN_CONTESTANTS)]
    TooFewContestants { count: usize },
    #[error("at most {max} contestants allowed, got {count}", max = MAX_CONTESTANTS)]
    TooManyContestants { count: usize },
    #[error("contestant id {id} appears more than once")]
    DuplicateContestant { id: u32 },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Battle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BattlePhase {
    /// Setting up the next match
    Initializing,
    /// Fighters moving and attacking
    Active,
    /// Tournament match over, next match pending
    MatchConcluded,
    /// Winner decided (reported after a short delay)
    BattleConcluded,
    /// Cancelled; nothing runs any more
    TornDown,
}

/// Timer payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Attack,
    ShowEffect(u64),
    ExpireEffect(u64),
    NextMatch,
    ReportWinner,
}

/// Check contestant count, duplicate ids and settings
pub fn validate_setup(contestants: &[Contestant], settings: &Settings) -> Result<(), SetupError> {
    let count = contestants.len();
    if count < MIN_CONTESTANTS {
        return Err(SetupError::TooFewContestants { count });
    }
    if count > MAX_CONTESTANTS {
        return Err(SetupError::TooManyContestants { count });
    }
    let mut seen = HashSet::new();
    for c in contestants {
        if !seen.insert(c.id) {
            return Err(SetupError::DuplicateContestant { id: c.id });
        }
    }
    settings.validate().map_err(SetupError::InvalidSettings)
}

/// Start a battle
///
/// On error no battle exists and the caller may fix the input and retry.
pub fn start_battle(
    contestants: Vec<Contestant>,
    settings: Settings,
    seed: u64,
    collaborators: Collaborators,
) -> Result<Battle, SetupError> {
    validate_setup(&contestants, &settings)?;

    let mut rng = Pcg32::seed_from_u64(seed);
    let fighter_count = match settings.mode {
        BattleMode::FreeForAll => contestants.len(),
        BattleMode::Tournament | BattleMode::Duel => 2,
    };
    let arena = generate_layout(
        ARENA_WIDTH,
        ARENA_HEIGHT,
        fighter_count,
        settings.arena_preset,
        &mut rng,
    );

    log::info!(
        "Battle starting: {} contestants, mode {}, arena {}",
        contestants.len(),
        settings.mode.as_str(),
        settings.arena_preset.as_str()
    );

    let mut battle = Battle {
        settings,
        contestants,
        rng,
        scheduler: Scheduler::new(),
        phase: BattlePhase::Initializing,
        fighters: Vec::new(),
        motions: MotionMap::new(),
        arena,
        bracket: None,
        current_match: None,
        log: Vec::new(),
        next_log_id: 0,
        events: Vec::new(),
        effects: Vec::new(),
        next_effect_id: 0,
        pending_winner: None,
        final_winner: None,
        clock_ms: 0.0,
        forced_roll: None,
        collaborators,
    };
    battle.initialize();
    Ok(battle)
}

/// A running battle
pub struct Battle {
    settings: Settings,
    contestants: Vec<Contestant>,
    rng: Pcg32,
    scheduler: Scheduler<Action>,
    phase: BattlePhase,
    fighters: Vec<Fighter>,
    motions: MotionMap,
    arena: ArenaLayout,
    bracket: Option<Bracket>,
    /// (round, match) being fought in tournament mode
    current_match: Option<(usize, usize)>,
    log: Vec<LogLine>,
    next_log_id: u64,
    events: Vec<BattleEvent>,
    effects: Vec<Effect>,
    next_effect_id: u64,
    pending_winner: Option<Fighter>,
    final_winner: Option<Fighter>,
    clock_ms: f64,
    /// Replaces the random damage roll when set
    forced_roll: Option<DamageRoll>,
    collaborators: Collaborators,
}

impl Battle {
    fn initialize(&mut self) {
        match self.settings.mode {
            BattleMode::FreeForAll => {
                let entrants = self.contestants.clone();
                self.push_log(format!(
                    "⚔️ FREE FOR ALL! {} contestants enter the arena!",
                    entrants.len()
                ));
                self.push_log("🔥 Only one will remain standing!");
                self.begin_match(&entrants, None);
            }
            BattleMode::Duel => {
                let mut pair = self.contestants.clone();
                pair.shuffle(&mut self.rng);
                pair.truncate(2);
                if self.contestants.len() > 2 {
                    log::info!(
                        "Duel drew {} and {} from {} contestants",
                        pair[0].name,
                        pair[1].name,
                        self.contestants.len()
                    );
                }
                self.begin_match(&pair, None);
            }
            BattleMode::Tournament => {
                let bracket = create_bracket(&self.contestants, &mut self.rng).process_byes();
                self.bracket = Some(bracket);
                self.start_tournament_match();
            }
        }
    }

    /// Advance the battle by one fixed step of `dt` seconds
    ///
    /// Fires every timer that comes due, then moves the fighters. Does
    /// nothing once the battle is torn down.
    pub fn tick(&mut self, dt: f32) {
        if self.phase == BattlePhase::TornDown {
            return;
        }
        self.effects.retain(|e| e.phase != EffectPhase::Expired);

        self.clock_ms += dt as f64 * 1000.0;
        let until = self.clock_ms as u64;
        while let Some(action) = self.scheduler.pop_due(until) {
            self.handle(action);
        }

        if self.phase == BattlePhase::Active {
            let jumped = movement::step(
                &self.fighters,
                &mut self.motions,
                &self.arena,
                dt,
                &mut self.rng,
            );
            for fighter in jumped {
                self.collaborators.audio.notify(SoundCue::Jump);
                self.events.push(BattleEvent::Jumped { fighter });
            }
        }
    }

    fn handle(&mut self, action: Action) {
        match action {
            Action::Attack => self.attack(),
            Action::ShowEffect(id) => {
                if let Some(effect) = self.effects.iter_mut().find(|e| e.id == id) {
                    effect.phase = EffectPhase::Shown;
                    let lifetime = effect.kind.lifetime_ms();
                    self.scheduler.schedule(lifetime, Action::ExpireEffect(id));
                }
            }
            Action::ExpireEffect(id) => {
                if let Some(effect) = self.effects.iter_mut().find(|e| e.id == id) {
                    effect.phase = EffectPhase::Expired;
                }
            }
            Action::NextMatch => {
                self.log.clear();
                self.arena = generate_layout(
                    ARENA_WIDTH,
                    ARENA_HEIGHT,
                    2,
                    self.settings.arena_preset,
                    &mut self.rng,
                );
                self.start_tournament_match();
            }
            Action::ReportWinner => self.report_winner(),
        }
    }

    /// Set up the bracket's next match, or crown the champion
    fn start_tournament_match(&mut self) {
        self.phase = BattlePhase::Initializing;

        enum Next {
            Champion(Contestant),
            Match((usize, usize), [Contestant; 2], Progress),
            Stuck,
        }

        let next = match self.bracket.as_ref() {
            None => Next::Stuck,
            Some(bracket) => match (bracket.champion(), bracket.next_match()) {
                (Some(champion), _) => Next::Champion(champion.clone()),
                (None, Some(m)) => Next::Match(
                    (m.round, m.index),
                    [m.fighter1.clone(), m.fighter2.clone()],
                    bracket.progress(),
                ),
                (None, None) => Next::Stuck,
            },
        };

        match next {
            Next::Champion(champion) => self.crown(champion),
            Next::Match(slot, pair, progress) => {
                self.push_log(format!(
                    "📊 Round {} of {}",
                    progress.current_round, progress.total_rounds
                ));
                log::info!(
                    "Round {} of {}: {} vs {}",
                    progress.current_round,
                    progress.total_rounds,
                    pair[0].name,
                    pair[1].name
                );
                self.current_match = Some(slot);
                self.begin_match(&pair, Some(slot));
            }
            Next::Stuck => log::warn!("Bracket has no playable match and no champion"),
        }
    }

    /// Create fresh fighters for `entrants`, place them and start attacking
    fn begin_match(&mut self, entrants: &[Contestant], bracket_slot: Option<(usize, usize)>) {
        let starting_hp = self.settings.starting_hp;
        self.fighters = entrants
            .iter()
            .map(|c| assign_class(&Fighter::new(c.clone(), starting_hp), &mut self.rng))
            .collect();
        self.motions = self
            .fighters
            .iter()
            .zip(&self.arena.spawn_points)
            .map(|(f, spawn)| {
                let platform = self.arena.platform_index(&spawn.platform_id);
                (f.id(), Motion::on(platform, spawn.pos))
            })
            .collect();

        if let [a, b] = self.fighters.as_slice() {
            let line = format!(
                "⚔️ Battle begins! {} {} ({}) vs {} {} ({})",
                a.class.map(|c| c.class().icon).unwrap_or("⚔️"),
                a.name(),
                a.class_name(),
                b.class.map(|c| c.class().icon).unwrap_or("⚔️"),
                b.name(),
                b.class_name()
            );
            self.push_log(line);
        }

        self.events.push(BattleEvent::MatchStarted {
            fighters: self.fighters.iter().map(Fighter::id).collect(),
            bracket_slot,
        });
        self.phase = BattlePhase::Active;
        self.scheduler
            .schedule(self.settings.battle_speed_ms, Action::Attack);
    }

    fn attack(&mut self) {
        if self.phase != BattlePhase::Active {
            return;
        }
        let Some(report) = combat::perform_attack(
            &mut self.fighters,
            &self.motions,
            self.forced_roll,
            &mut self.rng,
        ) else {
            return;
        };

        let line = combat::attack_log_line(&report, &self.fighters);
        log::debug!("{}", line);
        self.push_log(line);
        self.collaborators
            .audio
            .notify(combat::attack_cue(&report.attack, report.outcome.critical));

        let attacker_id = self.fighters[report.attacker].id();
        let defender_id = self.fighters[report.defender].id();
        self.events.push(BattleEvent::Attack {
            attacker: attacker_id,
            defender: defender_id,
            ability: report.attack.name,
            icon: report.attack.icon,
            kind: report.attack.kind,
            from: report.from,
            to: report.to,
        });
        self.events.push(BattleEvent::Damage {
            defender: defender_id,
            damage: report.outcome.damage,
            critical: report.outcome.critical,
            hp_after: report.outcome.hp_after,
        });
        self.spawn_attack_effects(&report, attacker_id, defender_id);

        if report.outcome.eliminated {
            let name = self.fighters[report.defender].name().to_string();
            self.push_log(format!("💀 {} has been eliminated!", name));
            self.collaborators.audio.notify(SoundCue::Defeat);
            self.events.push(BattleEvent::Eliminated {
                fighter: defender_id,
            });
        }

        let alive: Vec<usize> = (0..self.fighters.len())
            .filter(|&i| self.fighters[i].is_alive)
            .collect();
        match alive.as_slice() {
            [winner] => self.conclude_match(*winner),
            [] => log::warn!("No fighters left standing"),
            _ => {
                self.scheduler
                    .schedule(self.settings.battle_speed_ms, Action::Attack);
            }
        }
    }

    fn spawn_attack_effects(&mut self, report: &AttackReport, attacker: u32, defender: u32) {
        let AttackReport {
            attack, outcome, ..
        } = report;

        self.spawn_effect(
            EffectKind::Projectile {
                from: report.from,
                to: report.to,
                icon: attack.icon,
                kind: attack.kind,
            },
            0,
        );
        self.spawn_effect(
            EffectKind::DamageNumber {
                pos: report.to - Vec2::new(0.0, 30.0),
                damage: outcome.damage,
                critical: outcome.critical,
                icon: attack.icon,
            },
            PROJECTILE_FLIGHT_MS,
        );
        self.spawn_effect(
            EffectKind::Particles {
                pos: report.to,
                critical: outcome.critical,
                kind: attack.kind,
            },
            PROJECTILE_FLIGHT_MS,
        );
        self.spawn_effect(EffectKind::Lunge { fighter: attacker }, 0);
        self.spawn_effect(EffectKind::Knockback { fighter: defender }, 0);
        if outcome.damage >= SCREEN_SHAKE_DAMAGE || outcome.critical {
            self.spawn_effect(EffectKind::ScreenShake, 0);
        }
    }

    /// Add an effect, shown now or after `delay_ms`
    fn spawn_effect(&mut self, kind: EffectKind, delay_ms: u64) {
        let id = self.next_effect_id;
        self.next_effect_id += 1;

        let phase = if delay_ms == 0 {
            self.scheduler
                .schedule(kind.lifetime_ms(), Action::ExpireEffect(id));
            EffectPhase::Shown
        } else {
            self.scheduler.schedule(delay_ms, Action::ShowEffect(id));
            EffectPhase::Pending
        };
        self.effects.push(Effect { id, kind, phase });
    }

    fn conclude_match(&mut self, winner_idx: usize) {
        let winner = self.fighters[winner_idx].clone();
        self.push_log("💀 All others have been defeated!");
        self.push_log(format!("👑 {} WINS!", winner.name()));
        self.collaborators.audio.notify(SoundCue::Victory);
        self.events.push(BattleEvent::MatchEnded { winner: winner.id() });
        log::info!("{} wins the match as {}", winner.name(), winner.class_name());

        for motion in self.motions.values_mut() {
            *motion = Motion::on(motion.platform, motion.pos);
        }

        let summary = BattleSummary {
            winner: winner.clone(),
            contestants: self.fighters.clone(),
            settings: self.settings.clone(),
            duration_secs: self.elapsed_secs(),
        };
        if let Err(e) = self.collaborators.history.record_battle(&summary) {
            log::warn!("Battle result not saved: {}", e);
        }

        if self.settings.mode != BattleMode::Tournament {
            self.phase = BattlePhase::BattleConcluded;
            self.pending_winner = Some(winner);
            self.scheduler
                .schedule(WINNER_DISPLAY_DELAY_MS, Action::ReportWinner);
            return;
        }

        self.phase = BattlePhase::MatchConcluded;
        let updated = match (self.bracket.as_ref(), self.current_match) {
            (Some(bracket), Some((round, index))) => bracket
                .update_with_winner(round, index, winner.id())
                .map(|b| b.process_byes()),
            _ => None,
        };
        match updated {
            Some(bracket) => self.bracket = Some(bracket),
            None => log::warn!("Could not record {} in the bracket", winner.name()),
        }
        self.current_match = None;

        let champion = self.bracket.as_ref().and_then(|b| b.champion().cloned());
        match champion {
            Some(champion) => self.crown(champion),
            None => {
                self.scheduler
                    .schedule(MATCH_DISPLAY_DELAY_MS, Action::NextMatch);
            }
        }
    }

    fn crown(&mut self, champion: Contestant) {
        self.push_log(format!("🏆 {} is the TOURNAMENT CHAMPION! 🏆", champion.name));
        log::info!("Tournament champion: {}", champion.name);

        let winner = self
            .fighters
            .iter()
            .find(|f| f.id() == champion.id)
            .cloned()
            .unwrap_or_else(|| Fighter::new(champion, self.settings.starting_hp));
        self.phase = BattlePhase::BattleConcluded;
        self.pending_winner = Some(winner);
        self.scheduler
            .schedule(CHAMPION_DISPLAY_DELAY_MS, Action::ReportWinner);
    }

    fn report_winner(&mut self) {
        let Some(winner) = self.pending_winner.take() else {
            return;
        };
        log::info!("Final winner: {}", winner.name());
        self.events.push(BattleEvent::BattleEnded { winner: winner.id() });
        if let Some(on_end) = self.collaborators.on_battle_end.as_mut() {
            on_end(&winner);
        }
        self.final_winner = Some(winner);
    }

    /// Change the attack cadence; takes effect from the next scheduled attack
    pub fn set_battle_speed(&mut self, ms: u64) {
        if self.phase == BattlePhase::TornDown {
            return;
        }
        let ms = ms.max(MIN_BATTLE_SPEED_MS);
        self.settings.battle_speed_ms = ms;
        let label = BattleSpeed::from_millis(ms)
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| format!("{} ms", ms));
        self.push_log(format!("⚡ Battle speed changed to {}", label));
    }

    /// Make every following attack use `roll` instead of a random one;
    /// `None` goes back to random rolls
    pub fn force_damage_roll(&mut self, roll: Option<DamageRoll>) {
        self.forced_roll = roll;
    }

    /// Cancel everything: pending attacks, effects and delayed reports
    pub fn teardown(&mut self) {
        if self.phase == BattlePhase::TornDown {
            return;
        }
        log::info!(
            "Battle torn down with {} pending timers",
            self.scheduler.pending()
        );
        self.scheduler.cancel_all();
        self.effects.clear();
        self.pending_winner = None;
        self.phase = BattlePhase::TornDown;
    }

    fn push_log(&mut self, text: impl Into<String>) {
        let id = self.next_log_id;
        self.next_log_id += 1;
        self.log.push(LogLine {
            id,
            text: text.into(),
        });
    }

    // Read access for presentation and tests

    #[inline]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    pub fn alive_count(&self) -> usize {
        self.fighters.iter().filter(|f| f.is_alive).count()
    }

    pub fn motion(&self, id: u32) -> Option<&Motion> {
        self.motions.get(&id)
    }

    pub fn position(&self, id: u32) -> Option<Vec2> {
        self.motions.get(&id).map(|m| m.pos)
    }

    pub fn arena(&self) -> &ArenaLayout {
        &self.arena
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    pub fn current_match(&self) -> Option<(usize, usize)> {
        self.current_match
    }

    pub fn progress(&self) -> Option<Progress> {
        self.bracket.as_ref().map(Bracket::progress)
    }

    pub fn battle_log(&self) -> &[LogLine] {
        &self.log
    }

    /// Log lines with an id of at least `id`
    ///
    /// Ids keep counting when the log restarts for a new tournament match.
    pub fn log_since(&self, id: u64) -> impl Iterator<Item = &LogLine> + '_ {
        self.log.iter().filter(move |l| l.id >= id)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// The reported winner, once the display delay has passed
    pub fn final_winner(&self) -> Option<&Fighter> {
        self.final_winner.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.final_winner.is_some()
    }

    /// Number of timers waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Virtual milliseconds since the battle started
    pub fn elapsed_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms() / 1000
    }

    /// Serializable view of everything the presentation layer draws
    pub fn snapshot(&self) -> BattleSnapshot<'_> {
        BattleSnapshot {
            phase: self.phase,
            fighters: self
                .fighters
                .iter()
                .map(|f| {
                    let motion = self.motions.get(&f.id());
                    FighterView {
                        id: f.id(),
                        name: f.name(),
                        image: f.contestant.image.as_deref(),
                        color: &f.contestant.color,
                        initial: f.contestant.initial(),
                        hp: f.hp,
                        max_hp: f.max_hp,
                        hp_percent: f.hp_percent(),
                        is_alive: f.is_alive,
                        class_name: f.class_name(),
                        class_icon: f.class.map(|c| c.class().icon).unwrap_or(""),
                        pos: motion.map(|m| m.pos).unwrap_or(Vec2::ZERO),
                        facing: motion.map(|m| m.facing).unwrap_or_default(),
                        state: motion.map(|m| m.state).unwrap_or_default(),
                    }
                })
                .collect(),
            arena: &self.arena,
            effects: &self.effects,
            log: &self.log,
            progress: self.progress(),
            winner: self.final_winner.as_ref().map(Fighter::id),
        }
    }
}

/// Per-fighter render data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FighterView<'a> {
    pub id: u32,
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub color: &'a str,
    pub initial: char,
    pub hp: u32,
    pub max_hp: u32,
    pub hp_percent: f32,
    pub is_alive: bool,
    pub class_name: &'static str,
    pub class_icon: &'static str,
    pub pos: Vec2,
    pub facing: Facing,
    pub state: MotionState,
}

/// Everything needed to draw one frame
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSnapshot<'a> {
    pub phase: BattlePhase,
    pub fighters: Vec<FighterView<'a>>,
    pub arena: &'a ArenaLayout,
    pub effects: &'a [Effect],
    pub log: &'a [LogLine],
    pub progress: Option<Progress>,
    pub winner: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::sim::event::AudioSink;

    fn contestants(n: u32) -> Vec<Contestant> {
        (1..=n).map(|i| Contestant::new(i, format!("C{}", i))).collect()
    }

    fn settings(mode: BattleMode) -> Settings {
        Settings {
            battle_speed_ms: 100,
            starting_hp: 40,
            ..Settings::for_mode(mode)
        }
    }

    fn run_until_finished(battle: &mut Battle, max_ms: u64) {
        let steps = max_ms * 60 / 1000;
        for _ in 0..steps {
            if battle.is_finished() {
                return;
            }
            battle.tick(MOVEMENT_DT);
        }
    }

    #[derive(Clone, Default)]
    struct Cues(Rc<RefCell<Vec<SoundCue>>>);

    impl AudioSink for Cues {
        fn notify(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    #[test]
    fn test_setup_validation() {
        let s = Settings::default();
        assert_eq!(
            validate_setup(&contestants(1), &s),
            Err(SetupError::TooFewContestants { count: 1 })
        );
        assert_eq!(
            validate_setup(&contestants(17), &s),
            Err(SetupError::TooManyContestants { count: 17 })
        );
        let mut dupes = contestants(3);
        dupes[2].id = 1;
        assert_eq!(
            validate_setup(&dupes, &s),
            Err(SetupError::DuplicateContestant { id: 1 })
        );
        let bad = Settings {
            starting_hp: 0,
            ..Settings::default()
        };
        assert!(matches!(
            validate_setup(&contestants(2), &bad),
            Err(SetupError::InvalidSettings(_))
        ));
        assert!(start_battle(contestants(0), s, 1, Collaborators::default()).is_err());
    }

    #[test]
    fn test_free_for_all_spawns_everyone() {
        let battle = start_battle(
            contestants(6),
            settings(BattleMode::FreeForAll),
            3,
            Collaborators::default(),
        )
        .unwrap();
        assert_eq!(battle.phase(), BattlePhase::Active);
        assert_eq!(battle.fighters().len(), 6);
        for f in battle.fighters() {
            assert!(f.class.is_some());
            let motion = battle.motion(f.id()).unwrap();
            let platform = &battle.arena().platforms[motion.platform.unwrap()];
            assert_eq!(motion.pos.y, platform.stand_y());
        }
        assert!(battle.battle_log()[0].text.contains("FREE FOR ALL! 6"));
    }

    #[test]
    fn test_duel_draws_two() {
        let battle = start_battle(
            contestants(5),
            settings(BattleMode::Duel),
            4,
            Collaborators::default(),
        )
        .unwrap();
        assert_eq!(battle.fighters().len(), 2);
        assert!(battle.battle_log()[0].text.starts_with("⚔️ Battle begins!"));
    }

    #[test]
    fn test_free_for_all_reaches_winner() {
        let cues = Cues::default();
        let mut battle = start_battle(
            contestants(4),
            settings(BattleMode::FreeForAll),
            9,
            Collaborators::default().with_audio(cues.clone()),
        )
        .unwrap();
        run_until_finished(&mut battle, 120_000);

        assert!(battle.is_finished());
        assert_eq!(battle.phase(), BattlePhase::BattleConcluded);
        assert_eq!(battle.alive_count(), 1);
        let winner = battle.final_winner().unwrap();
        assert!(winner.is_alive);
        for f in battle.fighters() {
            assert!(f.hp <= f.max_hp);
            assert_eq!(f.is_alive, f.hp > 0);
        }

        let cues = cues.0.borrow();
        assert_eq!(cues.iter().filter(|c| **c == SoundCue::Defeat).count(), 3);
        assert_eq!(cues.iter().filter(|c| **c == SoundCue::Victory).count(), 1);
        assert!(battle.battle_log().iter().any(|l| l.text.ends_with("WINS!")));
    }

    #[test]
    fn test_attack_cadence_follows_battle_speed() {
        let mut battle = start_battle(
            contestants(2),
            Settings {
                battle_speed_ms: 500,
                starting_hp: 1000,
                ..Settings::for_mode(BattleMode::Duel)
            },
            5,
            Collaborators::default(),
        )
        .unwrap();

        let attacks = |b: &mut Battle| {
            b.drain_events()
                .iter()
                .filter(|e| matches!(e, BattleEvent::Attack { .. }))
                .count()
        };
        // 2.1 s at 500 ms: attacks at 0.5, 1.0, 1.5, 2.0
        for _ in 0..126 {
            battle.tick(MOVEMENT_DT);
        }
        assert_eq!(attacks(&mut battle), 4);

        battle.set_battle_speed(BattleSpeed::UltraFast.millis());
        assert!(battle.battle_log().last().unwrap().text.contains("Ultra Fast"));
    }

    #[test]
    fn test_effect_lifecycle() {
        let mut battle = start_battle(
            contestants(2),
            Settings {
                battle_speed_ms: 1000,
                starting_hp: 1000,
                ..Settings::for_mode(BattleMode::Duel)
            },
            6,
            Collaborators::default(),
        )
        .unwrap();

        // First attack lands at 1000 ms
        for _ in 0..61 {
            battle.tick(MOVEMENT_DT);
        }
        let phase_of = |b: &Battle, pred: fn(&EffectKind) -> bool| {
            b.effects().iter().find(|e| pred(&e.kind)).map(|e| e.phase)
        };
        assert_eq!(
            phase_of(&battle, |k| matches!(k, EffectKind::Projectile { .. })),
            Some(EffectPhase::Shown)
        );
        assert_eq!(
            phase_of(&battle, |k| matches!(k, EffectKind::DamageNumber { .. })),
            Some(EffectPhase::Pending)
        );

        // 1.65 s: projectile gone, damage number showing
        for _ in 0..39 {
            battle.tick(MOVEMENT_DT);
        }
        assert_eq!(
            phase_of(&battle, |k| matches!(k, EffectKind::DamageNumber { .. })),
            Some(EffectPhase::Shown)
        );
        assert!(
            phase_of(&battle, |k| matches!(k, EffectKind::Projectile { .. }))
                .is_none_or(|p| p == EffectPhase::Expired)
        );
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut battle = start_battle(
            contestants(3),
            settings(BattleMode::FreeForAll),
            7,
            Collaborators::default(),
        )
        .unwrap();
        for _ in 0..30 {
            battle.tick(MOVEMENT_DT);
        }
        assert!(battle.pending_timers() > 0);

        battle.teardown();
        assert_eq!(battle.phase(), BattlePhase::TornDown);
        assert_eq!(battle.pending_timers(), 0);
        assert!(battle.effects().is_empty());

        let hp: Vec<u32> = battle.fighters().iter().map(|f| f.hp).collect();
        let log_len = battle.battle_log().len();
        for _ in 0..600 {
            battle.tick(MOVEMENT_DT);
        }
        let after: Vec<u32> = battle.fighters().iter().map(|f| f.hp).collect();
        assert_eq!(hp, after);
        assert_eq!(battle.battle_log().len(), log_len);
        assert!(!battle.is_finished());
    }

    #[test]
    fn test_log_since_survives_match_restarts() {
        let mut battle = start_battle(
            contestants(4),
            settings(BattleMode::Tournament),
            12,
            Collaborators::default(),
        )
        .unwrap();

        let mut next = 0;
        let mut printed = Vec::new();
        for _ in 0..(600.0 / MOVEMENT_DT) as u32 {
            battle.tick(MOVEMENT_DT);
            for line in battle.log_since(next) {
                printed.push(line.id);
                next = line.id + 1;
            }
            if battle.is_finished() {
                break;
            }
        }
        assert!(battle.is_finished());
        // Every line seen exactly once, in order, across the cleared logs
        assert_eq!(printed, (0..next).collect::<Vec<_>>());
        assert!(battle.battle_log()[0].id > 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let battle = start_battle(
            contestants(3),
            settings(BattleMode::FreeForAll),
            8,
            Collaborators::default(),
        )
        .unwrap();
        let json = serde_json::to_string(&battle.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"active\""));
        assert!(json.contains("\"className\""));
    }
}
