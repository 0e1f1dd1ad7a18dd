//! End-to-end battles driven through the public API

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use arena_picker::consts::MOVEMENT_DT;
use arena_picker::sim::combat::compute_damage;
use arena_picker::sim::{
    AudioSink, Battle, BattleEvent, BattlePhase, Collaborators, Contestant, DamageRoll, SoundCue,
    start_battle,
};
use arena_picker::{BattleHistory, BattleMode, BattleSpeed, Settings};

fn contestants(n: u32) -> Vec<Contestant> {
    (1..=n).map(|i| Contestant::new(i, format!("Contestant {}", i))).collect()
}

fn fast(mode: BattleMode) -> Settings {
    Settings {
        battle_speed_ms: 100,
        starting_hp: 40,
        ..Settings::for_mode(mode)
    }
}

/// Tick until a winner is reported or `max_secs` of virtual time pass
fn run(battle: &mut Battle, max_secs: u64) {
    let steps = (max_secs as f32 / MOVEMENT_DT) as u64;
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

impl Cues {
    fn count(&self, cue: SoundCue) -> usize {
        self.0.borrow().iter().filter(|&&c| c == cue).count()
    }
}

#[test]
fn test_duel_end_to_end() {
    let cues = Cues::default();
    let history = Rc::new(RefCell::new(BattleHistory::new()));
    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = reported.clone();

    let collaborators = Collaborators::default()
        .with_audio(cues.clone())
        .with_history(history.clone())
        .on_battle_end(move |w| sink.borrow_mut().push(w.id()));

    let mut battle = start_battle(contestants(2), fast(BattleMode::Duel), 21, collaborators).unwrap();
    run(&mut battle, 300);

    assert!(battle.is_finished());
    assert_eq!(battle.phase(), BattlePhase::BattleConcluded);
    let winner = battle.final_winner().unwrap().id();
    assert!(winner == 1 || winner == 2);
    assert_eq!(*reported.borrow(), vec![winner]);

    assert_eq!(cues.count(SoundCue::Victory), 1);
    assert_eq!(cues.count(SoundCue::Defeat), 1);

    let history = history.borrow();
    assert_eq!(history.records.len(), 1);
    assert_eq!(history.records[0].winner.id, winner);
    assert_eq!(history.records[0].contestants.len(), 2);

    let events = battle.drain_events();
    let ended: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, BattleEvent::BattleEnded { .. }))
        .collect();
    assert_eq!(ended, [&BattleEvent::BattleEnded { winner }]);
    assert!(battle.battle_log().iter().any(|l| l.text.contains("WINS!")));
}

#[test]
fn test_duel_with_fixed_rolls_kills_after_expected_hits() {
    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = reported.clone();
    let settings = Settings {
        battle_speed_ms: 100,
        starting_hp: 100,
        ..Settings::for_mode(BattleMode::Duel)
    };
    let collaborators = Collaborators::default().on_battle_end(move |w| sink.borrow_mut().push(w.id()));
    let mut battle = start_battle(contestants(2), settings, 33, collaborators).unwrap();
    let roll = DamageRoll {
        base: 15,
        critical: false,
    };
    battle.force_damage_roll(Some(roll));

    // Damage each fighter deals per hit, and its HP after the class bonus
    let per_hit: HashMap<u32, u32> = battle
        .fighters()
        .iter()
        .map(|f| (f.id(), compute_damage(roll.base, f.attack_bonus, false)))
        .collect();
    let max_hp: HashMap<u32, u32> = battle.fighters().iter().map(|f| (f.id(), f.max_hp)).collect();
    let other = |id: u32| if id == 1 { 2 } else { 1 };

    let mut hits: HashMap<u32, u32> = HashMap::new();
    let mut fallen = None;
    for _ in 0..(300.0 / MOVEMENT_DT) as u32 {
        if battle.is_finished() {
            break;
        }
        battle.tick(MOVEMENT_DT);
        for event in battle.drain_events() {
            match event {
                BattleEvent::Damage {
                    defender,
                    damage,
                    critical,
                    hp_after,
                } => {
                    assert!(fallen.is_none(), "hit after the match ended");
                    let taken = hits.entry(defender).or_default();
                    *taken += 1;
                    assert_eq!(damage, per_hit[&other(defender)]);
                    assert!(!critical);
                    assert_eq!(hp_after, max_hp[&defender].saturating_sub(*taken * damage));
                }
                BattleEvent::Eliminated { fighter } => fallen = Some(fighter),
                _ => {}
            }
        }
    }

    assert!(battle.is_finished());
    let loser = fallen.unwrap();
    let winner = other(loser);
    let dealt = per_hit[&winner];
    assert_eq!(hits[&loser], max_hp[&loser].div_ceil(dealt));
    assert!(hits.get(&winner).copied().unwrap_or(0) < max_hp[&winner].div_ceil(per_hit[&loser]));

    let fighter = |id: u32| battle.fighters().iter().find(|f| f.id() == id).unwrap();
    assert!(!fighter(loser).is_alive);
    assert_eq!(fighter(loser).hp, 0);
    assert!(fighter(winner).is_alive);
    assert_eq!(*reported.borrow(), vec![winner]);
}

#[test]
fn test_duel_draws_two_of_many() {
    let mut battle = start_battle(
        contestants(5),
        fast(BattleMode::Duel),
        4,
        Collaborators::default(),
    )
    .unwrap();
    assert_eq!(battle.fighters().len(), 2);
    run(&mut battle, 300);
    assert!(battle.is_finished());
}

#[test]
fn test_tournament_of_eight() {
    let history = Rc::new(RefCell::new(BattleHistory::new()));
    let collaborators = Collaborators::default().with_history(history.clone());
    let mut battle =
        start_battle(contestants(8), fast(BattleMode::Tournament), 8, collaborators).unwrap();

    let progress = battle.progress().unwrap();
    assert_eq!((progress.current_round, progress.total_rounds), (1, 3));
    assert_eq!(battle.fighters().len(), 2);

    run(&mut battle, 1200);
    assert!(battle.is_finished());

    let bracket = battle.bracket().unwrap();
    assert!(bracket.is_complete());
    let champion = bracket.champion().unwrap().id;
    assert_eq!(battle.final_winner().unwrap().id(), champion);

    // One record per played match
    assert_eq!(history.borrow().records.len(), 7);

    let starts = battle
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, BattleEvent::MatchStarted { bracket_slot: Some(_), .. }))
        .count();
    assert_eq!(starts, 7);
    assert!(
        battle
            .battle_log()
            .iter()
            .any(|l| l.text.contains("TOURNAMENT CHAMPION"))
    );
}

#[test]
fn test_tournament_with_byes() {
    let history = Rc::new(RefCell::new(BattleHistory::new()));
    let collaborators = Collaborators::default().with_history(history.clone());
    let mut battle =
        start_battle(contestants(5), fast(BattleMode::Tournament), 5, collaborators).unwrap();

    assert_eq!(battle.progress().unwrap().total_rounds, 3);
    run(&mut battle, 1200);
    assert!(battle.is_finished());

    // Byes advance without a fight: n - 1 matches are actually played
    assert_eq!(history.borrow().records.len(), 4);
    let champion = battle.bracket().unwrap().champion().unwrap().id;
    assert_eq!(battle.final_winner().unwrap().id(), champion);
}

#[test]
fn test_teardown_stops_everything() {
    let called = Rc::new(RefCell::new(false));
    let flag = called.clone();
    let collaborators = Collaborators::default().on_battle_end(move |_| *flag.borrow_mut() = true);
    let mut battle =
        start_battle(contestants(4), fast(BattleMode::FreeForAll), 9, collaborators).unwrap();

    for _ in 0..30 {
        battle.tick(MOVEMENT_DT);
    }
    assert!(battle.pending_timers() > 0);

    battle.teardown();
    assert_eq!(battle.phase(), BattlePhase::TornDown);
    assert_eq!(battle.pending_timers(), 0);
    assert!(battle.effects().is_empty());

    let log_len = battle.battle_log().len();
    battle.drain_events();
    let hp: Vec<u32> = battle.fighters().iter().map(|f| f.hp).collect();

    run(&mut battle, 120);
    assert!(!battle.is_finished());
    assert!(!*called.borrow());
    assert!(battle.drain_events().is_empty());
    assert_eq!(battle.battle_log().len(), log_len);
    assert_eq!(battle.fighters().iter().map(|f| f.hp).collect::<Vec<_>>(), hp);
}

#[test]
fn test_speed_change_is_logged() {
    let mut battle = start_battle(
        contestants(3),
        fast(BattleMode::FreeForAll),
        2,
        Collaborators::default(),
    )
    .unwrap();
    battle.set_battle_speed(BattleSpeed::UltraFast.millis());
    assert_eq!(battle.settings().battle_speed_ms, 300);
    assert!(
        battle
            .battle_log()
            .iter()
            .any(|l| l.text == "⚡ Battle speed changed to Ultra Fast")
    );

    battle.set_battle_speed(1);
    assert_eq!(battle.settings().battle_speed_ms, 50);
}

#[test]
fn test_same_seed_same_battle() {
    let play = || {
        let mut battle = start_battle(
            contestants(6),
            fast(BattleMode::FreeForAll),
            77,
            Collaborators::default(),
        )
        .unwrap();
        run(&mut battle, 600);
        let log: Vec<String> = battle.battle_log().iter().map(|l| l.text.clone()).collect();
        (battle.final_winner().map(|w| w.id()), log)
    };
    let first = play();
    assert!(first.0.is_some());
    assert_eq!(first, play());
}
