//! Single-elimination tournament bracket
//!
//! All matches live in one flat vector, round after round; `round_starts`
//! marks where each round begins. Every operation that changes the bracket
//! returns a new one, so readers never see a half-advanced bracket.
//!
//! Slotting: the winner of match `m` in round `r` goes to round `r + 1`,
//! match `m / 2`, as `fighter1` when `m` is even and `fighter2` when odd.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::fighter::Contestant;

/// A single pairing. Fighters are contestant ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Match {
    pub fighter1: Option<u32>,
    pub fighter2: Option<u32>,
    pub winner: Option<u32>,
}

impl Match {
    /// Both fighters known and no winner yet
    pub fn is_playable(&self) -> bool {
        self.fighter1.is_some() && self.fighter2.is_some() && self.winner.is_none()
    }

    pub fn has_fighter(&self, id: u32) -> bool {
        self.fighter1 == Some(id) || self.fighter2 == Some(id)
    }
}

/// The next match to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextMatch<'a> {
    pub round: usize,
    pub index: usize,
    pub fighter1: &'a Contestant,
    pub fighter2: &'a Contestant,
}

/// 1-based current round and the total number of rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current_round: usize,
    pub total_rounds: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    entrants: Vec<Contestant>,
    matches: Vec<Match>,
    round_starts: Vec<usize>,
}

/// Shuffle contestants and pair them into the first round
///
/// An odd contestant out gets an empty `fighter2`. Later rounds are created
/// empty, each half the size (rounded up) of the one before.
pub fn create_bracket<R: Rng + ?Sized>(contestants: &[Contestant], rng: &mut R) -> Bracket {
    let mut shuffled = contestants.to_vec();
    shuffled.shuffle(rng);

    let mut matches: Vec<Match> = shuffled
        .chunks(2)
        .map(|pair| Match {
            fighter1: pair.first().map(|c| c.id),
            fighter2: pair.get(1).map(|c| c.id),
            winner: None,
        })
        .collect();

    let mut round_starts = Vec::new();
    if !matches.is_empty() {
        round_starts.push(0);
        let mut len = matches.len();
        while len > 1 {
            len = len.div_ceil(2);
            round_starts.push(matches.len());
            matches.extend(std::iter::repeat_n(Match::default(), len));
        }
    }

    log::debug!(
        "Bracket: {} contestants, {} rounds",
        contestants.len(),
        round_starts.len()
    );

    Bracket {
        entrants: shuffled,
        matches,
        round_starts,
    }
}

impl Bracket {
    #[inline]
    pub fn total_rounds(&self) -> usize {
        self.round_starts.len()
    }

    fn round_range(&self, round: usize) -> std::ops::Range<usize> {
        let start = self.round_starts[round];
        let end = self
            .round_starts
            .get(round + 1)
            .copied()
            .unwrap_or(self.matches.len());
        start..end
    }

    /// Matches of one round (empty for an out-of-range round)
    pub fn round(&self, round: usize) -> &[Match] {
        if round >= self.total_rounds() {
            return &[];
        }
        &self.matches[self.round_range(round)]
    }

    pub fn rounds(&self) -> impl Iterator<Item = &[Match]> {
        (0..self.total_rounds()).map(|r| self.round(r))
    }

    pub fn get(&self, round: usize, index: usize) -> Option<&Match> {
        self.round(round).get(index)
    }

    /// Look up a contestant by id
    pub fn contestant(&self, id: u32) -> Option<&Contestant> {
        self.entrants.iter().find(|c| c.id == id)
    }

    fn flat_index(&self, round: usize, index: usize) -> Option<usize> {
        (round < self.total_rounds() && index < self.round(round).len())
            .then(|| self.round_starts[round] + index)
    }

    /// Record a winner and move them into the next round
    fn advance(&mut self, round: usize, index: usize, winner: u32) {
        let Some(i) = self.flat_index(round, index) else {
            return;
        };
        self.matches[i].winner = Some(winner);

        if let Some(next) = self.flat_index(round + 1, index / 2) {
            if index % 2 == 0 {
                self.matches[next].fighter1 = Some(winner);
            } else {
                self.matches[next].fighter2 = Some(winner);
            }
        }
    }

    /// True when slot `slot` (0 or 1) of a match can never be filled
    fn slot_is_dead(&self, round: usize, index: usize, slot: usize) -> bool {
        round == 0 || 2 * index + slot >= self.round(round - 1).len()
    }

    /// Auto-advance lone fighters whose opponent slot can never be filled
    ///
    /// Byes cascade: a fighter advanced by a bye may land in another bye in
    /// the next round. Idempotent.
    pub fn process_byes(&self) -> Self {
        let mut next = self.clone();
        for round in 0..next.total_rounds() {
            for index in 0..next.round(round).len() {
                let m = next.round(round)[index];
                if m.winner.is_some() {
                    continue;
                }
                let lone = match (m.fighter1, m.fighter2) {
                    (Some(f), None) => Some((f, 1)),
                    (None, Some(f)) => Some((f, 0)),
                    _ => None,
                };
                if let Some((fighter, empty)) = lone {
                    if next.slot_is_dead(round, index, empty) {
                        log::debug!("Bye: {} advances from round {}", fighter, round + 1);
                        next.advance(round, index, fighter);
                    }
                }
            }
        }
        next
    }

    /// First playable match in round-major order
    pub fn next_match(&self) -> Option<NextMatch<'_>> {
        (0..self.total_rounds()).find_map(|round| {
            self.round(round)
                .iter()
                .position(Match::is_playable)
                .and_then(|index| {
                    let m = self.round(round)[index];
                    Some(NextMatch {
                        round,
                        index,
                        fighter1: self.contestant(m.fighter1?)?,
                        fighter2: self.contestant(m.fighter2?)?,
                    })
                })
        })
    }

    /// New bracket with `winner` recorded for the given match
    ///
    /// Returns `None` when the match does not exist, is already decided, or
    /// `winner` is not one of its fighters.
    pub fn update_with_winner(&self, round: usize, index: usize, winner: u32) -> Option<Self> {
        let m = self.get(round, index)?;
        if m.winner.is_some() || !m.has_fighter(winner) {
            return None;
        }
        let mut next = self.clone();
        next.advance(round, index, winner);
        Some(next)
    }

    pub fn progress(&self) -> Progress {
        let total = self.total_rounds();
        let current = (0..total)
            .find(|&r| self.round(r).iter().any(Match::is_playable))
            .or_else(|| (0..total).find(|&r| self.round(r).iter().any(|m| m.winner.is_none())))
            .map(|r| r + 1)
            .unwrap_or(total);
        Progress {
            current_round: current,
            total_rounds: total,
        }
    }

    /// The final's single match has a winner
    pub fn is_complete(&self) -> bool {
        self.total_rounds() > 0 && self.round(self.total_rounds() - 1)[0].winner.is_some()
    }

    pub fn champion(&self) -> Option<&Contestant> {
        if !self.is_complete() {
            return None;
        }
        let winner = self.round(self.total_rounds() - 1)[0].winner?;
        self.contestant(winner)
    }
}
