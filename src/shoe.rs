use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::cards::{Rank, ALL_RANKS};
use crate::error::{EngineError, EngineResult};
use crate::hand::hand_value;

pub const CARDS_PER_DECK: u32 = 52;
pub const MAX_DECKS: f64 = 10.0;

/// Remaining-card counts per rank. Built fresh from the observed-card history
/// on every request; clones are cheap and each simulation trial owns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shoe {
    counts: [u32; 13],
}

impl Shoe {
    /// A full shoe of `decks` decks. Fractional decks round each rank's count down.
    pub fn new(decks: f64) -> EngineResult<Shoe> {
        if !decks.is_finite() || decks <= 0.0 {
            return Err(EngineError::InvalidDeckCount {
                value: decks,
                max: MAX_DECKS,
            });
        }
        let per_rank = (4.0 * decks).floor() as u32;
        Ok(Shoe {
            counts: [per_rank; 13],
        })
    }

    /// The shoe left after removing every observed card. Over-consumed ranks
    /// clamp at zero.
    pub fn remaining(decks: f64, observed: &[Rank]) -> EngineResult<Shoe> {
        let mut shoe = Shoe::new(decks)?;
        for &card in observed {
            shoe.remove(card);
        }
        Ok(shoe)
    }

    pub fn from_counts(counts: [u32; 13]) -> Shoe {
        Shoe { counts }
    }

    pub fn count(&self, rank: Rank) -> u32 {
        self.counts[rank.index()]
    }

    pub fn counts(&self) -> &[u32; 13] {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn decks_remaining(&self) -> f64 {
        self.total() as f64 / CARDS_PER_DECK as f64
    }

    /// Takes one card of `rank` out of the shoe. Returns false if none were left.
    pub fn remove(&mut self, rank: Rank) -> bool {
        let slot = &mut self.counts[rank.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Draws one card uniformly from the remaining cards, weighted by count.
    /// `None` means the shoe is exhausted.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Rank> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for (i, &count) in self.counts.iter().enumerate() {
            if pick < count {
                self.counts[i] -= 1;
                return Some(ALL_RANKS[i]);
            }
            pick -= count;
        }
        None
    }

    /// Probability that one more card busts `hand`, over the current composition.
    pub fn bust_probability(&self, hand: &[Rank]) -> f64 {
        let total = self.total();
        if total == 0 || hand_value(hand).0 >= 21 {
            return 0.0;
        }
        let mut next = hand.to_vec();
        next.push(Rank::Two);
        let last = next.len() - 1;
        let bust_cards: u32 = ALL_RANKS
            .iter()
            .filter_map(|&rank| {
                next[last] = rank;
                (hand_value(&next).0 > 21).then(|| self.count(rank))
            })
            .sum();
        bust_cards as f64 / total as f64
    }
}

impl fmt::Display for Shoe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = ALL_RANKS
            .iter()
            .map(|&r| format!("{}:{}", r, self.count(r)))
            .collect();
        write!(f, "{} ({} cards)", parts.join(" "), self.total())
    }
}
