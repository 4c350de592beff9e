use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Rank;
use crate::dealer::play_dealer;
use crate::hand::{hand_value, is_pair};
use crate::shoe::Shoe;

/// The player keeps hitting below this total once the first hit card is taken.
/// A fixed stand-on-17 policy stands in for recursive optimal hitting, so hit
/// EVs are an approximation.
pub const HIT_STOP_TOTAL: u8 = 17;

/// Player actions. Declaration order is the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
}

pub const ALL_ACTIONS: [Action; 4] = [Action::Hit, Action::Stand, Action::Double, Action::Split];

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Double => "double",
            Action::Split => "split",
        }
    }

    /// Stake multiplier applied to the trial outcome.
    pub fn multiplier(self) -> f64 {
        match self {
            Action::Double => 2.0,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionEstimate {
    pub action: Action,
    /// Mean net return per unit bet over completed trials.
    pub ev: f64,
    pub completed_trials: usize,
    pub skipped_trials: usize,
}

fn draw_into<R: Rng + ?Sized>(hand: &mut Vec<Rank>, pool: &mut Shoe, rng: &mut R) -> bool {
    match pool.draw(rng) {
        Some(card) => {
            hand.push(card);
            true
        }
        None => false,
    }
}

/// Applies the action's draw policy to a copy of the hand. Running out of
/// cards just ends the drawing.
fn play_action<R: Rng + ?Sized>(
    hand: &[Rank],
    action: Action,
    pool: &mut Shoe,
    rng: &mut R,
) -> Vec<Rank> {
    match action {
        Action::Stand => hand.to_vec(),
        Action::Hit => {
            let mut cards = hand.to_vec();
            if hand_value(&cards).0 < 21 && draw_into(&mut cards, pool, rng) {
                while hand_value(&cards).0 < HIT_STOP_TOTAL {
                    if !draw_into(&mut cards, pool, rng) {
                        break;
                    }
                }
            }
            cards
        }
        Action::Double => {
            let mut cards = hand.to_vec();
            draw_into(&mut cards, pool, rng);
            cards
        }
        Action::Split => {
            // Only one of the two split hands is played out.
            if !is_pair(hand) {
                return hand.to_vec();
            }
            let mut cards = vec![hand[0]];
            draw_into(&mut cards, pool, rng);
            cards
        }
    }
}

/// One independent trial. `None` means the trial could not be played because
/// the shoe was already empty; such trials are left out of the average.
pub fn run_trial<R: Rng + ?Sized>(
    hand: &[Rank],
    action: Action,
    upcard: Rank,
    pool: &Shoe,
    rng: &mut R,
) -> Option<f64> {
    if pool.is_empty() {
        return None;
    }
    let mut deck = pool.clone();
    let stake = action.multiplier();

    let player = play_action(hand, action, &mut deck, rng);
    let (player_total, _) = hand_value(&player);
    if player_total > 21 {
        return Some(-stake);
    }

    let dealer_total = play_dealer(upcard, &mut deck, rng);
    let outcome = if dealer_total > 21 || player_total > dealer_total {
        stake
    } else if player_total < dealer_total {
        -stake
    } else {
        0.0
    };
    Some(outcome)
}

/// Averages `trials` independent trials of `action`.
pub fn simulate_action<R: Rng + ?Sized>(
    hand: &[Rank],
    action: Action,
    upcard: Rank,
    pool: &Shoe,
    trials: usize,
    rng: &mut R,
) -> ActionEstimate {
    let mut total = 0.0;
    let mut completed = 0usize;

    for _ in 0..trials {
        if let Some(ret) = run_trial(hand, action, upcard, pool, rng) {
            total += ret;
            completed += 1;
        }
    }

    ActionEstimate {
        action,
        ev: total / completed.max(1) as f64,
        completed_trials: completed,
        skipped_trials: trials - completed,
    }
}
