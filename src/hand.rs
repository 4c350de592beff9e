use std::fmt;

use serde::Serialize;

use crate::cards::Rank;

/// Derived attributes of a player or dealer hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandEval {
    pub total: u8,
    pub is_soft: bool,
    pub is_pair: bool,
    pub is_blackjack: bool,
}

impl HandEval {
    pub fn is_bust(&self) -> bool {
        self.total > 21
    }
}

impl fmt::Display for HandEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_soft { "soft" } else { "hard" };
        write!(f, "{} {}", kind, self.total)?;
        if self.is_blackjack {
            write!(f, " (blackjack)")?;
        } else if self.is_pair {
            write!(f, " (pair)")?;
        }
        Ok(())
    }
}

/// Total and softness of a card list. Every Ace counts 1, then one Ace is
/// promoted to 11 if that does not bust. The hand is soft iff that happened.
pub fn hand_value(cards: &[Rank]) -> (u8, bool) {
    let hard: u32 = cards.iter().map(|c| c.hard_value() as u32).sum();
    let has_ace = cards.iter().any(|c| c.is_ace());

    let (total, is_soft) = if has_ace && hard + 10 <= 21 {
        (hard + 10, true)
    } else {
        (hard, false)
    };
    (total.min(u8::MAX as u32) as u8, is_soft)
}

pub fn evaluate(cards: &[Rank]) -> HandEval {
    let (total, is_soft) = hand_value(cards);
    HandEval {
        total,
        is_soft,
        is_pair: is_pair(cards),
        is_blackjack: cards.len() == 2 && total == 21,
    }
}

/// Two cards of equal blackjack value, so 10-K counts as a pair.
pub fn is_pair(cards: &[Rank]) -> bool {
    cards.len() == 2 && cards[0].value() == cards[1].value()
}
