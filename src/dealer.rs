use rand::Rng;

use crate::cards::Rank;
use crate::hand::hand_value;
use crate::shoe::Shoe;

pub const DEALER_STAND_TOTAL: u8 = 17;

/// Whether a dealer holding `total` must take another card. The dealer hits
/// soft 17.
pub fn dealer_must_hit(total: u8, is_soft: bool) -> bool {
    total < DEALER_STAND_TOTAL || (total == DEALER_STAND_TOTAL && is_soft)
}

/// Plays out a dealer hand from `upcard`, drawing from `pool` and removing the
/// drawn cards from it. Returns the final total; anything above 21 is a bust.
/// If the pool runs dry mid-hand the dealer stops on whatever it holds.
pub fn play_dealer<R: Rng + ?Sized>(upcard: Rank, pool: &mut Shoe, rng: &mut R) -> u8 {
    let mut cards = vec![upcard];
    let (mut total, mut is_soft) = hand_value(&cards);

    while dealer_must_hit(total, is_soft) {
        let Some(card) = pool.draw(rng) else {
            break;
        };
        cards.push(card);
        (total, is_soft) = hand_value(&cards);
    }

    total
}

/// Monte Carlo estimate of the dealer busting from `upcard` against `shoe`.
/// Each trial plays from its own copy of the shoe.
pub fn dealer_bust_probability<R: Rng + ?Sized>(
    upcard: Rank,
    shoe: &Shoe,
    trials: usize,
    rng: &mut R,
) -> f64 {
    if trials == 0 || shoe.is_empty() {
        return 0.0;
    }
    let busts = (0..trials)
        .filter(|_| {
            let mut pool = shoe.clone();
            play_dealer(upcard, &mut pool, rng) > 21
        })
        .count();
    busts as f64 / trials as f64
}
