use blackjack_ev::cards::*;
use blackjack_ev::dealer::*;
use blackjack_ev::shoe::Shoe;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn only(rank: Rank, n: u32) -> Shoe {
    let mut counts = [0u32; 13];
    counts[rank.index()] = n;
    Shoe::from_counts(counts)
}

#[test]
fn test_must_hit_rules() {
    assert!(dealer_must_hit(16, false));
    assert!(dealer_must_hit(17, true));
    assert!(!dealer_must_hit(17, false));
    assert!(!dealer_must_hit(18, true));
}

#[test]
fn test_six_busts_on_tens() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = only(Rank::Ten, 10);
    assert_eq!(play_dealer(Rank::Six, &mut pool, &mut rng), 26);
    assert_eq!(pool.total(), 8);
}

#[test]
fn test_seven_stands_on_hard_17() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = only(Rank::Ten, 10);
    assert_eq!(play_dealer(Rank::Seven, &mut pool, &mut rng), 17);
}

#[test]
fn test_hits_soft_17() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = only(Rank::Six, 10);
    // A,6 soft 17 -> A,6,6 hard 13 -> A,6,6,6 hard 19
    assert_eq!(play_dealer(Rank::Ace, &mut pool, &mut rng), 19);
    assert_eq!(pool.total(), 7);
}

#[test]
fn test_exhausted_pool_stops_drawing() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = Shoe::from_counts([0; 13]);
    assert_eq!(play_dealer(Rank::Five, &mut pool, &mut rng), 5);

    let mut pool = only(Rank::Two, 1);
    assert_eq!(play_dealer(Rank::Five, &mut pool, &mut rng), 7);
}

#[test]
fn test_final_total_at_least_17() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let shoe = Shoe::new(1.0).unwrap();
    for &up in &ALL_RANKS {
        for _ in 0..200 {
            let mut pool = shoe.clone();
            let total = play_dealer(up, &mut pool, &mut rng);
            assert!(total >= 17, "{up} finished on {total}");
        }
    }
}

#[test]
fn test_bust_probability_deterministic_pools() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    assert_eq!(dealer_bust_probability(Rank::Six, &only(Rank::Ten, 8), 100, &mut rng), 1.0);
    assert_eq!(dealer_bust_probability(Rank::Seven, &only(Rank::Ten, 8), 100, &mut rng), 0.0);
}

#[test]
fn test_bust_probability_degenerate_inputs() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let shoe = Shoe::new(6.0).unwrap();
    assert_eq!(dealer_bust_probability(Rank::Six, &shoe, 0, &mut rng), 0.0);
    assert_eq!(dealer_bust_probability(Rank::Six, &Shoe::from_counts([0; 13]), 100, &mut rng), 0.0);
}

#[test]
fn test_weak_upcard_busts_more() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let shoe = Shoe::new(6.0).unwrap();
    let six = dealer_bust_probability(Rank::Six, &shoe, 20_000, &mut rng);
    let ten = dealer_bust_probability(Rank::Ten, &shoe, 20_000, &mut rng);
    assert!(six > 0.35 && six < 0.50, "six bust {six}");
    assert!(ten > 0.15 && ten < 0.30, "ten bust {ten}");
    assert!(six > ten);
}
