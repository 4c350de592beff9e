use blackjack_ev::cards::*;
use blackjack_ev::hand::*;

fn h(notation: &str) -> Vec<Rank> {
    parse_cards(notation).unwrap()
}

#[test]
fn test_blackjack() {
    let e = evaluate(&h("A,K"));
    assert_eq!(e.total, 21);
    assert!(e.is_soft);
    assert!(e.is_blackjack);
    assert!(!e.is_pair);
}

#[test]
fn test_hard_21_three_cards() {
    let e = evaluate(&h("10,7,4"));
    assert_eq!(e.total, 21);
    assert!(!e.is_soft);
    assert!(!e.is_blackjack);
}

#[test]
fn test_two_aces_and_nine() {
    assert_eq!(hand_value(&h("A,A,9")), (21, true));
}

#[test]
fn test_pair_of_tens() {
    let e = evaluate(&h("10,10"));
    assert_eq!((e.total, e.is_soft), (20, false));
    assert!(e.is_pair);
}

#[test]
fn test_soft_becomes_hard() {
    assert_eq!(hand_value(&h("A,6")), (17, true));
    assert_eq!(hand_value(&h("A,6,10")), (17, false));
}

#[test]
fn test_many_aces() {
    assert_eq!(hand_value(&h("A,A")), (12, true));
    assert_eq!(hand_value(&h("A,A,A,A")), (14, true));
    assert_eq!(hand_value(&h("A,A,10,10")), (22, false));
}

#[test]
fn test_bust() {
    let e = evaluate(&h("10,6,8"));
    assert_eq!(e.total, 24);
    assert!(e.is_bust());
    assert!(!e.is_soft);
}

#[test]
fn test_empty_hand() {
    assert_eq!(hand_value(&[]), (0, false));
}

#[test]
fn test_pair_by_value() {
    assert!(is_pair(&h("8,8")));
    assert!(is_pair(&h("10,K")));
    assert!(!is_pair(&h("9,10")));
    assert!(!is_pair(&h("8,8,8")));
}

#[test]
fn test_display() {
    assert_eq!(evaluate(&h("A,K")).to_string(), "soft 21 (blackjack)");
    assert_eq!(evaluate(&h("8,8")).to_string(), "hard 16 (pair)");
    assert_eq!(evaluate(&h("10,5,2")).to_string(), "hard 17");
}
