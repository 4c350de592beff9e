use blackjack_ev::cards::*;
use blackjack_ev::error::EngineError;

#[test]
fn test_parse_number_cards() {
    assert_eq!(parse_card("2").unwrap(), Rank::Two);
    assert_eq!(parse_card("9").unwrap(), Rank::Nine);
    assert_eq!(parse_card("10").unwrap(), Rank::Ten);
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(parse_card("a").unwrap(), Rank::Ace);
    assert_eq!(parse_card("k").unwrap(), Rank::King);
    assert_eq!(parse_card(" Q ").unwrap(), Rank::Queen);
}

#[test]
fn test_parse_t_alias_for_ten() {
    assert_eq!(parse_card("T").unwrap(), Rank::Ten);
    assert_eq!(parse_card("t").unwrap(), Rank::Ten);
}

#[test]
fn test_parse_invalid_card() {
    assert!(matches!(parse_card("1"), Err(EngineError::InvalidCard(_))));
    assert!(matches!(parse_card("Z"), Err(EngineError::InvalidCard(_))));
    assert!(matches!(parse_card(""), Err(EngineError::InvalidCard(_))));
}

#[test]
fn test_parse_cards_separators() {
    let expected = vec![Rank::Ace, Rank::King];
    assert_eq!(parse_cards("A,K").unwrap(), expected);
    assert_eq!(parse_cards("A K").unwrap(), expected);
    assert_eq!(parse_cards(" A , K ").unwrap(), expected);
}

#[test]
fn test_parse_cards_compact() {
    assert_eq!(parse_cards("AK").unwrap(), vec![Rank::Ace, Rank::King]);
    assert_eq!(parse_cards("T9").unwrap(), vec![Rank::Ten, Rank::Nine]);
}

#[test]
fn test_parse_cards_with_tens() {
    assert_eq!(parse_cards("10,10").unwrap(), vec![Rank::Ten, Rank::Ten]);
    assert_eq!(parse_cards("10").unwrap(), vec![Rank::Ten]);
}

#[test]
fn test_parse_cards_propagates_error() {
    assert!(parse_cards("A,X").is_err());
}

#[test]
fn test_values() {
    assert_eq!(Rank::Two.value(), 2);
    assert_eq!(Rank::Jack.value(), 10);
    assert_eq!(Rank::King.value(), 10);
    assert_eq!(Rank::Ace.value(), 11);
    assert_eq!(Rank::Ace.hard_value(), 1);
    assert_eq!(Rank::Queen.hard_value(), 10);
}

#[test]
fn test_all_ranks_order_matches_index() {
    for (i, rank) in ALL_RANKS.iter().enumerate() {
        assert_eq!(rank.index(), i);
        assert_eq!(rank.as_str(), RANKS_STR[i]);
    }
}

#[test]
fn test_display_and_format() {
    assert_eq!(Rank::Ten.to_string(), "10");
    assert_eq!(format_cards(&[Rank::Ace, Rank::Seven]), "A 7");
}

#[test]
fn test_from_str() {
    let r: Rank = "j".parse().unwrap();
    assert_eq!(r, Rank::Jack);
}

#[test]
fn test_serde_uses_card_symbols() {
    let json = serde_json::to_string(&vec![Rank::Ten, Rank::Ace]).unwrap();
    assert_eq!(json, r#"["10","A"]"#);
    let back: Vec<Rank> = serde_json::from_str(r#"["2","K"]"#).unwrap();
    assert_eq!(back, vec![Rank::Two, Rank::King]);
}
