use approx::assert_relative_eq;
use blackjack_ev::bankroll::*;
use blackjack_ev::counting::{catalog, CountingCatalog};
use blackjack_ev::error::EngineError;
use blackjack_ev::request::BankrollRequest;

const HILO: f64 = 0.97;

#[test]
fn test_player_edge_linear() {
    assert_relative_eq!(player_edge(0.0, HILO), -0.005);
    assert_relative_eq!(player_edge(4.0, HILO), 0.0144, epsilon = 1e-12);
}

#[test]
fn test_player_edge_clamped() {
    assert_relative_eq!(player_edge(20.0, 1.0), MAX_EDGE);
    assert_relative_eq!(player_edge(-20.0, 1.0), -MAX_EDGE);
}

#[test]
fn test_kelly_fraction() {
    assert_eq!(kelly_fraction(-0.01), 0.0);
    assert_eq!(kelly_fraction(0.0), 0.0);
    assert_relative_eq!(kelly_fraction(0.013), 0.01, epsilon = 1e-12);
}

#[test]
fn test_risk_levels() {
    assert_eq!(RiskLevel::from_kelly(0.005), RiskLevel::Low);
    assert_eq!(RiskLevel::from_kelly(0.01), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_kelly(0.03), RiskLevel::High);
}

#[test]
fn test_risk_of_ruin() {
    assert_eq!(risk_of_ruin(1000.0, 10.0, 0.0), 1.0);
    assert_eq!(risk_of_ruin(0.0, 10.0, 0.01), 1.0);
    assert_eq!(risk_of_ruin(1000.0, 0.0, 0.01), 1.0);
    let small = risk_of_ruin(1000.0, 10.0, 0.01);
    let large = risk_of_ruin(5000.0, 10.0, 0.01);
    assert!(small > large);
    assert!(small > 0.0 && small < 1.0);
    assert!(risk_of_ruin(1000.0, 10.0, -0.01) > 0.99);
}

#[test]
fn test_sessions_to_double() {
    assert_eq!(sessions_to_double(0.0, 0.01), None);
    assert_eq!(sessions_to_double(-0.01, 0.01), None);
    assert_eq!(sessions_to_double(0.01, 0.01), Some(6932));
    assert_eq!(sessions_to_double(1.0, 1.0), Some(1));
}

#[test]
fn test_neutral_count_bets_minimum() {
    let rec = size_bet(10_000.0, 0.0, 0.05, 10.0, 1000.0, HILO).unwrap();
    assert_eq!(rec.recommended_bet, 10.0);
    assert_eq!(rec.kelly_fraction, 0.0);
    assert_eq!(rec.risk_level, RiskLevel::Low);
    assert_eq!(rec.sessions_to_double, None);
}

#[test]
fn test_negative_count_bets_minimum() {
    let rec = size_bet(10_000.0, -3.0, 0.05, 25.0, 1000.0, HILO).unwrap();
    assert_eq!(rec.recommended_bet, 25.0);
    assert!(rec.expected_value < 0.0);
    assert_relative_eq!(rec.bankroll_units, 400.0);
}

#[test]
fn test_positive_count_quarter_kelly() {
    let rec = size_bet(10_000.0, 4.0, 0.05, 10.0, 1000.0, HILO).unwrap();
    assert_relative_eq!(rec.recommended_bet, 27.69);
    assert_relative_eq!(rec.kelly_fraction, 0.0111);
    assert_relative_eq!(rec.conservative_fraction, 0.0028);
    assert_eq!(rec.risk_level, RiskLevel::Medium);
    assert_relative_eq!(rec.expected_value, 0.4);
    assert_eq!(rec.true_count, 4.0);
    assert!(rec.risk_of_ruin < 0.001);
    assert_eq!(rec.sessions_to_double, Some(17383));
}

#[test]
fn test_risk_tolerance_caps_bet() {
    let rec = size_bet(10_000.0, 4.0, 0.001, 5.0, 1000.0, HILO).unwrap();
    assert_relative_eq!(rec.recommended_bet, 10.0);
}

#[test]
fn test_bet_clamped_to_table_limits() {
    let high = size_bet(1_000_000.0, 10.0, 0.5, 10.0, 500.0, HILO).unwrap();
    assert_eq!(high.recommended_bet, 500.0);
    assert_eq!(high.risk_level, RiskLevel::High);

    let low = size_bet(1_000.0, 1.5, 0.5, 50.0, 500.0, HILO).unwrap();
    assert_eq!(low.recommended_bet, 50.0);
}

#[test]
fn test_invalid_bet_limits() {
    let err = size_bet(1000.0, 2.0, 0.05, 100.0, 10.0, HILO).unwrap_err();
    match err {
        EngineError::InvalidBetLimits { reason, .. } => {
            assert_eq!(reason, "min_bet cannot exceed max_bet")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        size_bet(1000.0, 2.0, 0.05, 0.0, 10.0, HILO),
        Err(EngineError::InvalidBetLimits { .. })
    ));
}

#[test]
fn test_invalid_bankroll_and_risk() {
    assert!(matches!(
        size_bet(-5.0, 2.0, 0.05, 10.0, 100.0, HILO),
        Err(EngineError::InvalidBankroll(_))
    ));
    assert!(matches!(
        size_bet(1000.0, 2.0, 0.0, 10.0, 100.0, HILO),
        Err(EngineError::InvalidRiskTolerance(_))
    ));
    assert!(matches!(
        size_bet(1000.0, 2.0, 1.5, 10.0, 100.0, HILO),
        Err(EngineError::InvalidRiskTolerance(_))
    ));
}

#[test]
fn test_size_uses_system_efficiency() {
    let request = BankrollRequest {
        bankroll: 10_000.0,
        true_count: 4.0,
        risk_tolerance: 0.05,
        min_bet: 10.0,
        max_bet: 1000.0,
        counting_system: "zen".to_string(),
    };
    let rec = size(&request, catalog()).unwrap();
    assert_relative_eq!(rec.edge, player_edge(4.0, 0.98));

    let bad = BankrollRequest {
        counting_system: "unknown".to_string(),
        ..request
    };
    assert!(matches!(size(&bad, catalog()), Err(EngineError::InvalidCountingSystem { .. })));
}

#[test]
fn test_size_rejects_out_of_range_true_count() {
    let request = BankrollRequest {
        bankroll: 10_000.0,
        true_count: 30.0,
        risk_tolerance: 0.05,
        min_bet: 10.0,
        max_bet: 1000.0,
        counting_system: "hiLo".to_string(),
    };
    assert!(matches!(size(&request, catalog()), Err(EngineError::InvalidTrueCount { .. })));
}

#[test]
fn test_size_with_local_catalog() {
    let local = CountingCatalog::standard();
    let request = BankrollRequest {
        bankroll: 10_000.0,
        true_count: 4.0,
        risk_tolerance: 0.05,
        min_bet: 10.0,
        max_bet: 1000.0,
        counting_system: "hiOptII".to_string(),
    };
    let rec = size(&request, &local).unwrap();
    assert_relative_eq!(rec.edge, player_edge(4.0, 0.99));
}

#[test]
fn test_size_bet_rejects_non_finite_true_count() {
    assert!(matches!(
        size_bet(1000.0, f64::NAN, 0.5, 10.0, 500.0, HILO),
        Err(EngineError::InvalidTrueCount { .. })
    ));
    assert!(matches!(
        size_bet(1000.0, f64::INFINITY, 0.5, 10.0, 500.0, HILO),
        Err(EngineError::InvalidTrueCount { .. })
    ));
    assert!(matches!(
        size_bet(1000.0, 25.0, 0.5, 10.0, 500.0, HILO),
        Err(EngineError::InvalidTrueCount { .. })
    ));
}

#[test]
fn test_size_bet_rejects_non_finite_risk() {
    assert!(matches!(
        size_bet(1000.0, 2.0, f64::NAN, 10.0, 500.0, HILO),
        Err(EngineError::InvalidRiskTolerance(_))
    ));
}

#[test]
fn test_required_bankroll() {
    let plan = required_bankroll(200.0, 3, 12, 0.1, 1.5).unwrap();
    // 200 * 10 / (1.5 * 0.1)
    assert_relative_eq!(plan.required_bankroll, 13333.33);
    assert_relative_eq!(plan.expected_income, 7200.0);
    assert_relative_eq!(plan.risk_tolerance, 0.1);
    assert_eq!(plan.time_horizon_weeks, 12);
}

#[test]
fn test_required_bankroll_scales_inversely_with_count() {
    let cool = required_bankroll(100.0, 2, 4, 0.02, 1.0).unwrap();
    let hot = required_bankroll(100.0, 2, 4, 0.02, 2.0).unwrap();
    assert_relative_eq!(cool.required_bankroll, 50_000.0);
    assert_relative_eq!(hot.required_bankroll, 25_000.0);
    assert_relative_eq!(cool.expected_income, hot.expected_income);
}

#[test]
fn test_required_bankroll_rejects_bad_inputs() {
    assert!(matches!(
        required_bankroll(200.0, 3, 12, 0.1, 0.0),
        Err(EngineError::InvalidIncomePlan { field: "avg_true_count", .. })
    ));
    assert!(matches!(
        required_bankroll(200.0, 3, 12, 0.1, -1.0),
        Err(EngineError::InvalidIncomePlan { field: "avg_true_count", .. })
    ));
    assert!(matches!(
        required_bankroll(200.0, 3, 12, 0.0, 1.0),
        Err(EngineError::InvalidRiskTolerance(_))
    ));
    assert!(matches!(
        required_bankroll(0.0, 3, 12, 0.1, 1.0),
        Err(EngineError::InvalidIncomePlan { field: "desired_income", .. })
    ));
    assert!(matches!(
        required_bankroll(200.0, 8, 12, 0.1, 1.0),
        Err(EngineError::InvalidIncomePlan { field: "sessions_per_week", .. })
    ));
    assert!(matches!(
        required_bankroll(200.0, 3, 0, 0.1, 1.0),
        Err(EngineError::InvalidIncomePlan { field: "weeks", .. })
    ));
}

#[test]
fn test_required_bankroll_serializes() {
    let plan = required_bankroll(50.0, 1, 1, 0.5, 2.0).unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["time_horizon_weeks"], 1);
    assert!(json["required_bankroll"].is_number());
}
