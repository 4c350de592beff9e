use std::fmt;

use serde::Serialize;

use crate::counting::{round_to, CountingCatalog};
use crate::error::{EngineError, EngineResult};
use crate::request::{
    validate_bet_limits, validate_risk_tolerance, validate_true_count, BankrollRequest,
};

/// Player edge at a true count of zero with basic strategy.
pub const BASE_HOUSE_EDGE: f64 = -0.005;
/// Edge gained per point of true count, before the system's efficiency.
pub const EDGE_PER_TRUE_COUNT: f64 = 0.005;
pub const MAX_EDGE: f64 = 0.05;
/// Bankroll multiple of the per-session income target before scaling by
/// count and risk tolerance.
pub const INCOME_BANKROLL_MULTIPLE: f64 = 10.0;
pub const MAX_SESSIONS_PER_WEEK: u32 = 7;
/// Per-hand variance of blackjack in squared units.
pub const BLACKJACK_VARIANCE: f64 = 1.3;
/// Fraction of full Kelly actually wagered.
pub const KELLY_MULTIPLIER: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_kelly(kelly_fraction: f64) -> Self {
        if kelly_fraction < 0.01 {
            RiskLevel::Low
        } else if kelly_fraction < 0.03 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BettingRecommendation {
    pub recommended_bet: f64,
    pub kelly_fraction: f64,
    pub conservative_fraction: f64,
    pub risk_level: RiskLevel,
    pub risk_of_ruin: f64,
    /// Expected win of the recommended bet, in currency.
    pub expected_value: f64,
    /// Estimated player edge as a fraction of the bet.
    pub edge: f64,
    pub true_count: f64,
    /// `None` when the bankroll is not expected to grow.
    pub sessions_to_double: Option<u64>,
    pub bankroll_units: f64,
}

/// Linear edge model: base house edge plus a per-count increment scaled by the
/// counting system's efficiency, clamped to +/-5%.
pub fn player_edge(true_count: f64, efficiency: f64) -> f64 {
    (BASE_HOUSE_EDGE + EDGE_PER_TRUE_COUNT * efficiency * true_count).clamp(-MAX_EDGE, MAX_EDGE)
}

/// Full Kelly fraction of bankroll for an even-money game with blackjack's variance.
pub fn kelly_fraction(edge: f64) -> f64 {
    if edge <= 0.0 {
        return 0.0;
    }
    edge / BLACKJACK_VARIANCE
}

/// `((1 - edge) / (1 + edge)) ^ (bankroll / bet)`, clamped to [0, 1].
/// Degenerate inputs are certain ruin.
pub fn risk_of_ruin(bankroll: f64, bet_size: f64, edge: f64) -> f64 {
    if bankroll <= 0.0 || bet_size <= 0.0 || edge <= -1.0 {
        return 1.0;
    }
    if edge >= 1.0 {
        return 0.0;
    }
    let risk = ((1.0 - edge) / (1.0 + edge)).powf(bankroll / bet_size);
    if risk.is_finite() {
        risk.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Sessions needed to double the bankroll when betting `bet_fraction` of it
/// with `edge`. `None` means never.
pub fn sessions_to_double(edge: f64, bet_fraction: f64) -> Option<u64> {
    if edge <= 0.0 || bet_fraction <= 0.0 {
        return None;
    }
    let sessions = (std::f64::consts::LN_2 / (edge * bet_fraction)).ceil();
    Some(sessions.max(1.0) as u64)
}

/// Fractional-Kelly bet sizing. `risk_tolerance` caps the share of bankroll
/// put on a single bet; the table minimum always applies.
pub fn size_bet(
    bankroll: f64,
    true_count: f64,
    risk_tolerance: f64,
    min_bet: f64,
    max_bet: f64,
    efficiency: f64,
) -> EngineResult<BettingRecommendation> {
    if !(bankroll.is_finite() && bankroll > 0.0) {
        return Err(EngineError::InvalidBankroll(bankroll));
    }
    validate_true_count(true_count)?;
    validate_bet_limits(min_bet, max_bet)?;
    validate_risk_tolerance(risk_tolerance)?;

    let edge = player_edge(true_count, efficiency);
    let rounded_tc = round_to(true_count, 1);

    let (bet, kelly, conservative) = if edge <= 0.0 || true_count <= 0.0 {
        (min_bet, 0.0, 0.0)
    } else {
        let kelly = kelly_fraction(edge);
        let conservative = kelly * KELLY_MULTIPLIER;
        let target = (bankroll * conservative).min(bankroll * risk_tolerance);
        (target.clamp(min_bet, max_bet), kelly, conservative)
    };

    let recommendation = BettingRecommendation {
        recommended_bet: round_to(bet, 2),
        kelly_fraction: round_to(kelly, 4),
        conservative_fraction: round_to(conservative, 4),
        risk_level: RiskLevel::from_kelly(kelly),
        risk_of_ruin: round_to(risk_of_ruin(bankroll, bet, edge), 4),
        expected_value: round_to(bet * edge, 2),
        edge,
        true_count: rounded_tc,
        sessions_to_double: sessions_to_double(edge, bet / bankroll),
        bankroll_units: bankroll / bet,
    };

    tracing::info!(
        bankroll,
        true_count = rounded_tc,
        edge,
        bet = recommendation.recommended_bet,
        risk = %recommendation.risk_level,
        "bet sized"
    );

    Ok(recommendation)
}

/// Validates the request, resolves the counting system's efficiency from
/// `catalog` and sizes the bet.
pub fn size(
    request: &BankrollRequest,
    catalog: &CountingCatalog,
) -> EngineResult<BettingRecommendation> {
    request.validate_with(catalog)?;
    let system = catalog.get(&request.counting_system)?;
    size_bet(
        request.bankroll,
        request.true_count,
        request.risk_tolerance,
        request.min_bet,
        request.max_bet,
        system.efficiency,
    )
}

/// Bankroll needed to target an income per session, and what that target adds
/// up to over the planning horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankrollRequirement {
    pub required_bankroll: f64,
    pub expected_income: f64,
    pub risk_tolerance: f64,
    pub time_horizon_weeks: u32,
}

fn plan_error(field: &'static str, requirement: &'static str, value: f64) -> EngineError {
    EngineError::InvalidIncomePlan {
        field,
        requirement,
        value,
    }
}

/// `required = desired_income * 10 / (avg_true_count * risk_tolerance)`.
/// Only a positive average count gives a finite requirement.
pub fn required_bankroll(
    desired_income: f64,
    sessions_per_week: u32,
    weeks: u32,
    risk_tolerance: f64,
    avg_true_count: f64,
) -> EngineResult<BankrollRequirement> {
    if !(desired_income.is_finite() && desired_income > 0.0) {
        return Err(plan_error("desired_income", "must be positive", desired_income));
    }
    if sessions_per_week == 0 || sessions_per_week > MAX_SESSIONS_PER_WEEK {
        return Err(plan_error(
            "sessions_per_week",
            "must be between 1 and 7",
            sessions_per_week as f64,
        ));
    }
    if weeks == 0 {
        return Err(plan_error("weeks", "must be at least 1", 0.0));
    }
    validate_risk_tolerance(risk_tolerance)?;
    if !(avg_true_count.is_finite() && avg_true_count > 0.0) {
        return Err(plan_error("avg_true_count", "must be positive", avg_true_count));
    }

    let required = desired_income * INCOME_BANKROLL_MULTIPLE / (avg_true_count * risk_tolerance);
    let expected_income = desired_income * sessions_per_week as f64 * weeks as f64;

    tracing::info!(
        desired_income,
        avg_true_count,
        required_bankroll = required,
        "bankroll requirement planned"
    );

    Ok(BankrollRequirement {
        required_bankroll: round_to(required, 2),
        expected_income: round_to(expected_income, 2),
        risk_tolerance,
        time_horizon_weeks: weeks,
    })
}
