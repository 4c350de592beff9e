use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid card: {0:?}. Must be one of: 2, 3, 4, 5, 6, 7, 8, 9, 10, J, Q, K, A")]
    InvalidCard(String),

    #[error("Invalid deck count: decks must be in (0, {max}], got {value}")]
    InvalidDeckCount { value: f64, max: f64 },

    #[error("Invalid counting system: {name:?}. Must be one of: {valid}")]
    InvalidCountingSystem { name: String, valid: String },

    #[error("Invalid penetration: penetration must be in (0, 1], got {0}")]
    InvalidPenetration(f64),

    #[error("Invalid bet limits: {reason} (min_bet={min_bet}, max_bet={max_bet})")]
    InvalidBetLimits {
        min_bet: f64,
        max_bet: f64,
        reason: &'static str,
    },

    #[error("Invalid bankroll: bankroll must be a positive number, got {0}")]
    InvalidBankroll(f64),

    #[error("Invalid risk tolerance: risk_tolerance must be in (0, 1], got {0}")]
    InvalidRiskTolerance(f64),

    #[error("Invalid true count: true_count must be in [{min}, {max}], got {value}")]
    InvalidTrueCount { value: f64, min: f64, max: f64 },

    #[error("Invalid income plan: {field} {requirement}, got {value}")]
    InvalidIncomePlan {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("Player hand must contain at least one card")]
    EmptyHand,

    #[error("Invalid config field {field}: {message}")]
    InvalidConfig { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
