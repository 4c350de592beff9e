//! Validated inputs for the engine. Everything here fails fast, before any
//! simulation work starts.

use serde::Deserialize;

use crate::cards::Rank;
use crate::counting::{catalog, CountingCatalog, CountingSystem, MAX_TRUE_COUNT, MIN_TRUE_COUNT};
use crate::error::{EngineError, EngineResult};
use crate::shoe::MAX_DECKS;

pub fn validate_decks(decks: f64) -> EngineResult<f64> {
    if decks.is_finite() && decks > 0.0 && decks <= MAX_DECKS {
        Ok(decks)
    } else {
        Err(EngineError::InvalidDeckCount {
            value: decks,
            max: MAX_DECKS,
        })
    }
}

pub fn validate_penetration(penetration: f64) -> EngineResult<f64> {
    if penetration.is_finite() && penetration > 0.0 && penetration <= 1.0 {
        Ok(penetration)
    } else {
        Err(EngineError::InvalidPenetration(penetration))
    }
}

pub fn validate_true_count(true_count: f64) -> EngineResult<f64> {
    if true_count.is_finite() && (MIN_TRUE_COUNT..=MAX_TRUE_COUNT).contains(&true_count) {
        Ok(true_count)
    } else {
        Err(EngineError::InvalidTrueCount {
            value: true_count,
            min: MIN_TRUE_COUNT,
            max: MAX_TRUE_COUNT,
        })
    }
}

pub fn validate_risk_tolerance(risk_tolerance: f64) -> EngineResult<f64> {
    if risk_tolerance.is_finite() && risk_tolerance > 0.0 && risk_tolerance <= 1.0 {
        Ok(risk_tolerance)
    } else {
        Err(EngineError::InvalidRiskTolerance(risk_tolerance))
    }
}

pub fn validate_counting_system(name: &str) -> EngineResult<&'static CountingSystem> {
    catalog().get(name)
}

/// Inputs for a single playing decision.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub cards: Vec<Rank>,
    pub dealer_card: Rank,
    /// Cards seen in the shoe besides the player hand and dealer upcard.
    #[serde(default)]
    pub seen: Vec<Rank>,
    /// Derived from the observed cards when absent.
    #[serde(default)]
    pub true_count: Option<f64>,
    pub decks: f64,
    pub counting_system: String,
    #[serde(default)]
    pub penetration: Option<f64>,
}

impl DecisionRequest {
    pub fn new(cards: Vec<Rank>, dealer_card: Rank, decks: f64) -> Self {
        DecisionRequest {
            cards,
            dealer_card,
            seen: Vec::new(),
            true_count: None,
            decks,
            counting_system: "hiLo".to_string(),
            penetration: None,
        }
    }

    pub fn with_seen(mut self, seen: Vec<Rank>) -> Self {
        self.seen = seen;
        self
    }

    pub fn with_true_count(mut self, true_count: f64) -> Self {
        self.true_count = Some(true_count);
        self
    }

    pub fn with_system(mut self, system: &str) -> Self {
        self.counting_system = system.to_string();
        self
    }

    pub fn with_penetration(mut self, penetration: f64) -> Self {
        self.penetration = Some(penetration);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.cards.is_empty() {
            return Err(EngineError::EmptyHand);
        }
        validate_decks(self.decks)?;
        validate_counting_system(&self.counting_system)?;
        if let Some(p) = self.penetration {
            validate_penetration(p)?;
        }
        if let Some(tc) = self.true_count {
            validate_true_count(tc)?;
        }
        Ok(())
    }

    /// Every card known to be out of the shoe: hand, upcard, then the rest.
    pub fn observed(&self) -> Vec<Rank> {
        let mut observed = Vec::with_capacity(self.cards.len() + 1 + self.seen.len());
        observed.extend_from_slice(&self.cards);
        observed.push(self.dealer_card);
        observed.extend_from_slice(&self.seen);
        observed
    }
}

/// Inputs for bet sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct BankrollRequest {
    pub bankroll: f64,
    pub true_count: f64,
    pub risk_tolerance: f64,
    pub min_bet: f64,
    pub max_bet: f64,
    pub counting_system: String,
}

impl BankrollRequest {
    /// Validates against the standard catalog.
    pub fn validate(&self) -> EngineResult<()> {
        self.validate_with(catalog())
    }

    pub fn validate_with(&self, catalog: &CountingCatalog) -> EngineResult<()> {
        if !(self.bankroll.is_finite() && self.bankroll > 0.0) {
            return Err(EngineError::InvalidBankroll(self.bankroll));
        }
        validate_bet_limits(self.min_bet, self.max_bet)?;
        validate_risk_tolerance(self.risk_tolerance)?;
        validate_true_count(self.true_count)?;
        catalog.get(&self.counting_system)?;
        Ok(())
    }
}

pub fn validate_bet_limits(min_bet: f64, max_bet: f64) -> EngineResult<()> {
    let reason = if !min_bet.is_finite() || !max_bet.is_finite() {
        Some("bet limits must be finite")
    } else if min_bet <= 0.0 || max_bet <= 0.0 {
        Some("bet limits must be positive")
    } else if min_bet > max_bet {
        Some("min_bet cannot exceed max_bet")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(EngineError::InvalidBetLimits {
            min_bet,
            max_bet,
            reason,
        }),
        None => Ok(()),
    }
}
