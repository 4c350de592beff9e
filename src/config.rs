use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::counting::catalog;
use crate::error::{EngineError, EngineResult};
use crate::shoe::MAX_DECKS;

const DEFAULT_TRIALS: usize = 10_000;
const DEFAULT_AUXILIARY_TRIALS: usize = 5_000;
const DEFAULT_MAX_TRIALS: usize = 200_000;
const DEFAULT_COUNT_EV_ADJUSTMENT: f64 = 0.005;
const DEFAULT_DECKS: f64 = 6.0;

/// Engine tuning knobs, loaded from JSON. Every field has a default so a
/// partial file (or `{}`) is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Monte Carlo trials per action for a decision.
    pub trials: usize,
    /// Trials for secondary estimates (dealer bust, action probabilities).
    pub auxiliary_trials: usize,
    /// Hard cap on any requested trial count.
    pub max_trials: usize,
    /// EV added to every action per point of true count.
    pub count_ev_adjustment: f64,
    pub default_decks: f64,
    pub default_system: String,
    /// Fixed seed for reproducible runs; fresh entropy when absent.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            trials: DEFAULT_TRIALS,
            auxiliary_trials: DEFAULT_AUXILIARY_TRIALS,
            max_trials: DEFAULT_MAX_TRIALS,
            count_ev_adjustment: DEFAULT_COUNT_EV_ADJUSTMENT,
            default_decks: DEFAULT_DECKS,
            default_system: "hiLo".to_string(),
            seed: None,
            log_level: "warn".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let file = File::open(path.as_ref())?;
        let cfg: EngineConfig = serde_json::from_reader(BufReader::new(file))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        let cfg: EngineConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.trials == 0 {
            return Err(invalid("trials", "must be greater than zero"));
        }
        if self.auxiliary_trials == 0 {
            return Err(invalid("auxiliary_trials", "must be greater than zero"));
        }
        if self.trials > self.max_trials {
            return Err(invalid(
                "trials",
                &format!("{} exceeds max_trials {}", self.trials, self.max_trials),
            ));
        }
        if !self.count_ev_adjustment.is_finite() {
            return Err(invalid("count_ev_adjustment", "must be a finite number"));
        }
        if !(self.default_decks > 0.0 && self.default_decks <= MAX_DECKS) {
            return Err(invalid(
                "default_decks",
                &format!("must be in (0, {}], got {}", MAX_DECKS, self.default_decks),
            ));
        }
        catalog().get(&self.default_system)?;
        Ok(())
    }

    /// Clamps a requested trial count to `max_trials`.
    pub fn capped_trials(&self, requested: usize) -> usize {
        if requested > self.max_trials {
            tracing::warn!(
                requested,
                cap = self.max_trials,
                "trial count capped"
            );
        }
        requested.min(self.max_trials)
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}
